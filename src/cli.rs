//! CLI interface for the dispatch desk.
//!
//! Each subcommand is non-interactive: arguments in, a view out.
//! Every invocation starts from seed data; nothing is written back.
//! To run several steps against the same desk, put them in a script and
//! replay it with `dispatch session <file>` (or `-` for stdin).
//!
//! Mutations print their notifications to stderr and the resulting record
//! to stdout. `--json` switches stdout to pretty JSON.

mod format;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiff::Timestamp;
use serde::Serialize;

use crate::config::Config;
use crate::dashboard;
use crate::desk::{Desk, Policy};
use crate::identity::resolve_operator;
use crate::model::{
    ActivityLog, AmbulanceId, AmbulanceStatus, EmergencyRequest, EmergencyType, NewRequest,
    RequestId, RequestStatus, RequestUpdate,
};
use crate::search::{filter_logs, filter_requests};
use crate::seed::Seed;

use format::{
    format_ambulance_detail, format_ambulance_row, format_dashboard, format_log_row,
    format_notification, format_request_detail, format_request_row,
};

/// Number of log lines on the dashboard.
const RECENT_ACTIVITY: usize = 5;

/// Dispatch: run an ambulance dispatch desk from the command line.
#[derive(Debug, Parser)]
#[command(name = "dispatch", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Seed file to load instead of the built-in shift.
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Operator recorded on user actions (overrides `DISPATCH_OPERATOR`).
    #[arg(long = "as", global = true)]
    operator: Option<String>,

    /// Enforce lifecycle transitions and validate ambulance assignments.
    #[arg(long, global = true)]
    strict: bool,

    /// Print views as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: one call from intake to hospital
  1. dispatch requests new --location "5 Quay St" --type cardiac-arrest
  2. dispatch requests update EMR006 --status dispatched --ambulance AMB001
  3. dispatch fleet set-status AMB001 en-route-to-scene
  4. dispatch requests update EMR006 --status on-site --ambulance AMB001

Each command starts from the seed. Chain them in a file and replay:
  dispatch --as dispatcher01 session shift.txt"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Desk(DeskCommand),

    /// Replay a script of commands against a single desk.
    ///
    /// One command per line, written as you would after `dispatch`.
    /// Blank lines and lines starting with `#` are skipped.
    /// `reset` reloads the seed; `exit` stops early.
    Session {
        /// Script file, or `-` for stdin.
        script: PathBuf,
    },
}

/// Commands that operate on the desk.
#[derive(Debug, Subcommand)]
pub enum DeskCommand {
    /// Emergency requests: list, inspect, take in, update, cancel.
    Requests {
        #[command(subcommand)]
        command: RequestCommand,
    },

    /// Ambulance fleet: list, inspect, change status.
    Fleet {
        #[command(subcommand)]
        command: FleetCommand,
    },

    /// Search requests and the activity log.
    ///
    /// Matches request id, location, and ambulance, and log description
    /// and category. Case-insensitive. No term lists everything.
    History {
        /// Text to look for.
        term: Option<String>,
    },

    /// Show the activity log, optionally filtered.
    Log {
        /// Text to look for in description or category.
        term: Option<String>,
    },

    /// Summary counts, ongoing requests, and recent activity.
    Dashboard,
}

impl DeskCommand {
    /// Whether the command changes the desk.
    fn mutates(&self) -> bool {
        match self {
            Self::Requests { command } => !matches!(
                command,
                RequestCommand::List | RequestCommand::Show { .. }
            ),
            Self::Fleet { command } => matches!(command, FleetCommand::SetStatus { .. }),
            Self::History { .. } | Self::Log { .. } | Self::Dashboard => false,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum RequestCommand {
    /// List all requests, most recent first.
    List,

    /// Show one request with its assigned unit.
    Show {
        id: String,
    },

    /// Take in a new request. Prints the new request.
    New {
        /// Where the emergency is.
        #[arg(long)]
        location: String,

        /// cardiac-arrest, accident, fall, breathing-difficulty, or other.
        #[arg(long = "type", default_value = "other")]
        kind: EmergencyType,

        #[arg(long)]
        patient: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Set a request's status and assigned ambulance.
    ///
    /// Omitting `--ambulance` clears the assignment.
    Update {
        id: String,

        /// pending, dispatched, on-site, transporting, resolved, or cancelled.
        #[arg(long)]
        status: RequestStatus,

        #[arg(long)]
        ambulance: Option<String>,
    },

    /// Cancel a request. Cancelling twice changes nothing.
    Cancel {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum FleetCommand {
    /// List all units.
    List,

    /// Show one unit with its crew.
    Show {
        id: String,
    },

    /// Move a unit to a new status.
    SetStatus {
        id: String,

        /// available, en-route-to-scene, at-scene, en-route-to-hospital,
        /// at-hospital, clearing, or unavailable.
        status: AmbulanceStatus,
    },
}

/// How views are written to stdout.
#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    /// Print `value` as JSON, or `text()` otherwise.
    fn emit<T: Serialize>(self, value: &T, text: impl FnOnce() -> String) -> Result<(), String> {
        if self.json {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("failed to serialize output: {e}"))?;
            println!("{json}");
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let needs_operator = match &cli.command {
        Command::Desk(command) => command.mutates(),
        Command::Session { .. } => true,
    };
    let operator = match resolve_operator(cli.operator.as_deref(), config.operator.as_deref()) {
        Ok(operator) => operator,
        Err(e) if needs_operator => return Err(e),
        Err(_) => String::new(),
    };

    let seed = load_seed(cli.seed.as_ref().or(config.seed.as_ref()))?;
    let policy = if cli.strict {
        Policy::strict()
    } else {
        config.policy()
    };
    let mut desk = Desk::new(seed, policy, operator);
    let out = Output { json: cli.json };

    match cli.command {
        Command::Desk(command) => execute(&mut desk, config, out, command),
        Command::Session { script } => session::run(&mut desk, config, out, &script),
    }
}

fn load_seed(path: Option<&PathBuf>) -> Result<Seed, String> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading seed");
            Seed::load(path).map_err(|e| format!("failed to load seed {}: {e}", path.display()))
        }
        None => Ok(Seed::builtin().rebased(Timestamp::now())),
    }
}

/// Execute one desk command.
fn execute(
    desk: &mut Desk,
    config: &Config,
    out: Output,
    command: DeskCommand,
) -> Result<(), String> {
    let result = match command {
        DeskCommand::Requests { command } => match command {
            RequestCommand::List => cmd_requests_list(desk, out),
            RequestCommand::Show { id } => cmd_requests_show(desk, out, &RequestId(id)),
            RequestCommand::New {
                location,
                kind,
                patient,
                notes,
            } => cmd_requests_new(
                desk,
                out,
                NewRequest {
                    location,
                    kind,
                    patient_name: patient,
                    notes,
                },
            ),
            RequestCommand::Update {
                id,
                status,
                ambulance,
            } => cmd_requests_update(
                desk,
                out,
                &RequestId(id),
                RequestUpdate {
                    status,
                    ambulance_id: ambulance.map(AmbulanceId),
                },
            ),
            RequestCommand::Cancel { id } => cmd_requests_cancel(desk, out, &RequestId(id)),
        },
        DeskCommand::Fleet { command } => match command {
            FleetCommand::List => cmd_fleet_list(desk, out),
            FleetCommand::Show { id } => cmd_fleet_show(desk, out, &AmbulanceId(id)),
            FleetCommand::SetStatus { id, status } => {
                cmd_fleet_set_status(desk, out, &AmbulanceId(id), status)
            }
        },
        DeskCommand::History { term } => cmd_history(desk, out, term.as_deref().unwrap_or("")),
        DeskCommand::Log { term } => cmd_log(desk, out, term.as_deref().unwrap_or("")),
        DeskCommand::Dashboard => cmd_dashboard(desk, config, out),
    };

    for notification in desk.take_notifications() {
        eprintln!("{}", format_notification(&notification));
    }

    result
}

fn cmd_requests_list(desk: &Desk, out: Output) -> Result<(), String> {
    let requests = desk.requests();
    out.emit(&requests, || {
        if requests.is_empty() {
            return "No requests".to_string();
        }
        requests
            .iter()
            .map(format_request_row)
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn cmd_requests_show(desk: &Desk, out: Output, id: &RequestId) -> Result<(), String> {
    let request = desk
        .request(id)
        .ok_or_else(|| format!("no request '{id}'"))?;
    let ambulance = desk.assigned_ambulance(request.ambulance_id.as_ref());
    out.emit(request, || {
        format_request_detail(request, ambulance, desk.session_started())
    })
}

fn cmd_requests_new(desk: &mut Desk, out: Output, new: NewRequest) -> Result<(), String> {
    let now = desk.session_started();
    let request = desk.create_request(new).clone();
    out.emit(&request, || format_request_detail(&request, None, now))
}

fn cmd_requests_update(
    desk: &mut Desk,
    out: Output,
    id: &RequestId,
    update: RequestUpdate,
) -> Result<(), String> {
    let updated = desk
        .update_request(id, update)
        .map_err(|e| format!("failed to update request: {e}"))?
        .cloned();
    show_changed_request(desk, out, id, updated.as_ref())
}

fn cmd_requests_cancel(desk: &mut Desk, out: Output, id: &RequestId) -> Result<(), String> {
    let cancelled = desk
        .cancel_request(id)
        .map_err(|e| format!("failed to cancel request: {e}"))?
        .cloned();
    show_changed_request(desk, out, id, cancelled.as_ref())
}

/// Unknown ids are not an error: say so on stderr and carry on.
fn show_changed_request(
    desk: &Desk,
    out: Output,
    id: &RequestId,
    request: Option<&EmergencyRequest>,
) -> Result<(), String> {
    let Some(request) = request else {
        eprintln!("No request '{id}'; nothing changed");
        return Ok(());
    };
    let ambulance = desk.assigned_ambulance(request.ambulance_id.as_ref());
    out.emit(request, || {
        format_request_detail(request, ambulance, desk.session_started())
    })
}

fn cmd_fleet_list(desk: &Desk, out: Output) -> Result<(), String> {
    let ambulances = desk.ambulances();
    let now = desk.session_started();
    out.emit(&ambulances, || {
        if ambulances.is_empty() {
            return "No ambulances".to_string();
        }
        ambulances
            .iter()
            .map(|a| format_ambulance_row(a, now))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn cmd_fleet_show(desk: &Desk, out: Output, id: &AmbulanceId) -> Result<(), String> {
    let ambulance = desk
        .ambulance(id)
        .ok_or_else(|| format!("no ambulance '{id}'"))?;
    out.emit(ambulance, || {
        format_ambulance_detail(ambulance, desk.session_started())
    })
}

fn cmd_fleet_set_status(
    desk: &mut Desk,
    out: Output,
    id: &AmbulanceId,
    status: AmbulanceStatus,
) -> Result<(), String> {
    let now = desk.session_started();
    let updated = desk
        .set_ambulance_status(id, status)
        .map_err(|e| format!("failed to update ambulance: {e}"))?
        .cloned();
    match updated {
        Some(ambulance) => out.emit(&ambulance, || format_ambulance_detail(&ambulance, now)),
        None => {
            eprintln!("No ambulance '{id}'; nothing changed");
            Ok(())
        }
    }
}

/// Search results for `history`.
#[derive(Serialize)]
struct HistoryView<'a> {
    requests: Vec<&'a EmergencyRequest>,
    logs: Vec<&'a ActivityLog>,
}

fn cmd_history(desk: &Desk, out: Output, term: &str) -> Result<(), String> {
    let view = HistoryView {
        requests: filter_requests(desk.requests(), term),
        logs: filter_logs(desk.logs(), term),
    };
    out.emit(&view, || {
        let mut lines = vec![format!("Requests ({})", view.requests.len())];
        lines.extend(view.requests.iter().map(|r| format!("  {}", format_request_row(r))));
        lines.push(String::new());
        lines.push(format!("Activity ({})", view.logs.len()));
        lines.extend(view.logs.iter().map(|l| format!("  {}", format_log_row(l))));
        lines.join("\n")
    })
}

fn cmd_log(desk: &Desk, out: Output, term: &str) -> Result<(), String> {
    let logs = filter_logs(desk.logs(), term);
    out.emit(&logs, || {
        if logs.is_empty() {
            return "No activity".to_string();
        }
        logs.iter()
            .map(|l| format_log_row(l))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn cmd_dashboard(desk: &Desk, config: &Config, out: Output) -> Result<(), String> {
    let view = dashboard::build(desk, config.ongoing_limit, RECENT_ACTIVITY);
    out.emit(&view, || format_dashboard(&view))
}
