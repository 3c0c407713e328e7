//! Operator resolution for desk commands.
//!
//! Every user action in the activity log is attributed to an operator.
//! Rather than requiring `--as` on every invocation, the operator is resolved
//! through a chain:
//!
//! 1. `--as <operator>`: explicit per-command override
//! 2. `DISPATCH_OPERATOR` env var: per shell or per console
//! 3. `operator` in `~/.dispatch/config.toml`: the usual default

use std::env;

/// Environment variable naming the operator.
pub const OPERATOR_ENV: &str = "DISPATCH_OPERATOR";

/// Error message shown when no operator can be resolved.
pub const OPERATOR_REQUIRED: &str = "operator required: pass --as <operator>, \
    set DISPATCH_OPERATOR, or add `operator = \"...\"` to ~/.dispatch/config.toml";

/// Resolve the acting operator from the tiered resolution chain.
///
/// Checks in order: explicit `--as` value, `DISPATCH_OPERATOR`, the
/// configured default. Returns [`OPERATOR_REQUIRED`] when none yields a value.
pub fn resolve_operator(
    explicit: Option<&str>,
    configured: Option<&str>,
) -> Result<String, String> {
    let from_env = env::var(OPERATOR_ENV).ok();
    pick_operator(explicit, from_env.as_deref(), configured)
}

fn pick_operator(
    explicit: Option<&str>,
    from_env: Option<&str>,
    configured: Option<&str>,
) -> Result<String, String> {
    [explicit, from_env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| OPERATOR_REQUIRED.to_string())
}
