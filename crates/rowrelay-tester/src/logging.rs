//! Logging flags and tracing filter computation for the tester binary.

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Logging controls shared by tester subcommands.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_filter"])]
    pub debug: bool,

    /// Set an explicit tracing filter directive (overrides other flags),
    /// e.g. "rowrelay_engine=trace,rowrelay_view=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Crate targets that constitute "our" logs.
fn our_crates() -> &'static [&'static str] {
    &["rowrelay_tester", "rowrelay_engine", "rowrelay_view"]
}

/// Filter directive applying the same level to all of our crates.
fn level_spec_for(level: &str) -> String {
    let parts: Vec<String> = our_crates()
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    parts.join(",")
}

/// Compute the final filter spec with precedence: explicit filter, then
/// trace/debug flags, then `RUST_LOG`, then crate-scoped info.
pub fn compute_spec(args: &LogArgs) -> String {
    if let Some(filter) = &args.log_filter {
        return filter.clone();
    }
    if args.trace {
        return level_spec_for("trace");
    }
    if args.debug {
        return level_spec_for("debug");
    }
    if let Ok(env) = std::env::var("RUST_LOG")
        && !env.is_empty()
    {
        return env;
    }
    level_spec_for("info")
}

/// Build an `EnvFilter`, falling back to info on an invalid spec.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::try_new(spec).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let args = LogArgs {
            trace: true,
            debug: false,
            log_filter: Some("rowrelay_engine=warn".into()),
        };
        assert_eq!(compute_spec(&args), "rowrelay_engine=warn");
    }

    #[test]
    fn debug_flag_scopes_to_our_crates() {
        let args = LogArgs {
            trace: false,
            debug: true,
            log_filter: None,
        };
        let spec = compute_spec(&args);
        assert!(spec.contains("rowrelay_engine=debug"));
        assert!(spec.contains("rowrelay_view=debug"));
    }
}
