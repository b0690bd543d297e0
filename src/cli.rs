//! Command-line arguments for the worker harness.

use clap::Parser;

use harness_hooks::HookSpec;

/// Worker harness. Runs diagnostic hooks around every instruction read
/// from stdin (one JSON request per line).
#[derive(Debug, Parser)]
#[command(name = "worker-harness", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/worker.toml")]
    pub config: String,

    /// Hook to enable, as `name` or `name:opt1,opt2` (repeatable)
    #[arg(long = "hook", value_name = "SPEC")]
    pub hooks: Vec<HookSpec>,

    /// Hooks to enable, as produced by a parent worker's serialized hook set
    #[arg(long, value_name = "JSON")]
    pub hooks_json: Option<String>,

    /// List registered hooks and exit
    #[arg(long)]
    pub list_hooks: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_hook_flags() {
        let cli = Cli::try_parse_from([
            "worker-harness",
            "--hook",
            "timing",
            "--hook",
            "request_log:level=debug",
        ])
        .expect("parse");

        assert_eq!(cli.config, "config/worker.toml");
        assert_eq!(
            cli.hooks,
            vec![
                HookSpec::new("timing", Vec::new()),
                HookSpec::new("request_log", vec!["level=debug".to_string()]),
            ]
        );
        assert!(!cli.list_hooks);
    }

    #[test]
    fn test_invalid_hook_flag() {
        assert!(Cli::try_parse_from(["worker-harness", "--hook", ":x"]).is_err());
    }
}
