//! `request_log` logs every instruction the worker receives.
//!
//! Options: `level=<trace|debug|info|warn>` (default `info`).

use harness_hooks::{Hook, InstructionRequest};
use tracing::{Level, debug, info, trace, warn};

use crate::parse_option;

/// Registered hook name.
pub const NAME: &str = "request_log";

/// Builds the hook from its options.
pub fn build(options: &[String]) -> Hook {
    let level = parse_level(options);

    Hook::new()
        .with_init(move |ctx| Ok(ctx.with_value("request_log.level", level.as_str())))
        .with_request(move |ctx, req| {
            log_request(level, req);
            Ok(ctx.with_value("request_log.instruction_id", req.instruction_id.clone()))
        })
}

fn parse_level(options: &[String]) -> Level {
    let mut level = Level::INFO;
    for option in options {
        match parse_option(option) {
            ("level", value) => {
                level = match value.to_ascii_lowercase().as_str() {
                    "trace" => Level::TRACE,
                    "debug" => Level::DEBUG,
                    "info" => Level::INFO,
                    "warn" => Level::WARN,
                    other => {
                        warn!(hook = NAME, level = %other, "Unknown log level, using info");
                        Level::INFO
                    }
                };
            }
            (key, _) => warn!(hook = NAME, option = %key, "Ignoring unknown option"),
        }
    }
    level
}

// tracing macros need a constant level.
fn log_request(level: Level, req: &InstructionRequest) {
    let id = req.instruction_id.as_str();
    let kind = req.kind.as_str();
    match level {
        Level::TRACE => trace!(instruction_id = %id, kind = %kind, payload = %req.payload, "Instruction received"),
        Level::DEBUG => debug!(instruction_id = %id, kind = %kind, "Instruction received"),
        Level::WARN => warn!(instruction_id = %id, kind = %kind, "Instruction received"),
        _ => info!(instruction_id = %id, kind = %kind, "Instruction received"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harness_hooks::HookContext;
    use serde_json::json;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_default_level() {
        assert_eq!(parse_level(&[]), Level::INFO);
    }

    #[test]
    fn test_level_option() {
        assert_eq!(parse_level(&opts(&["level=DEBUG"])), Level::DEBUG);
        assert_eq!(parse_level(&opts(&["level=bogus"])), Level::INFO);
        assert_eq!(parse_level(&opts(&["colour", "level=trace"])), Level::TRACE);
    }

    #[test]
    fn test_callbacks_attach_values() {
        let hook = build(&opts(&["level=warn"]));

        let init = hook.init.expect("init");
        let ctx = init(HookContext::new()).expect("init");
        assert_eq!(ctx.value("request_log.level"), Some(&json!("WARN")));

        let req = hook.req.expect("req");
        let ctx = req(ctx, &InstructionRequest::new("abc", "process_bundle")).expect("req");
        assert_eq!(ctx.value("request_log.instruction_id"), Some(&json!("abc")));
    }
}
