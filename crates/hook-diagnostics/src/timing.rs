//! `timing` records worker start time and per-request queue latency.
//!
//! Options: `max_queue_ms=<n>`; a request that waited longer than `n`
//! milliseconds makes the request callback fail. The registry logs that
//! failure and carries on, so the option only flags slow instructions.

use chrono::Utc;
use harness_core::error::AppError;
use harness_hooks::Hook;
use tracing::warn;

use crate::parse_option;

/// Registered hook name.
pub const NAME: &str = "timing";

/// Builds the hook from its options.
pub fn build(options: &[String]) -> Hook {
    let max_queue_ms = parse_max_queue_ms(options);

    Hook::new()
        .with_init(|ctx| Ok(ctx.with_value("timing.started_at", Utc::now().to_rfc3339())))
        .with_request(move |ctx, req| {
            let queue_ms = (Utc::now() - req.received_at).num_milliseconds().max(0);

            if let Some(max) = max_queue_ms
                && queue_ms > max
            {
                return Err(AppError::hook(format!(
                    "instruction '{}' queued for {queue_ms}ms, limit {max}ms",
                    req.instruction_id
                )));
            }

            Ok(ctx.with_value("timing.queue_ms", queue_ms))
        })
}

fn parse_max_queue_ms(options: &[String]) -> Option<i64> {
    let mut max = None;
    for option in options {
        match parse_option(option) {
            ("max_queue_ms", value) => match value.parse::<i64>() {
                Ok(ms) if ms >= 0 => max = Some(ms),
                _ => warn!(hook = NAME, value = %value, "Invalid max_queue_ms, ignoring"),
            },
            (key, _) => warn!(hook = NAME, option = %key, "Ignoring unknown option"),
        }
    }
    max
}
