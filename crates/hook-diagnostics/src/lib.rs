//! # hook-diagnostics
//!
//! Diagnostic hooks for the worker harness. Each module exposes a factory
//! and the name it registers under; [`register_all`] adds every hook to a
//! registry so an operator can enable them by name.

pub mod request_log;
pub mod timing;

use harness_hooks::{HookRegistry, factory};

/// Registers every diagnostics hook in `registry`.
pub fn register_all(registry: &HookRegistry) {
    registry.register_hook(request_log::NAME, factory(request_log::build));
    registry.register_hook(timing::NAME, factory(timing::build));
}

/// Splits a `key=value` option. Options without `=` have an empty value.
pub(crate) fn parse_option(option: &str) -> (&str, &str) {
    match option.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (option.trim(), ""),
    }
}
