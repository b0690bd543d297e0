//! # harness-hooks
//!
//! Hook registry for the worker harness. Provides:
//!
//! - Named hook factories, registered by hook modules at load time
//! - An active hook set, built by enabling names with string options
//! - `run_init_hooks` (fail-fast) and `run_request_hooks` (best-effort),
//!   threading one immutable [`HookContext`] through the active hooks
//! - A process-wide registry reachable through [`registry`] and the free
//!   functions below; tests build isolated [`HookRegistry`] values instead

pub mod context;
pub mod error;
pub mod hook;
pub mod registry;
pub mod request;
pub mod spec;

use std::sync::OnceLock;

pub use context::HookContext;
pub use error::HookError;
pub use hook::{Hook, HookFactory, InitHook, RequestHook, factory};
pub use registry::HookRegistry;
pub use request::InstructionRequest;
pub use spec::HookSpec;

/// Returns the process-wide registry, creating it on first use.
pub fn registry() -> &'static HookRegistry {
    static REGISTRY: OnceLock<HookRegistry> = OnceLock::new();
    REGISTRY.get_or_init(HookRegistry::new)
}

/// Registers a factory in the process-wide registry.
pub fn register_hook(name: impl Into<String>, factory: HookFactory) {
    registry().register_hook(name, factory);
}

/// Enables a hook in the process-wide registry.
pub fn enable_hook<S: AsRef<str>>(name: &str, options: &[S]) -> Result<(), HookError> {
    registry().enable_hook(name, options)
}

/// Runs the process-wide init hooks.
pub fn run_init_hooks(ctx: HookContext) -> Result<HookContext, HookError> {
    registry().run_init_hooks(ctx)
}

/// Runs the process-wide request hooks.
pub fn run_request_hooks(ctx: HookContext, req: &InstructionRequest) -> HookContext {
    registry().run_request_hooks(ctx, req)
}

/// Returns the options a hook is enabled with in the process-wide registry.
pub fn is_enabled(name: &str) -> Option<Vec<String>> {
    registry().is_enabled(name)
}

/// Returns the hook names registered in the process-wide registry.
pub fn registered_hooks() -> Vec<String> {
    registry().registered_hooks()
}
