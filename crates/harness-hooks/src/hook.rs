//! Hook definitions: the two lifecycle callbacks and the factory shape.

use std::fmt;
use std::sync::Arc;

use harness_core::result::AppResult;

use crate::context::HookContext;
use crate::request::InstructionRequest;

/// Callback run once per process at startup.
pub type InitHook = Arc<dyn Fn(HookContext) -> AppResult<HookContext> + Send + Sync>;

/// Callback run once per incoming request.
pub type RequestHook =
    Arc<dyn Fn(HookContext, &InstructionRequest) -> AppResult<HookContext> + Send + Sync>;

/// Builds a [`Hook`] from the options it was enabled with.
pub type HookFactory = Arc<dyn Fn(&[String]) -> Hook + Send + Sync>;

/// A bundle of optional lifecycle callbacks.
///
/// Either callback may be absent, in which case the context passes through
/// unchanged. A `Hook` is immutable once built; cloning shares the callbacks.
#[derive(Clone, Default)]
pub struct Hook {
    /// Runs once from `run_init_hooks`.
    pub init: Option<InitHook>,
    /// Runs once per request from `run_request_hooks`.
    pub req: Option<RequestHook>,
}

impl Hook {
    /// Creates a hook with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the init callback.
    #[must_use]
    pub fn with_init<F>(mut self, f: F) -> Self
    where
        F: Fn(HookContext) -> AppResult<HookContext> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(f));
        self
    }

    /// Sets the request callback.
    #[must_use]
    pub fn with_request<F>(mut self, f: F) -> Self
    where
        F: Fn(HookContext, &InstructionRequest) -> AppResult<HookContext> + Send + Sync + 'static,
    {
        self.req = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("init", &self.init.as_ref().map(|_| "<closure>"))
            .field("req", &self.req.as_ref().map(|_| "<closure>"))
            .finish()
    }
}

/// Wraps a closure as a [`HookFactory`].
pub fn factory<F>(f: F) -> HookFactory
where
    F: Fn(&[String]) -> Hook + Send + Sync + 'static,
{
    Arc::new(f)
}
