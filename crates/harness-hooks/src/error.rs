//! Hook registry errors.

use harness_core::error::{AppError, ErrorKind};
use thiserror::Error;

use crate::context::HookContext;

/// Errors raised by the hook registry.
#[derive(Debug, Error)]
pub enum HookError {
    /// `enable_hook` named a hook with no registered factory.
    #[error("hook '{name}' is not registered")]
    UnknownHook {
        /// The requested name.
        name: String,
    },

    /// An init callback failed; remaining init hooks did not run.
    #[error("init hook '{name}' failed: {source}")]
    InitHook {
        /// The failing hook.
        name: String,
        /// The context as it was just before the failing call.
        context: HookContext,
        /// The callback's error.
        #[source]
        source: AppError,
    },

    /// A request callback failed. Only ever logged.
    #[error("request hook '{name}' failed: {source}")]
    RequestHook {
        /// The failing hook.
        name: String,
        /// The callback's error.
        #[source]
        source: AppError,
    },

    /// A hook spec string could not be parsed.
    #[error("invalid hook spec '{spec}': {reason}")]
    InvalidSpec {
        /// The offending input.
        spec: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Serialized hook options were malformed.
    #[error("invalid serialized hook options: {0}")]
    Options(#[from] serde_json::Error),
}

impl HookError {
    /// Returns the context carried by an init failure.
    pub fn context(&self) -> Option<&HookContext> {
        match self {
            Self::InitHook { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Returns the name of the hook the error concerns, if any.
    pub fn hook_name(&self) -> Option<&str> {
        match self {
            Self::UnknownHook { name }
            | Self::InitHook { name, .. }
            | Self::RequestHook { name, .. } => Some(name),
            Self::InvalidSpec { .. } | Self::Options(_) => None,
        }
    }
}

impl From<HookError> for AppError {
    fn from(err: HookError) -> Self {
        let kind = match &err {
            HookError::UnknownHook { .. } => ErrorKind::NotFound,
            HookError::InvalidSpec { .. } | HookError::Options(_) => ErrorKind::Validation,
            HookError::InitHook { .. } | HookError::RequestHook { .. } => ErrorKind::Hook,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_app_error() {
        let err: AppError = HookError::UnknownHook {
            name: "profiler".to_string(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "hook 'profiler' is not registered");

        let err: AppError = HookError::InitHook {
            name: "sink".to_string(),
            context: HookContext::new(),
            source: AppError::hook("down"),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Hook);
        assert!(std::error::Error::source(&err).is_some());
    }
}
