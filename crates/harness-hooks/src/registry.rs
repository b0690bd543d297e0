//! Hook registry: named factories and the active hook set.
//!
//! Hook modules register a factory under a name at load time. Enabling a
//! name builds a [`Hook`] from that factory and places it in the active set.
//! The run functions snapshot the active set under the lock, release it, and
//! then call the callbacks in lexicographic name order, threading a single
//! [`HookContext`] through them.
//!
//! - Init hooks are fail-fast: the first error stops the run and is returned.
//! - Request hooks are best-effort: an error is logged, the failing hook's
//!   context is discarded, and the next hook runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info, warn};

use crate::context::HookContext;
use crate::error::HookError;
use crate::hook::{Hook, HookFactory};
use crate::request::InstructionRequest;

/// A constructed hook together with the options it was built from.
#[derive(Debug, Clone)]
struct ActiveHook {
    options: Vec<String>,
    hook: Hook,
}

/// Both mappings, guarded by a single lock.
#[derive(Default)]
struct RegistryState {
    /// Hook name → factory.
    factories: HashMap<String, HookFactory>,
    /// Hook name → constructed hook, ordered by name.
    active: BTreeMap<String, ActiveHook>,
}

/// Registry of hook factories and enabled hooks.
///
/// Every method takes `&self` and may be called from any thread. Callbacks
/// never run while the lock is held, so a slow hook does not stall
/// registration or enabling. Callbacks must not call back into the registry
/// that is running them.
#[derive(Default)]
pub struct HookRegistry {
    state: RwLock<RegistryState>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        let mut factories: Vec<&String> = state.factories.keys().collect();
        factories.sort();
        f.debug_struct("HookRegistry")
            .field("factories", &factories)
            .field("active", &state.active.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`, replacing any previous factory.
    ///
    /// Hooks already enabled from the previous factory stay active until
    /// they are enabled again.
    pub fn register_hook(&self, name: impl Into<String>, factory: HookFactory) {
        let name = name.into();
        if name.is_empty() {
            warn!("Ignoring hook registration with an empty name");
            return;
        }

        let replaced = self.write().factories.insert(name.clone(), factory);

        if replaced.is_some() {
            warn!(hook = %name, "Hook factory replaced");
        } else {
            debug!(hook = %name, "Hook factory registered");
        }
    }

    /// Builds the named hook with `options` and makes it active.
    ///
    /// Enabling an already active hook rebuilds it and replaces the stored
    /// value. When several callers enable the same name concurrently, exactly
    /// one of their hooks ends up stored; which one is unspecified.
    pub fn enable_hook<S: AsRef<str>>(&self, name: &str, options: &[S]) -> Result<(), HookError> {
        let factory = self
            .read()
            .factories
            .get(name)
            .cloned()
            .ok_or_else(|| HookError::UnknownHook {
                name: name.to_string(),
            })?;

        let options: Vec<String> = options.iter().map(|o| o.as_ref().to_string()).collect();
        let hook = factory(&options);

        info!(hook = %name, options = ?options, "Hook enabled");

        self.write()
            .active
            .insert(name.to_string(), ActiveHook { options, hook });

        Ok(())
    }

    /// Runs every active init callback in name order.
    ///
    /// Each callback receives the context returned by the previous one. On
    /// the first failure the remaining callbacks are skipped and the error,
    /// carrying the context from just before the failing call, is returned.
    pub fn run_init_hooks(&self, ctx: HookContext) -> Result<HookContext, HookError> {
        let mut ctx = ctx;

        for (name, hook) in self.snapshot() {
            let Some(init) = hook.init else {
                continue;
            };

            match init(ctx.clone()) {
                Ok(next) => ctx = next,
                Err(source) => {
                    error!(hook = %name, error = %source, "Init hook failed");
                    return Err(HookError::InitHook {
                        name,
                        context: ctx,
                        source,
                    });
                }
            }
        }

        Ok(ctx)
    }

    /// Runs every active request callback in name order.
    ///
    /// Errors are logged and never returned. A failing hook's context is
    /// discarded and the next hook receives the context the failing hook was
    /// given.
    pub fn run_request_hooks(&self, ctx: HookContext, req: &InstructionRequest) -> HookContext {
        let mut ctx = ctx;

        for (name, hook) in self.snapshot() {
            let Some(handler) = hook.req else {
                continue;
            };

            match handler(ctx.clone(), req) {
                Ok(next) => ctx = next,
                Err(source) => {
                    let err = HookError::RequestHook { name, source };
                    warn!(
                        instruction_id = %req.instruction_id,
                        error = %err,
                        "Request hook failed, continuing"
                    );
                }
            }
        }

        ctx
    }

    /// Returns the options the named hook was last enabled with, or `None`
    /// when it is not active.
    pub fn is_enabled(&self, name: &str) -> Option<Vec<String>> {
        self.read().active.get(name).map(|a| a.options.clone())
    }

    /// Returns whether a factory is registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.read().factories.contains_key(name)
    }

    /// Returns all registered hook names, sorted.
    pub fn registered_hooks(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns all active hook names, in run order.
    pub fn active_hooks(&self) -> Vec<String> {
        self.read().active.keys().cloned().collect()
    }

    /// Returns the active set as name → options.
    pub fn enabled_options(&self) -> BTreeMap<String, Vec<String>> {
        self.read()
            .active
            .iter()
            .map(|(name, a)| (name.clone(), a.options.clone()))
            .collect()
    }

    /// Serializes the active set to a JSON object of name → options.
    ///
    /// Feeding the result to [`HookRegistry::enable_serialized`] on another
    /// registry with the same factories reproduces the active set.
    pub fn serialize_enabled(&self) -> Result<String, HookError> {
        Ok(serde_json::to_string(&self.enabled_options())?)
    }

    /// Enables every hook in a string produced by
    /// [`HookRegistry::serialize_enabled`].
    ///
    /// Stops at the first unregistered name; hooks enabled before it stay
    /// enabled.
    pub fn enable_serialized(&self, json: &str) -> Result<(), HookError> {
        let hooks: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        for (name, options) in &hooks {
            self.enable_hook(name, options.as_slice())?;
        }
        Ok(())
    }

    /// Clones the active hooks so callbacks can run without the lock.
    fn snapshot(&self) -> Vec<(String, Hook)> {
        self.read()
            .active
            .iter()
            .map(|(name, a)| (name.clone(), a.hook.clone()))
            .collect()
    }

    // No operation panics while holding the lock, so a poisoned lock still
    // guards consistent maps.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
