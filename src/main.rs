//! Worker Harness: runs registered hooks around a worker's lifecycle.
//!
//! Main entry point: loads configuration, installs logging, registers the
//! diagnostics hooks, enables the configured ones, runs init hooks once and
//! then request hooks for every instruction read from stdin.

mod cli;

use clap::Parser;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing_subscriber::{EnvFilter, fmt};

use harness_core::config::AppConfig;
use harness_core::config::hooks::HooksConfig;
use harness_core::error::AppError;
use harness_hooks::{HookContext, HookRegistry, HookSpec, InstructionRequest};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Worker error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    // Stdout carries request results, so logs go to stderr.
    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Main worker run function
async fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting worker harness v{}", env!("CARGO_PKG_VERSION"));

    let registry = harness_hooks::registry();
    hook_diagnostics::register_all(registry);

    // ── Step 1: Enable hooks ─────────────────────────────────────
    enable_hooks(registry, &config.hooks, &cli.hooks, cli.hooks_json.as_deref())?;

    if cli.list_hooks {
        for line in list_hooks(registry) {
            println!("{line}");
        }
        return Ok(());
    }

    // ── Step 2: Init hooks (fatal on failure) ────────────────────
    let base = registry.run_init_hooks(HookContext::new())?;
    tracing::info!(
        hooks = ?registry.active_hooks(),
        serialized = %registry.serialize_enabled()?,
        "Init hooks complete"
    );

    // ── Step 3: Request loop ─────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let req = parse_request(line);
        let base = base.clone();
        tasks.spawn_blocking(move || {
            let ctx = harness_hooks::run_request_hooks(base, &req);
            (req.instruction_id, ctx)
        });

        while let Some(done) = tasks.try_join_next() {
            report(done);
        }
    }

    while let Some(done) = tasks.join_next().await {
        report(done);
    }

    tracing::info!("Input closed, worker exiting");
    Ok(())
}

/// One line per registered hook: name, enabled state and options.
fn list_hooks(registry: &HookRegistry) -> Vec<String> {
    registry
        .registered_hooks()
        .into_iter()
        .map(|name| match registry.is_enabled(&name) {
            Some(options) => format!("{name}\tenabled\t{}", options.join(",")),
            None => format!("{name}\tdisabled"),
        })
        .collect()
}

/// Enables hooks from config, then the command line, then serialized JSON.
fn enable_hooks(
    registry: &HookRegistry,
    config: &HooksConfig,
    cli_hooks: &[HookSpec],
    hooks_json: Option<&str>,
) -> Result<(), AppError> {
    for spec in &config.enabled {
        registry.enable_hook(&spec.name, spec.options.as_slice())?;
    }

    for spec in cli_hooks {
        registry.enable_hook(&spec.name, spec.options.as_slice())?;
    }

    if let Some(json) = hooks_json {
        registry.enable_serialized(json)?;
    }

    Ok(())
}

/// Parses a JSON request line; any other text becomes the payload of a
/// request with a generated id.
fn parse_request(line: &str) -> InstructionRequest {
    match serde_json::from_str::<InstructionRequest>(line) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(error = %e, "Input line is not a JSON request, wrapping it");
            InstructionRequest::new(uuid::Uuid::now_v7().to_string(), "raw")
                .with_payload(Value::String(line.to_string()))
        }
    }
}

/// Prints the outcome of one request as a JSON line.
fn report(done: Result<(String, HookContext), JoinError>) {
    if let Some(line) = render_result(done) {
        println!("{line}");
    }
}

/// Renders a finished request as JSON. A request task that panicked is
/// logged and skipped so the worker keeps serving.
fn render_result(done: Result<(String, HookContext), JoinError>) -> Option<Value> {
    let (instruction_id, ctx) = match done {
        Ok(done) => done,
        Err(e) => {
            tracing::error!(error = %e, "Request task failed, skipping");
            return None;
        }
    };

    let values: serde_json::Map<String, Value> = ctx
        .keys()
        .into_iter()
        .filter_map(|k| ctx.value(k).map(|v| (k.to_string(), v.clone())))
        .collect();

    tracing::debug!(instruction_id = %instruction_id, keys = values.len(), "Request hooks complete");
    Some(json!({ "instruction_id": instruction_id, "context": values }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use harness_core::config::hooks::HookSpecConfig;

    fn test_registry() -> HookRegistry {
        let registry = HookRegistry::new();
        hook_diagnostics::register_all(&registry);
        registry
    }

    #[test]
    fn test_cli_hooks_override_config() {
        let registry = test_registry();
        let config = HooksConfig {
            enabled: vec![HookSpecConfig {
                name: "request_log".to_string(),
                options: vec!["level=info".to_string()],
            }],
        };
        let cli_hooks = vec![HookSpec::new("request_log", vec!["level=debug".to_string()])];

        enable_hooks(&registry, &config, &cli_hooks, Some(r#"{"timing":[]}"#)).expect("enable");

        assert_eq!(
            registry.is_enabled("request_log"),
            Some(vec!["level=debug".to_string()])
        );
        assert_eq!(registry.is_enabled("timing"), Some(Vec::new()));
    }

    #[test]
    fn test_unknown_configured_hook_is_fatal() {
        let registry = test_registry();
        let config = HooksConfig {
            enabled: vec![HookSpecConfig {
                name: "profiler".to_string(),
                options: Vec::new(),
            }],
        };

        let err = enable_hooks(&registry, &config, &[], None).expect_err("should fail");
        assert_eq!(err.kind, harness_core::error::ErrorKind::NotFound);
        assert!(registry.active_hooks().is_empty());
    }

    #[test]
    fn test_parse_request() {
        let req = parse_request(r#"{"instruction_id":"i-1","kind":"process_bundle"}"#);
        assert_eq!(req.instruction_id, "i-1");
        assert_eq!(req.kind, "process_bundle");

        let raw = parse_request("hello");
        assert_eq!(raw.kind, "raw");
        assert_eq!(raw.payload, Value::String("hello".to_string()));
    }

    #[test]
    fn test_list_hooks_reports_enabled_state() {
        let registry = test_registry();
        let config = HooksConfig {
            enabled: vec![HookSpecConfig {
                name: "timing".to_string(),
                options: Vec::new(),
            }],
        };
        let cli_hooks = vec![HookSpec::new("request_log", vec!["level=debug".to_string()])];
        enable_hooks(&registry, &config, &cli_hooks, None).expect("enable");

        assert_eq!(
            list_hooks(&registry),
            vec!["request_log\tenabled\tlevel=debug", "timing\tenabled\t"]
        );
    }

    #[test]
    fn test_list_hooks_before_enabling() {
        let registry = test_registry();
        assert_eq!(
            list_hooks(&registry),
            vec!["request_log\tdisabled", "timing\tdisabled"]
        );
    }

    #[test]
    fn test_render_result() {
        let ctx = HookContext::new().with_value("timing.queue_ms", 3);
        let rendered = render_result(Ok(("i-9".to_string(), ctx))).expect("rendered");
        assert_eq!(
            rendered,
            json!({ "instruction_id": "i-9", "context": { "timing.queue_ms": 3 } })
        );
    }

    #[tokio::test]
    async fn test_panicking_request_task_is_skipped() {
        let mut tasks = JoinSet::new();
        tasks.spawn_blocking(|| -> (String, HookContext) { panic!("hook blew up") });
        tasks.spawn_blocking(|| ("i-2".to_string(), HookContext::new()));

        let mut rendered = Vec::new();
        while let Some(done) = tasks.join_next().await {
            rendered.extend(render_result(done));
        }

        assert_eq!(rendered, vec![json!({ "instruction_id": "i-2", "context": {} })]);
    }
}
