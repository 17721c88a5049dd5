//! The script execution harness.
//!
//! A [`ScriptHarness`] owns one sandboxed engine and one top-level context.
//! Each submission compiles into a fresh child context and evaluates on a
//! blocking worker. Every outcome, including faults, is reported through the
//! [`MessageLog`]; nothing the script does propagates to the caller.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use canvas_core::CanvasStore;
use rhai::{Dynamic, Engine, FnPtr};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::api::register_primitives;
use crate::bridge::CanvasBridge;
use crate::config::HarnessConfig;
use crate::console::MessageLog;
use crate::context::{ExecutionId, TopLevelContext};
use crate::error::{ScriptError, ScriptResult};
use crate::fault::ScriptFault;

/// How one execution ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The script ran to the end. Holds the rendered result, `None` for void.
    Completed(Option<String>),
    /// The script produced a pending placeholder; nothing was logged.
    Suppressed,
    /// The interpreter raised a fault.
    Failed(ScriptFault),
    /// The worker died before producing a result.
    Aborted(String),
}

impl ExecutionOutcome {
    /// Whether the script ran without faulting.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Suppressed)
    }
}

/// Handle to a submitted execution.
#[derive(Debug)]
pub struct ExecutionHandle {
    id: ExecutionId,
    join: JoinHandle<ExecutionOutcome>,
    log: MessageLog,
}

impl ExecutionHandle {
    /// The execution id.
    #[must_use]
    pub fn id(&self) -> ExecutionId {
        self.id
    }

    /// Whether the worker has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the worker to finish.
    ///
    /// A worker that could not be joined is reported as a single
    /// `Error:` line.
    pub async fn wait(self) -> ExecutionOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) => {
                let message = err.to_string();
                tracing::warn!("Execution {} could not be joined: {message}", self.id);
                self.log.error(format!("Error: {message}"));
                ExecutionOutcome::Aborted(message)
            }
        }
    }
}

/// Decrements the in-flight count when the worker ends, however it ends.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(count: &Arc<AtomicUsize>) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(count))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs scripts against a canvas and reports to a message log.
///
/// # Example
///
/// ```no_run
/// use canvas_core::CanvasStore;
/// use canvas_script::{MessageLog, ScriptHarness};
///
/// # async fn demo() -> canvas_script::ScriptResult<()> {
/// let store = CanvasStore::new();
/// let log = MessageLog::new();
/// let harness = ScriptHarness::attached(store.clone(), log.clone());
///
/// harness.execute("DrawRect(10, 10, 50, 30);").await?;
/// assert_eq!(store.shape_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScriptHarness {
    engine: Arc<Engine>,
    top: Arc<TopLevelContext>,
    bridge: CanvasBridge,
    log: MessageLog,
    config: Arc<HarnessConfig>,
    in_flight: Arc<AtomicUsize>,
}

impl ScriptHarness {
    /// Build the runtime, logging each initialization step to `log`.
    #[must_use]
    pub fn new(bridge: CanvasBridge, log: MessageLog, config: HarnessConfig) -> Self {
        log.debug("Script runtime is initializing...");

        let mut engine = Engine::new();
        if let Some(max) = config.max_operations {
            engine.set_max_operations(max);
        }
        engine.set_max_call_levels(config.max_call_levels);
        engine.set_max_string_size(config.max_string_size);
        engine.set_max_array_size(config.max_array_size);
        log.debug("[OK] Script runtime initialized.");

        let print_log = log.clone();
        engine.on_print(move |text| print_log.info(text));
        let debug_log = log.clone();
        engine.on_debug(move |text, _source, _pos| debug_log.info(text));
        log.debug("[OK] Script events initialized.");

        engine.set_fail_on_invalid_map_property(true);
        log.debug("[OK] Error channel configured.");

        register_primitives(&mut engine, &bridge);
        log.debug("[OK] Canvas primitives registered.");

        let top = TopLevelContext::new();
        log.debug("[OK] Top-level context created.");

        log.success("Script runtime ready.");
        tracing::debug!("Script harness ready");

        Self {
            engine: Arc::new(engine),
            top: Arc::new(top),
            bridge,
            log,
            config: Arc::new(config),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build a harness already attached to `store` with default limits.
    #[must_use]
    pub fn attached(store: CanvasStore, log: MessageLog) -> Self {
        Self::new(CanvasBridge::attached(store), log, HarnessConfig::default())
    }

    /// The bridge primitives are routed through.
    #[must_use]
    pub fn bridge(&self) -> &CanvasBridge {
        &self.bridge
    }

    /// The console log.
    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The shared parent context.
    #[must_use]
    pub fn top_level(&self) -> &TopLevelContext {
        &self.top
    }

    /// Number of executions whose worker has not finished yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit `source` for background evaluation.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::EmptySource`] for empty or whitespace-only
    /// source (nothing is logged), or [`ScriptError::NoRuntime`] outside a
    /// Tokio runtime.
    pub fn submit(&self, source: &str) -> ScriptResult<ExecutionHandle> {
        if source.trim().is_empty() {
            return Err(ScriptError::EmptySource);
        }
        let runtime = Handle::try_current().map_err(|e| ScriptError::NoRuntime(e.to_string()))?;

        let id = ExecutionId::new();
        self.log.debug("Script initializing...");
        tracing::debug!("Submitting execution {id}");

        let guard = InFlightGuard::enter(&self.in_flight);
        let engine = Arc::clone(&self.engine);
        let top = Arc::clone(&self.top);
        let log = self.log.clone();
        let config = Arc::clone(&self.config);
        let source = source.to_string();

        let join = runtime.spawn_blocking(move || {
            let _guard = guard;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                run_execution(id, &engine, &top, &source, &log, &config)
            }));
            outcome.unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                tracing::warn!("Execution {id} panicked: {message}");
                log.error(format!("Error: {message}"));
                ExecutionOutcome::Aborted(message)
            })
        });

        Ok(ExecutionHandle {
            id,
            join,
            log: self.log.clone(),
        })
    }

    /// Submit `source` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// See [`ScriptHarness::submit`].
    pub async fn execute(&self, source: &str) -> ScriptResult<ExecutionOutcome> {
        Ok(self.submit(source)?.wait().await)
    }
}

fn run_execution(
    id: ExecutionId,
    engine: &Engine,
    top: &TopLevelContext,
    source: &str,
    log: &MessageLog,
    config: &HarnessConfig,
) -> ExecutionOutcome {
    let mut context = match top.child(id, engine, source) {
        Ok(context) => context,
        Err(fault) => return report_fault(log, fault, config),
    };
    log.debug("[OK] Script initialized.");

    match context.evaluate(engine) {
        Ok(Ok(value)) => report_value(log, &value),
        Ok(Err(fault)) => report_fault(log, fault, config),
        Err(err) => {
            let message = err.to_string();
            log.error(format!("Error: {message}"));
            ExecutionOutcome::Aborted(message)
        }
    }
}

fn report_value(log: &MessageLog, value: &Dynamic) -> ExecutionOutcome {
    if value.is_unit() {
        log.success("Script OK.");
        ExecutionOutcome::Completed(None)
    } else if value.is::<FnPtr>() {
        ExecutionOutcome::Suppressed
    } else {
        let text = value.to_string();
        log.success(format!("=> {text}"));
        ExecutionOutcome::Completed(Some(text))
    }
}

fn report_fault(log: &MessageLog, fault: ScriptFault, config: &HarnessConfig) -> ExecutionOutcome {
    let fault = fault.with_default_help(config.help_url.as_deref());
    tracing::debug!("Script fault: {}", fault.code);
    for line in fault.lines() {
        log.error(line);
    }
    ExecutionOutcome::Failed(fault)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "script worker panicked".to_string()
    }
}
