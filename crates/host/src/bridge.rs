//! Script bridge into the embedded runtime
//!
//! Every call goes through one FIFO pump, so the runtime sees scripts in the
//! order the host issued them whether or not the caller waits for a result.
//! Completion is not serialised: an evaluation that is still pending after
//! it has been started finishes on its own task, and a script that never
//! resolves only stalls its own caller.
//!
//! A request/response call resolves through its own oneshot, which gives the
//! exactly-once delivery the runtime contract promises without a pending-call
//! table.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;

use async_trait::async_trait;
use rich_editor_protocol::ScriptCall;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};

use crate::error::BridgeError;

/// Outcome of a single script evaluation
pub type ScriptCallResult = Result<Value, BridgeError>;

/// The embedded script runtime (the web view's script engine)
///
/// Implementations evaluate a script fragment and hand back its completion
/// value. One evaluation yields exactly one result.
#[async_trait]
pub trait ScriptRuntime: Send + Sync {
    async fn evaluate(&self, script: &str) -> ScriptCallResult;
}

enum BridgeJob {
    Execute(String),
    Call(String, oneshot::Sender<ScriptCallResult>),
    Flush(oneshot::Sender<()>),
}

/// Handle for issuing calls into the runtime
///
/// Cloning is cheap; all clones feed the same pump.
#[derive(Clone)]
pub struct ScriptBridge {
    jobs: mpsc::UnboundedSender<BridgeJob>,
    call_timeout: Option<Duration>,
}

impl ScriptBridge {
    /// Start the bridge pump on the current tokio runtime
    pub fn spawn(runtime: Arc<dyn ScriptRuntime>) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(pump(runtime, rx));
        Self {
            jobs,
            call_timeout: None,
        }
    }

    /// Give up on request/response calls after `limit`
    #[must_use]
    pub fn with_call_timeout(mut self, limit: Option<Duration>) -> Self {
        self.call_timeout = limit;
        self
    }

    /// Fire-and-forget: returns immediately, failures are only logged
    pub fn execute(&self, script: impl Into<String>) {
        let script = script.into();
        if self.jobs.send(BridgeJob::Execute(script)).is_err() {
            tracing::warn!("Script bridge closed, dropping call");
        }
    }

    /// Evaluate and wait for the runtime's result
    pub async fn execute_for_result(&self, script: impl Into<String>) -> ScriptCallResult {
        let (reply, rx) = oneshot::channel();
        if self.jobs.send(BridgeJob::Call(script.into(), reply)).is_err() {
            return Err(BridgeError::Disconnected);
        }

        match self.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(result) => result.unwrap_or(Err(BridgeError::Disconnected)),
                Err(_) => Err(BridgeError::Timeout(limit)),
            },
            None => rx.await.unwrap_or(Err(BridgeError::Disconnected)),
        }
    }

    /// Wait until every call issued before this one has been evaluated
    ///
    /// Waits on a stuck earlier call too; later calls are not held up.
    pub async fn flush(&self) {
        let (done, rx) = oneshot::channel();
        if self.jobs.send(BridgeJob::Flush(done)).is_ok() {
            let _ = rx.await;
        }
    }

    pub fn call(&self, call: &ScriptCall) {
        self.execute(call.to_string());
    }

    pub async fn string(&self, call: &ScriptCall) -> Result<String, BridgeError> {
        self.execute_for_result(call.to_string())
            .await
            .map(|v| coerce_string(&v))
    }

    pub async fn int(&self, call: &ScriptCall) -> Result<i64, BridgeError> {
        self.execute_for_result(call.to_string())
            .await
            .map(|v| coerce_int(&v))
    }

    pub async fn float(&self, call: &ScriptCall) -> Result<f64, BridgeError> {
        self.execute_for_result(call.to_string())
            .await
            .map(|v| coerce_float(&v))
    }

    pub async fn bool(&self, call: &ScriptCall) -> Result<bool, BridgeError> {
        self.execute_for_result(call.to_string())
            .await
            .map(|v| coerce_bool(&v))
    }
}

type Evaluation = Pin<Box<dyn Future<Output = ()> + Send>>;

async fn pump(runtime: Arc<dyn ScriptRuntime>, mut jobs: mpsc::UnboundedReceiver<BridgeJob>) {
    let mut in_flight = JoinSet::new();
    let mut barrier: Option<JoinHandle<()>> = None;

    while let Some(job) = jobs.recv().await {
        while in_flight.try_join_next().is_some() {}

        let evaluation: Evaluation = match job {
            BridgeJob::Execute(script) => {
                let runtime = runtime.clone();
                Box::pin(async move {
                    if let Err(e) = runtime.evaluate(&script).await {
                        tracing::warn!(error = %e, script = %script, "Script call failed");
                    }
                })
            }
            BridgeJob::Call(script, reply) => {
                let runtime = runtime.clone();
                Box::pin(async move {
                    let result = runtime.evaluate(&script).await;
                    if let Err(e) = &result {
                        tracing::debug!(error = %e, script = %script, "Script call returned error");
                    }
                    // Receiver may have timed out already
                    let _ = reply.send(result);
                })
            }
            BridgeJob::Flush(done) => {
                let earlier = std::mem::take(&mut in_flight);
                let previous = barrier.take();
                barrier = Some(tokio::spawn(settle(previous, earlier, done)));
                continue;
            }
        };
        start(evaluation, &mut in_flight).await;
    }

    in_flight.detach_all();
    tracing::debug!("Script bridge pump stopped");
}

/// Poll once in issue order; whatever is still pending moves to its own task
async fn start(mut evaluation: Evaluation, in_flight: &mut JoinSet<()>) {
    let first = std::future::poll_fn(|cx| Poll::Ready(evaluation.as_mut().poll(cx))).await;
    if first.is_pending() {
        in_flight.spawn(evaluation);
    }
}

/// Resolve a flush once the previous barrier and every earlier evaluation are done
async fn settle(
    previous: Option<JoinHandle<()>>,
    mut earlier: JoinSet<()>,
    done: oneshot::Sender<()>,
) {
    if let Some(previous) = previous {
        let _ = previous.await;
    }
    while earlier.join_next().await.is_some() {}
    let _ = done.send(());
}

/// Coerce a completion value to a string; null and containers become ""
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Coerce a completion value to an integer, rounding fractions; otherwise 0
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_int(value: &Value) -> i64 {
    let rounded = |f: f64| f.is_finite().then(|| f.round() as i64);
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(rounded)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(rounded))
        }
        _ => None,
    };
    parsed.unwrap_or(0)
}

pub fn coerce_float(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    /// Echoes the script back and records evaluation order
    #[derive(Default)]
    struct EchoRuntime {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ScriptRuntime for EchoRuntime {
        async fn evaluate(&self, script: &str) -> ScriptCallResult {
            self.seen.lock().unwrap().push(script.to_string());
            if script.starts_with("throw") {
                return Err(BridgeError::Runtime("boom".into()));
            }
            Ok(Value::String(script.to_string()))
        }
    }

    /// Never answers `stuck*` scripts, sleeps on `slow*`, echoes the rest
    #[derive(Default)]
    struct StuckRuntime {
        started: Mutex<Vec<String>>,
        finished: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ScriptRuntime for StuckRuntime {
        async fn evaluate(&self, script: &str) -> ScriptCallResult {
            self.started.lock().unwrap().push(script.to_string());
            if script.starts_with("stuck") {
                std::future::pending::<()>().await;
            }
            if script.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(30)).await;
            }
            self.finished.lock().unwrap().push(script.to_string());
            Ok(Value::String(script.to_string()))
        }
    }

    #[tokio::test]
    async fn test_calls_evaluate_in_issue_order() {
        let runtime = Arc::new(EchoRuntime::default());
        let bridge = ScriptBridge::spawn(runtime.clone());

        bridge.execute("a");
        bridge.execute("throw b");
        let result = bridge.execute_for_result("c").await;
        bridge.execute("d");
        bridge.flush().await;

        assert_eq!(result, Ok(json!("c")));
        assert_eq!(*runtime.seen.lock().unwrap(), vec!["a", "throw b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_failure_reaches_caller() {
        let bridge = ScriptBridge::spawn(Arc::new(EchoRuntime::default()));
        let result = bridge.execute_for_result("throw").await;
        assert_eq!(result, Err(BridgeError::Runtime("boom".into())));
    }

    #[tokio::test]
    async fn test_timeout_resolves_once() {
        let bridge = ScriptBridge::spawn(Arc::new(StuckRuntime::default()))
            .with_call_timeout(Some(Duration::from_millis(20)));
        let result = bridge.execute_for_result("stuck").await;
        assert_eq!(result, Err(BridgeError::Timeout(Duration::from_millis(20))));
    }

    #[tokio::test]
    async fn test_stuck_call_does_not_block_later_calls() {
        let runtime = Arc::new(StuckRuntime::default());
        let bridge = ScriptBridge::spawn(runtime.clone())
            .with_call_timeout(Some(Duration::from_millis(50)));

        bridge.execute("stuck fire-and-forget");
        let after_execute = bridge.execute_for_result("RE.getHtml()").await;
        let stuck = bridge.execute_for_result("stuck request").await;
        let after_call = bridge.execute_for_result("RE.getCommandQueue()").await;

        assert_eq!(after_execute, Ok(json!("RE.getHtml()")));
        assert_eq!(stuck, Err(BridgeError::Timeout(Duration::from_millis(50))));
        assert_eq!(after_call, Ok(json!("RE.getCommandQueue()")));
        assert_eq!(
            *runtime.started.lock().unwrap(),
            vec![
                "stuck fire-and-forget",
                "RE.getHtml()",
                "stuck request",
                "RE.getCommandQueue()"
            ]
        );
    }

    #[tokio::test]
    async fn test_flush_waits_for_pending_evaluations() {
        let runtime = Arc::new(StuckRuntime::default());
        let bridge = ScriptBridge::spawn(runtime.clone());

        bridge.execute("slow one");
        bridge.execute("fast");
        bridge.flush().await;
        bridge.execute("slow two");
        bridge.flush().await;

        assert_eq!(*runtime.finished.lock().unwrap(), vec!["fast", "slow one", "slow two"]);
    }

    #[test]
    fn test_coerce_string() {
        assert_eq!(coerce_string(&json!("x")), "x");
        assert_eq!(coerce_string(&json!(12)), "12");
        assert_eq!(coerce_string(&Value::Null), "");
        assert_eq!(coerce_string(&json!({"a": 1})), "");
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(coerce_int(&json!(520)), 520);
        assert_eq!(coerce_int(&json!(27.6)), 28);
        assert_eq!(coerce_int(&json!(" 42 ")), 42);
        assert_eq!(coerce_int(&json!("-10.4")), -10);
        assert_eq!(coerce_int(&json!("tall")), 0);
        assert_eq!(coerce_int(&Value::Null), 0);
        assert!((coerce_float(&json!("1.5")) - 1.5).abs() < f64::EPSILON);
        assert!(coerce_float(&json!([1])).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coerce_bool() {
        assert!(coerce_bool(&json!(true)));
        assert!(coerce_bool(&json!("true")));
        assert!(coerce_bool(&json!(1)));
        assert!(!coerce_bool(&json!(0)));
        assert!(!coerce_bool(&json!("yes")));
        assert!(!coerce_bool(&Value::Null));
    }
}
