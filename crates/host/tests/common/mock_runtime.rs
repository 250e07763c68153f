//! In-memory stand-in for the embedded editing script

use std::sync::Mutex;

use async_trait::async_trait;
use rich_editor_host::protocol::ScriptCall;
use rich_editor_host::{BridgeError, ScriptCallResult, ScriptRuntime};
use serde_json::{json, Value};

/// Document state the mock answers getters from
#[derive(Debug, Clone)]
pub struct MockDocument {
    pub html: String,
    pub text: String,
    pub placeholder: String,
    pub line_height: i64,
    pub client_height: Value,
    pub caret_y: i64,
    pub editable: bool,
    pub selected_href: String,
    pub range_selection: bool,
    pub caret_selection: bool,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self {
            html: String::new(),
            text: String::new(),
            placeholder: String::new(),
            line_height: 28,
            client_height: json!(300),
            caret_y: 0,
            editable: true,
            selected_href: String::new(),
            range_selection: false,
            caret_selection: false,
        }
    }
}

#[derive(Default)]
struct Inner {
    doc: MockDocument,
    queue: Vec<String>,
    raw_queue: Option<Value>,
    failing: Vec<String>,
    scripts: Vec<String>,
}

#[derive(Default)]
pub struct MockRuntime {
    inner: Mutex<Inner>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append commands to the script-side queue
    pub fn enqueue(&self, commands: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.extend(commands.iter().map(ToString::to_string));
    }

    /// Answer the next queue fetch with `payload` verbatim
    pub fn set_raw_queue(&self, payload: Value) {
        self.inner.lock().unwrap().raw_queue = Some(payload);
    }

    /// Make every call to `method` fail
    pub fn fail(&self, method: &str) {
        self.inner.lock().unwrap().failing.push(method.to_string());
    }

    pub fn edit(&self, f: impl FnOnce(&mut MockDocument)) {
        f(&mut self.inner.lock().unwrap().doc);
    }

    pub fn document(&self) -> MockDocument {
        self.inner.lock().unwrap().doc.clone()
    }

    /// Every script evaluated so far, in order
    pub fn scripts(&self) -> Vec<String> {
        self.inner.lock().unwrap().scripts.clone()
    }

    /// Evaluated scripts other than the read-only queries
    pub fn effects(&self) -> Vec<String> {
        self.scripts()
            .into_iter()
            .filter(|s| {
                ScriptCall::parse(s).is_some_and(|c| {
                    !c.method.starts_with("get")
                        && !c.method.ends_with("Exists")
                        && c.method != "isContentEditable"
                })
            })
            .collect()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.scripts()
            .iter()
            .filter_map(|s| ScriptCall::parse(s))
            .filter(|c| c.method == method)
            .count()
    }

    pub fn clear_scripts(&self) {
        self.inner.lock().unwrap().scripts.clear();
    }
}

fn px(arg: Option<&str>) -> Option<i64> {
    arg?.strip_suffix("px")?.parse().ok()
}

#[async_trait]
impl ScriptRuntime for MockRuntime {
    async fn evaluate(&self, script: &str) -> ScriptCallResult {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        inner.scripts.push(script.to_string());

        let Some(call) = ScriptCall::parse(script) else {
            return Err(BridgeError::Runtime(format!("SyntaxError: {script}")));
        };
        if inner.failing.contains(&call.method) {
            return Err(BridgeError::Runtime(format!("{} is not a function", call.method)));
        }

        let first = call.args.first();
        let doc = &mut inner.doc;
        let value = match call.method.as_str() {
            "getHtml" => json!(doc.html),
            "getText" => json!(doc.text),
            "getLineHeight" => json!(doc.line_height),
            "getClientHeight" => doc.client_height.clone(),
            "getRelativeCaretYPosition" => json!(doc.caret_y),
            "isContentEditable" => json!(doc.editable),
            "getSelectedHref" => json!(doc.selected_href),
            "rangeSelectionExists" => json!(doc.range_selection),
            "rangeOrCaretSelectionExists" => json!(doc.range_selection || doc.caret_selection),
            "setHtml" => {
                doc.html = first.and_then(|a| a.as_str()).unwrap_or_default().to_string();
                Value::Null
            }
            "setPlaceholderText" => {
                doc.placeholder = first.and_then(|a| a.as_str()).unwrap_or_default().to_string();
                Value::Null
            }
            "setContentEditable" => {
                doc.editable = first.and_then(|a| a.as_bool()).unwrap_or(doc.editable);
                Value::Null
            }
            "setLineHeight" => {
                if let Some(n) = px(first.and_then(|a| a.as_str())) {
                    doc.line_height = n;
                }
                Value::Null
            }
            "getCommandQueue" => match inner.raw_queue.take() {
                Some(raw) => raw,
                None => {
                    let pending: Vec<String> = inner.queue.drain(..).collect();
                    json!(serde_json::to_string(&pending).unwrap())
                }
            },
            _ => Value::Null,
        };
        Ok(value)
    }
}
