/// Wire protocol for the backend event channel.
///
/// Every inbound frame is JSON of shape `{"type": "...", "data": ...}` where
/// `data` is a bare string for chat-ish events and an object for tool events.
/// `connection_status` never arrives on the wire — it is synthesized locally
/// by the connection manager — but it shares this enum so the reducer sees a
/// single event stream.
use serde::Deserialize;

// ── Event frame ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Ephemeral status line ("Generating plan...")
    Status(String),
    /// Multi-line markdown-ish plan text; checkbox lines become tasks
    Plan(String),
    /// A plan task started executing (emitted by the backend, not rendered)
    TaskStart(String),
    /// A plan task finished; data repeats the checkbox line
    TaskComplete(String),
    /// A long-running tool operation began
    ToolStart(ToolStart),
    /// A tool operation finished
    ToolComplete(ToolComplete),
    /// One-shot file operation result (no prior tool_start required)
    FileOperation(FileOperation),
    /// One-shot terminal command result
    TerminalOutput(TerminalOutput),
    /// One-shot browser action result
    BrowserAction(BrowserAction),
    /// Non-fatal backend warning (not rendered)
    Warning(String),
    /// Terminal success event — the agent's final response text
    Finish(String),
    /// Terminal error event
    Error(String),
    /// Synthesized locally — never a transcript record
    ConnectionStatus(ConnectionStatus),
}

/// Decode one raw channel frame. Callers log and drop the `Err` case —
/// a malformed frame must never surface as a transcript record.
pub fn decode_frame(raw: &str) -> Result<ServerEvent, serde_json::Error> {
    serde_json::from_str(raw)
}

// ── Operation correlation key ─────────────────────────────────────────────────

/// Backends send operation ids as either numbers or strings; normalise both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum OperationId {
    Num(u64),
    Text(String),
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationId::Num(n) => write!(f, "{n}"),
            OperationId::Text(s) => write!(f, "{s}"),
        }
    }
}

// ── Tool event payloads ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    File,
    Terminal,
    Browser,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolStart {
    #[serde(default)]
    pub id: Option<OperationId>,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolComplete {
    #[serde(default)]
    pub id: Option<OperationId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tool_type: ToolKind,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FileOperation {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TerminalOutput {
    /// Explicit success flag wins over the exit code when both are present
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TerminalOutput {
    /// Exit code 0 (or absent) counts as success unless the flag says otherwise.
    pub fn succeeded(&self) -> bool {
        match self.success {
            Some(flag) => flag,
            None => self.exit_code.unwrap_or(0) == 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BrowserAction {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

fn default_true() -> bool {
    true
}

// ── Connection status ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Error,
    #[default]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_data_events() {
        let ev = decode_frame(r#"{"type": "status", "data": "Generating plan..."}"#).unwrap();
        assert_eq!(ev, ServerEvent::Status("Generating plan...".to_string()));

        let ev = decode_frame(r#"{"type": "finish", "data": "done"}"#).unwrap();
        assert_eq!(ev, ServerEvent::Finish("done".to_string()));

        let ev = decode_frame(r#"{"type": "task_complete", "data": "- [ ] CREATE_FILE: a.py"}"#).unwrap();
        assert_eq!(ev, ServerEvent::TaskComplete("- [ ] CREATE_FILE: a.py".to_string()));
    }

    #[test]
    fn decodes_tool_start_with_numeric_or_string_id() {
        let ev = decode_frame(r#"{"type": "tool_start", "data": {"id": 7, "description": "Reading file"}}"#).unwrap();
        let ServerEvent::ToolStart(start) = ev else { panic!("wrong variant") };
        assert_eq!(start.id, Some(OperationId::Num(7)));
        assert_eq!(start.description, "Reading file");

        let ev = decode_frame(r#"{"type": "tool_start", "data": {"id": "op-3", "description": "x"}}"#).unwrap();
        let ServerEvent::ToolStart(start) = ev else { panic!("wrong variant") };
        assert_eq!(start.id.unwrap().to_string(), "op-3");
    }

    #[test]
    fn decodes_tool_complete_defaults() {
        let ev = decode_frame(r#"{"type": "tool_complete", "data": {"id": 7, "result": "ok"}}"#).unwrap();
        let ServerEvent::ToolComplete(done) = ev else { panic!("wrong variant") };
        assert!(done.success);
        assert_eq!(done.tool_type, ToolKind::File);
        assert_eq!(done.result, "ok");
        assert_eq!(done.duration, None);
    }

    #[test]
    fn terminal_output_success_from_exit_code() {
        let ev = decode_frame(
            r#"{"type": "terminal_output", "data": {"output": "hi", "exit_code": 0, "command": "ls"}}"#,
        )
        .unwrap();
        let ServerEvent::TerminalOutput(term) = ev else { panic!("wrong variant") };
        assert!(term.succeeded());

        let ev = decode_frame(r#"{"type": "terminal_output", "data": {"output": "boom", "exit_code": 2}}"#).unwrap();
        let ServerEvent::TerminalOutput(term) = ev else { panic!("wrong variant") };
        assert!(!term.succeeded());

        // Explicit flag wins over the exit code
        let ev = decode_frame(
            r#"{"type": "terminal_output", "data": {"output": "", "exit_code": 0, "success": false}}"#,
        )
        .unwrap();
        let ServerEvent::TerminalOutput(term) = ev else { panic!("wrong variant") };
        assert!(!term.succeeded());
    }

    #[test]
    fn malformed_frames_are_errors() {
        assert!(decode_frame("not json").is_err());
        assert!(decode_frame(r#"{"type": "no_such_event", "data": "x"}"#).is_err());
        assert!(decode_frame(r#"{"data": "missing type"}"#).is_err());
    }

    #[test]
    fn decodes_connection_status() {
        let ev = decode_frame(r#"{"type": "connection_status", "data": "connected"}"#).unwrap();
        assert_eq!(ev, ServerEvent::ConnectionStatus(ConnectionStatus::Connected));
    }
}
