/// Transcript data model and the event reducer — the core of agentdeck.
///
/// `ChatState` owns the ordered transcript for the active session plus the
/// run/connection flags, and folds one `ServerEvent` at a time into it.
/// The transcript is append-mostly; the only in-place mutations are
/// completing plan tasks and deleting a loading record once its completion
/// arrives (the result record is appended at the end, not in the loading
/// record's position). All of this is pure state mutation — no I/O — so the
/// whole state machine is unit-testable without a terminal or a backend.
use crate::api::HistoryItem;
use crate::protocol::{ConnectionStatus, ServerEvent, ToolKind};

// ── Plan marker ───────────────────────────────────────────────────────────────

/// Checkbox prefix that turns a plan line into a task.
pub const PLAN_MARKER: &str = "- [ ]";
/// Length of the marker plus its separating space ("- [ ] ").
const PLAN_MARKER_LEN: usize = 6;

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub description: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Success,
    Error,
}

/// One backend-executed side effect (file edit, shell command, browser
/// action) with its outcome and whatever metadata the event carried.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    pub kind: ToolKind,
    pub result: String,
    pub status: OpStatus,
    pub duration: Option<f64>,
    pub exit_code: Option<i32>,
    pub path: Option<String>,
    pub command: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptRecord {
    User(String),
    Agent(String),
    AgentStatus(String),
    AgentError(String),
    AgentPlan { tasks: Vec<Task> },
    /// Placeholder until the matching tool_complete arrives
    OperationLoading { key: String, description: String },
    Operation(OperationRecord),
}

/// In-flight operation shown in the floating tool-status panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveOperation {
    pub key: String,
    pub description: String,
}

// ── Plan parsing ──────────────────────────────────────────────────────────────

/// Drop the first `n` characters (not bytes — ids and plan text may carry
/// non-ASCII).
fn chop_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}

/// Parse plan text into tasks: every trimmed line starting with the checkbox
/// marker becomes one task, marker stripped and description trimmed. Lines
/// without the marker are ignored.
pub fn parse_plan_tasks(plan_text: &str, completed: bool) -> Vec<Task> {
    plan_text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(PLAN_MARKER))
        .map(|line| Task {
            description: chop_chars(line, PLAN_MARKER_LEN).trim().to_string(),
            completed,
        })
        .collect()
}

// ── ChatState — the reducer ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ChatState {
    pub records: Vec<TranscriptRecord>,
    /// At most one agent run in flight per session; gates submission
    pub running: bool,
    pub active_ops: Vec<ActiveOperation>,
    pub connection: ConnectionStatus,
    /// Fallback key source for tool_start frames without an id
    next_key: u64,
}

impl ChatState {
    /// Append the user's prompt. The caller has already passed submission
    /// gating (non-empty prompt, not running, active session set).
    pub fn push_user(&mut self, prompt: String) {
        self.records.push(TranscriptRecord::User(prompt));
        self.running = true;
    }

    /// Surface a client-side request failure (submission, session list or
    /// create) inline and release the run flag.
    pub fn push_error(&mut self, message: String) {
        self.records.push(TranscriptRecord::AgentError(message));
        self.running = false;
    }

    /// Fixed record shown when a session's history fetch fails.
    pub fn push_history_error(&mut self) {
        self.records
            .push(TranscriptRecord::AgentError("Failed to load session history.".to_string()));
    }

    /// Rebuild the transcript from a session's persisted history. Plans in
    /// history are retrospective, so every task is marked completed.
    pub fn reset_from_history(&mut self, items: &[HistoryItem]) {
        self.records.clear();
        self.active_ops.clear();
        self.running = false;
        for item in items {
            let record = match item.kind.as_str() {
                "user" => TranscriptRecord::User(item.text.clone()),
                "agent_plan_text" => TranscriptRecord::AgentPlan {
                    tasks: parse_plan_tasks(&item.text, true),
                },
                "error" | "agent_error" => TranscriptRecord::AgentError(item.text.clone()),
                "status" | "agent_status" => TranscriptRecord::AgentStatus(item.text.clone()),
                // Anything else renders as a plain agent message
                _ => TranscriptRecord::Agent(item.text.clone()),
            };
            self.records.push(record);
        }
    }

    /// Fold one inbound event into the transcript. Applied strictly in
    /// arrival order on the single event-loop task.
    pub fn apply(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Status(text) => {
                self.records.push(TranscriptRecord::AgentStatus(text));
            }

            ServerEvent::Plan(text) => {
                self.records.push(TranscriptRecord::AgentPlan {
                    tasks: parse_plan_tasks(&text, false),
                });
            }

            ServerEvent::TaskComplete(data) => {
                let trimmed = data.trim();
                let description = chop_chars(trimmed, PLAN_MARKER_LEN).trim().to_string();
                self.complete_task(&description);
            }

            ServerEvent::ToolStart(start) => {
                let key = match start.id {
                    Some(id) => id.to_string(),
                    None => {
                        self.next_key += 1;
                        format!("op-{}", self.next_key)
                    }
                };
                self.active_ops.push(ActiveOperation {
                    key: key.clone(),
                    description: start.description.clone(),
                });
                self.records.push(TranscriptRecord::OperationLoading {
                    key,
                    description: start.description,
                });
            }

            ServerEvent::ToolComplete(done) => {
                let key = done.id.as_ref().map(|id| id.to_string());
                self.finish_active_op(key.as_deref(), &done.description);
                self.remove_loading(key.as_deref(), &done.description);
                self.records.push(TranscriptRecord::Operation(OperationRecord {
                    kind: done.tool_type,
                    result: done.result,
                    status: if done.success { OpStatus::Success } else { OpStatus::Error },
                    duration: done.duration,
                    exit_code: None,
                    path: None,
                    command: None,
                    url: None,
                }));
            }

            ServerEvent::FileOperation(op) => {
                self.records.push(TranscriptRecord::Operation(OperationRecord {
                    kind: ToolKind::File,
                    result: op.result,
                    status: if op.success { OpStatus::Success } else { OpStatus::Error },
                    duration: op.duration,
                    exit_code: None,
                    path: op.path,
                    command: None,
                    url: None,
                }));
            }

            ServerEvent::TerminalOutput(term) => {
                let status = if term.succeeded() { OpStatus::Success } else { OpStatus::Error };
                self.records.push(TranscriptRecord::Operation(OperationRecord {
                    kind: ToolKind::Terminal,
                    result: term.output,
                    status,
                    duration: term.duration,
                    exit_code: term.exit_code,
                    path: None,
                    command: term.command,
                    url: None,
                }));
            }

            ServerEvent::BrowserAction(action) => {
                self.records.push(TranscriptRecord::Operation(OperationRecord {
                    kind: ToolKind::Browser,
                    result: action.result,
                    status: if action.success { OpStatus::Success } else { OpStatus::Error },
                    duration: action.duration,
                    exit_code: None,
                    path: None,
                    command: None,
                    url: action.url,
                }));
            }

            ServerEvent::Finish(text) => {
                self.records.push(TranscriptRecord::Agent(text));
                self.running = false;
                self.active_ops.clear();
            }

            ServerEvent::Error(text) => {
                self.records.push(TranscriptRecord::AgentError(text));
                self.running = false;
                self.active_ops.clear();
            }

            ServerEvent::ConnectionStatus(status) => {
                // Drives the indicator in the status bar only
                self.connection = status;
            }

            // The backend emits these around plan steps; the console has no
            // rendering for them.
            ServerEvent::TaskStart(data) => {
                tracing::debug!(task = %data, "task started");
            }
            ServerEvent::Warning(data) => {
                tracing::debug!(warning = %data, "backend warning");
            }
        }
    }

    /// Mark every task matching `description` exactly as completed, across
    /// all plan records. A description no plan contains is a silent no-op,
    /// and re-completing an already-completed task is idempotent.
    fn complete_task(&mut self, description: &str) {
        for record in &mut self.records {
            if let TranscriptRecord::AgentPlan { tasks } = record {
                for task in tasks.iter_mut() {
                    if task.description == description {
                        task.completed = true;
                    }
                }
            }
        }
    }

    /// Drop the in-flight panel entry for a completing operation:
    /// by key when the event carries an id, by exact description otherwise.
    fn finish_active_op(&mut self, key: Option<&str>, description: &str) {
        let pos = match key {
            Some(k) => self.active_ops.iter().position(|op| op.key == k),
            None => self.active_ops.iter().position(|op| op.description == description),
        };
        if let Some(pos) = pos {
            self.active_ops.remove(pos);
        }
    }

    /// Delete the loading record for a completing operation. The correlation
    /// key is authoritative; description containment is a compatibility
    /// fallback for backends that do not echo the id, picking the most
    /// specific (longest) matching description. No match is not an error —
    /// the result is appended regardless.
    fn remove_loading(&mut self, key: Option<&str>, description: &str) {
        if let Some(k) = key {
            let by_key = self.records.iter().position(|r| {
                matches!(r, TranscriptRecord::OperationLoading { key, .. } if key == k)
            });
            if let Some(pos) = by_key {
                self.records.remove(pos);
                return;
            }
        }

        let mut best: Option<(usize, usize)> = None; // (index, description length)
        for (i, record) in self.records.iter().enumerate() {
            if let TranscriptRecord::OperationLoading { description: desc, .. } = record {
                if !desc.is_empty() && description.contains(desc.as_str()) {
                    if best.map_or(true, |(_, len)| desc.len() > len) {
                        best = Some((i, desc.len()));
                    }
                }
            }
        }
        if let Some((pos, _)) = best {
            self.records.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        BrowserAction, FileOperation, OperationId, TerminalOutput, ToolComplete, ToolStart,
    };

    fn tool_start(id: u64, description: &str) -> ServerEvent {
        ServerEvent::ToolStart(ToolStart {
            id: Some(OperationId::Num(id)),
            description: description.to_string(),
        })
    }

    fn tool_complete(id: Option<u64>, description: &str, success: bool, result: &str) -> ServerEvent {
        ServerEvent::ToolComplete(ToolComplete {
            id: id.map(OperationId::Num),
            description: description.to_string(),
            tool_type: ToolKind::File,
            success,
            result: result.to_string(),
            duration: None,
        })
    }

    #[test]
    fn plan_lines_strip_marker_and_trim() {
        let tasks = parse_plan_tasks("- [ ] Write tests\n  - [ ]   Ship it  \nnot a task\n- [x] done line", false);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "Write tests");
        assert_eq!(tasks[1].description, "Ship it");
        assert!(tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn task_complete_marks_matching_task_only() {
        let mut state = ChatState::default();
        state.apply(ServerEvent::Plan("- [ ] Write tests\n- [ ] Ship it".to_string()));
        state.apply(ServerEvent::TaskComplete("- [ ] Write tests".to_string()));

        let TranscriptRecord::AgentPlan { tasks } = &state.records[0] else { panic!("expected plan") };
        assert!(tasks[0].completed);
        assert!(!tasks[1].completed);

        // Idempotent: completing again changes nothing
        state.apply(ServerEvent::TaskComplete("- [ ] Write tests".to_string()));
        let TranscriptRecord::AgentPlan { tasks } = &state.records[0] else { panic!("expected plan") };
        assert!(tasks[0].completed);
        assert!(!tasks[1].completed);
    }

    #[test]
    fn task_complete_updates_every_matching_plan() {
        let mut state = ChatState::default();
        state.apply(ServerEvent::Plan("- [ ] A".to_string()));
        state.apply(ServerEvent::Plan("- [ ] A\n- [ ] B".to_string()));
        state.apply(ServerEvent::TaskComplete("- [ ] A".to_string()));

        for record in &state.records {
            let TranscriptRecord::AgentPlan { tasks } = record else { panic!("expected plan") };
            assert!(tasks[0].completed);
        }
    }

    #[test]
    fn task_complete_without_matching_plan_is_a_noop() {
        let mut state = ChatState::default();
        state.apply(ServerEvent::Plan("- [ ] A".to_string()));
        state.apply(ServerEvent::TaskComplete("- [ ] Nothing like this".to_string()));
        let TranscriptRecord::AgentPlan { tasks } = &state.records[0] else { panic!("expected plan") };
        assert!(!tasks[0].completed);
        assert_eq!(state.records.len(), 1);
    }

    #[test]
    fn plan_task_complete_finish_sequence() {
        let mut state = ChatState::default();
        state.running = true;
        state.apply(ServerEvent::Plan("- [ ] A\n- [ ] B".to_string()));
        state.apply(ServerEvent::TaskComplete("- [ ] A".to_string()));
        state.apply(ServerEvent::Finish("done".to_string()));

        assert_eq!(state.records.len(), 2);
        let TranscriptRecord::AgentPlan { tasks } = &state.records[0] else { panic!("expected plan") };
        assert!(tasks[0].completed);
        assert!(!tasks[1].completed);
        assert_eq!(state.records[1], TranscriptRecord::Agent("done".to_string()));
        assert!(!state.running);
    }

    #[test]
    fn tool_complete_replaces_loading_record_by_id() {
        let mut state = ChatState::default();
        state.apply(tool_start(1, "Reading file"));
        assert_eq!(state.active_ops.len(), 1);
        assert!(matches!(state.records[0], TranscriptRecord::OperationLoading { .. }));

        state.apply(tool_complete(Some(1), "Reading file", true, "ok"));
        assert!(state.active_ops.is_empty());
        assert_eq!(state.records.len(), 1);
        let TranscriptRecord::Operation(op) = &state.records[0] else { panic!("expected operation") };
        assert_eq!(op.status, OpStatus::Success);
        assert_eq!(op.result, "ok");
    }

    #[test]
    fn tool_complete_without_loading_record_still_appends() {
        let mut state = ChatState::default();
        state.apply(tool_complete(Some(9), "never started", false, "late"));
        assert_eq!(state.records.len(), 1);
        let TranscriptRecord::Operation(op) = &state.records[0] else { panic!("expected operation") };
        assert_eq!(op.status, OpStatus::Error);
    }

    #[test]
    fn description_fallback_removes_most_specific_loading_record() {
        let mut state = ChatState::default();
        state.apply(ServerEvent::ToolStart(ToolStart { id: None, description: "Reading".to_string() }));
        state.apply(ServerEvent::ToolStart(ToolStart { id: None, description: "Reading config".to_string() }));

        state.apply(tool_complete(None, "Reading config file", true, "ok"));

        // The longer match goes; the shorter one survives
        let loading: Vec<_> = state
            .records
            .iter()
            .filter_map(|r| match r {
                TranscriptRecord::OperationLoading { description, .. } => Some(description.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(loading, vec!["Reading"]);
    }

    #[test]
    fn result_record_lands_at_the_end_not_in_place() {
        let mut state = ChatState::default();
        state.apply(tool_start(1, "Reading file"));
        state.apply(ServerEvent::Status("still working".to_string()));
        state.apply(tool_complete(Some(1), "Reading file", true, "ok"));

        assert_eq!(state.records.len(), 2);
        assert!(matches!(state.records[0], TranscriptRecord::AgentStatus(_)));
        assert!(matches!(state.records[1], TranscriptRecord::Operation(_)));
    }

    #[test]
    fn client_side_failures_append_error_and_release_run_flag() {
        let mut state = ChatState::default();
        state.push_user("hi".to_string());
        assert!(state.running);

        state.push_error("Failed to start agent: timeout".to_string());
        assert!(!state.running);
        assert!(matches!(
            &state.records[1],
            TranscriptRecord::AgentError(t) if t.contains("timeout")
        ));

        // Works the same with no run in flight (background session fetches)
        state.push_error("Failed to load sessions: refused".to_string());
        assert!(!state.running);
        assert_eq!(state.records.len(), 3);
    }

    #[test]
    fn error_clears_running_and_active_ops() {
        let mut state = ChatState::default();
        state.running = true;
        state.apply(tool_start(1, "Reading file"));
        state.apply(ServerEvent::Error("boom".to_string()));

        assert!(!state.running);
        assert!(state.active_ops.is_empty());
        let errors = state
            .records
            .iter()
            .filter(|r| matches!(r, TranscriptRecord::AgentError(t) if t == "boom"))
            .count();
        assert_eq!(errors, 1);
    }

    #[test]
    fn direct_operation_events_append_records() {
        let mut state = ChatState::default();
        state.apply(ServerEvent::FileOperation(FileOperation {
            success: true,
            result: "created main.py".to_string(),
            path: Some("main.py".to_string()),
            duration: None,
        }));
        state.apply(ServerEvent::TerminalOutput(TerminalOutput {
            success: None,
            output: "2 passed".to_string(),
            exit_code: Some(0),
            command: Some("pytest".to_string()),
            duration: Some(1.2),
        }));
        state.apply(ServerEvent::BrowserAction(BrowserAction {
            success: false,
            result: "timeout".to_string(),
            url: Some("https://example.com".to_string()),
            duration: None,
        }));

        assert_eq!(state.records.len(), 3);
        let kinds: Vec<ToolKind> = state
            .records
            .iter()
            .filter_map(|r| match r {
                TranscriptRecord::Operation(op) => Some(op.kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![ToolKind::File, ToolKind::Terminal, ToolKind::Browser]);
        let TranscriptRecord::Operation(last) = &state.records[2] else { panic!() };
        assert_eq!(last.status, OpStatus::Error);
    }

    #[test]
    fn connection_status_never_becomes_a_record() {
        let mut state = ChatState::default();
        state.apply(ServerEvent::ConnectionStatus(ConnectionStatus::Connected));
        assert!(state.records.is_empty());
        assert_eq!(state.connection, ConnectionStatus::Connected);
    }

    #[test]
    fn history_rebuild_converts_plan_text_to_completed_plan() {
        let mut state = ChatState::default();
        state.running = true;
        state.push_user("old prompt".to_string());

        let items = vec![
            HistoryItem { kind: "user".to_string(), text: "make a site".to_string() },
            HistoryItem { kind: "agent_plan_text".to_string(), text: "- [ ] CREATE_FILE: index.html\n- [ ] FINISH: done".to_string() },
            HistoryItem { kind: "agent".to_string(), text: "done".to_string() },
        ];
        state.reset_from_history(&items);

        assert!(!state.running);
        assert_eq!(state.records.len(), 3);
        assert_eq!(state.records[0], TranscriptRecord::User("make a site".to_string()));
        let TranscriptRecord::AgentPlan { tasks } = &state.records[1] else { panic!("expected plan") };
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.completed));
        assert_eq!(state.records[2], TranscriptRecord::Agent("done".to_string()));
    }

    #[test]
    fn generated_keys_when_tool_start_has_no_id() {
        let mut state = ChatState::default();
        state.apply(ServerEvent::ToolStart(ToolStart { id: None, description: "a".to_string() }));
        state.apply(ServerEvent::ToolStart(ToolStart { id: None, description: "b".to_string() }));
        assert_ne!(state.active_ops[0].key, state.active_ops[1].key);
    }
}
