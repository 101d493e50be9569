// src/modules/chat/state.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A file-like token pulled out of an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Reference {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), url: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Only assistant messages carry references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
}

impl Message {
    pub fn new_user(content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content,
            timestamp: Utc::now(),
            references: None,
        }
    }

    pub fn new_assistant_placeholder() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: String::new(),
            timestamp: Utc::now(),
            references: Some(Vec::new()),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Role/content pair sent upstream as conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for HistoryMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptState {
    pub messages: Vec<Message>,
    /// Id of the assistant message currently receiving deltas.
    pub open_message: Option<Uuid>,
}

impl TranscriptState {
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open_message.is_some()
    }

    /// Messages that form the upstream history. The open placeholder and
    /// assistant turns that failed before producing text are left out.
    pub fn history(&self) -> Vec<HistoryMessage> {
        self.messages
            .iter()
            .filter(|m| Some(m.id) != self.open_message)
            .filter(|m| !(m.is_assistant() && m.content.trim().is_empty()))
            .map(HistoryMessage::from)
            .collect()
    }
}

// ----------------------------------------------------------------------------
// INTENT - Mutations the session or the stream consumer asks for
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TranscriptIntent {
    AppendUserMessage(String),
    AppendAssistantPlaceholder,
    UpdateLastAssistantContent(String),
    AttachReferences(Vec<Reference>),
    /// Stream failed: stop accepting deltas, leave references untouched.
    CloseOpenMessage,
}

// ----------------------------------------------------------------------------
// EVENTS - Things that happened (past tense)
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TranscriptEvent {
    MessageAppended { id: Uuid, role: Role, total: usize },
    ContentUpdated { id: Uuid, len: usize },
    ReferencesAttached { id: Uuid, references: Vec<Reference> },
    MessageClosed { id: Uuid },
}

// ----------------------------------------------------------------------------
// STATE MACHINE - Pure function: (State, Intent) -> (State, Vec<Event>)
// ----------------------------------------------------------------------------

pub struct TranscriptStateMachine;

impl TranscriptStateMachine {
    pub fn transition(
        state: TranscriptState,
        intent: TranscriptIntent,
    ) -> (TranscriptState, Vec<TranscriptEvent>) {
        use TranscriptIntent::*;

        match intent {
            AppendUserMessage(text) => Self::handle_append_user(state, text),
            AppendAssistantPlaceholder => Self::handle_append_placeholder(state),
            UpdateLastAssistantContent(content) => Self::handle_update_content(state, content),
            AttachReferences(references) => Self::handle_attach_references(state, references),
            CloseOpenMessage => Self::handle_close(state),
        }
    }

    fn handle_append_user(mut state: TranscriptState, text: String) -> (TranscriptState, Vec<TranscriptEvent>) {
        let message = Message::new_user(text);
        let id = message.id;
        state.messages.push(message);

        let total = state.messages.len();
        (state, vec![TranscriptEvent::MessageAppended { id, role: Role::User, total }])
    }

    fn handle_append_placeholder(mut state: TranscriptState) -> (TranscriptState, Vec<TranscriptEvent>) {
        // Only one assistant message may be open at a time
        if state.is_open() {
            return (state, vec![]);
        }

        let message = Message::new_assistant_placeholder();
        let id = message.id;
        state.messages.push(message);
        state.open_message = Some(id);

        let total = state.messages.len();
        (state, vec![TranscriptEvent::MessageAppended { id, role: Role::Assistant, total }])
    }

    fn handle_update_content(mut state: TranscriptState, content: String) -> (TranscriptState, Vec<TranscriptEvent>) {
        let Some(index) = state.messages.len().checked_sub(1) else {
            return (state, vec![]);
        };
        // Closed messages are final
        let last_id = state.messages[index].id;
        if !state.messages[index].is_assistant() || state.open_message != Some(last_id) {
            return (state, vec![]);
        }

        let last = &mut state.messages[index];
        last.content = content;
        let event = TranscriptEvent::ContentUpdated { id: last.id, len: last.content.len() };

        (state, vec![event])
    }

    fn handle_attach_references(
        mut state: TranscriptState,
        references: Vec<Reference>,
    ) -> (TranscriptState, Vec<TranscriptEvent>) {
        let Some(index) = state.messages.iter().rposition(Message::is_assistant) else {
            return (state, vec![]);
        };

        // References are written exactly once, when the message closes
        let id = state.messages[index].id;
        if state.open_message != Some(id) {
            return (state, vec![]);
        }

        state.messages[index].references = Some(references.clone());
        state.open_message = None;

        (state, vec![TranscriptEvent::ReferencesAttached { id, references }])
    }

    fn handle_close(mut state: TranscriptState) -> (TranscriptState, Vec<TranscriptEvent>) {
        match state.open_message.take() {
            Some(id) => (state, vec![TranscriptEvent::MessageClosed { id }]),
            None => (state, vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: TranscriptState, intents: Vec<TranscriptIntent>) -> TranscriptState {
        intents.into_iter().fold(state, |state, intent| {
            TranscriptStateMachine::transition(state, intent).0
        })
    }

    #[test]
    fn test_user_then_placeholder() {
        let state = apply(TranscriptState::default(), vec![
            TranscriptIntent::AppendUserMessage("hola".to_string()),
            TranscriptIntent::AppendAssistantPlaceholder,
        ]);

        assert_eq!(state.len(), 2);
        assert_eq!(state.messages[0].role, Role::User);
        assert_eq!(state.messages[0].references, None);

        let placeholder = &state.messages[1];
        assert_eq!(placeholder.role, Role::Assistant);
        assert!(placeholder.content.is_empty());
        assert_eq!(placeholder.references, Some(vec![]));
        assert_eq!(state.open_message, Some(placeholder.id));
        assert_ne!(state.messages[0].id, placeholder.id);
    }

    #[test]
    fn test_update_replaces_last_assistant_content() {
        let state = apply(TranscriptState::default(), vec![
            TranscriptIntent::AppendUserMessage("q".to_string()),
            TranscriptIntent::AppendAssistantPlaceholder,
            TranscriptIntent::UpdateLastAssistantContent("Hel".to_string()),
        ]);
        let (state, events) = TranscriptStateMachine::transition(
            state,
            TranscriptIntent::UpdateLastAssistantContent("Hello".to_string()),
        );

        assert_eq!(state.last().unwrap().content, "Hello");
        assert_eq!(state.messages[0].content, "q");
        assert!(matches!(events.as_slice(), [TranscriptEvent::ContentUpdated { len: 5, .. }]));
    }

    #[test]
    fn test_update_is_noop_when_last_message_is_user() {
        let before = apply(TranscriptState::default(), vec![
            TranscriptIntent::AppendUserMessage("q".to_string()),
        ]);
        let (after, events) = TranscriptStateMachine::transition(
            before.clone(),
            TranscriptIntent::UpdateLastAssistantContent("ignored".to_string()),
        );

        assert_eq!(before, after);
        assert!(events.is_empty());
    }

    #[test]
    fn test_update_on_empty_transcript_is_noop() {
        let (after, events) = TranscriptStateMachine::transition(
            TranscriptState::default(),
            TranscriptIntent::UpdateLastAssistantContent("x".to_string()),
        );
        assert!(after.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_references_attach_once_and_close_message() {
        let state = apply(TranscriptState::default(), vec![
            TranscriptIntent::AppendUserMessage("q".to_string()),
            TranscriptIntent::AppendAssistantPlaceholder,
            TranscriptIntent::UpdateLastAssistantContent("see a.pdf".to_string()),
            TranscriptIntent::AttachReferences(vec![Reference::named("see a.pdf")]),
        ]);

        assert!(!state.is_open());
        assert_eq!(state.last().unwrap().references, Some(vec![Reference::named("see a.pdf")]));

        let (state, events) = TranscriptStateMachine::transition(
            state,
            TranscriptIntent::AttachReferences(vec![Reference::named("other.txt")]),
        );
        assert!(events.is_empty());
        assert_eq!(state.last().unwrap().references, Some(vec![Reference::named("see a.pdf")]));
    }

    #[test]
    fn test_second_placeholder_rejected_while_open() {
        let state = apply(TranscriptState::default(), vec![
            TranscriptIntent::AppendAssistantPlaceholder,
            TranscriptIntent::AppendAssistantPlaceholder,
        ]);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_history_excludes_open_placeholder() {
        let state = apply(TranscriptState::default(), vec![
            TranscriptIntent::AppendUserMessage("first".to_string()),
            TranscriptIntent::AppendAssistantPlaceholder,
        ]);

        let history = state.history();
        assert_eq!(history, vec![HistoryMessage { role: Role::User, content: "first".to_string() }]);
    }

    #[test]
    fn test_close_keeps_partial_content_and_allows_next_turn() {
        let state = apply(TranscriptState::default(), vec![
            TranscriptIntent::AppendUserMessage("q1".to_string()),
            TranscriptIntent::AppendAssistantPlaceholder,
            TranscriptIntent::UpdateLastAssistantContent("half".to_string()),
            TranscriptIntent::CloseOpenMessage,
        ]);

        assert!(!state.is_open());
        assert_eq!(state.last().unwrap().content, "half");
        assert_eq!(state.last().unwrap().references, Some(vec![]));

        let state = apply(state, vec![
            TranscriptIntent::AppendUserMessage("q2".to_string()),
            TranscriptIntent::AppendAssistantPlaceholder,
        ]);
        assert_eq!(state.len(), 4);
        assert!(state.is_open());
    }

    #[test]
    fn test_history_skips_empty_assistant_turns() {
        let state = apply(TranscriptState::default(), vec![
            TranscriptIntent::AppendUserMessage("q1".to_string()),
            TranscriptIntent::AppendAssistantPlaceholder,
            TranscriptIntent::CloseOpenMessage,
            TranscriptIntent::AppendUserMessage("q2".to_string()),
        ]);

        let roles: Vec<Role> = state.history().into_iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::User]);
    }

    #[test]
    fn test_message_serializes_with_lowercase_role() {
        let message = Message::new_user("hi".to_string());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("references").is_none());
    }
}
