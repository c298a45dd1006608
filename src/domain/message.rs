use crate::domain::conversation::{ConversationError, ConversationId};
use crate::domain::validation::ValidationError;
use time::OffsetDateTime;

pub const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub sender_id: Option<i64>,
    pub receiver_id: Option<i64>,
    pub case_worker_id: Option<i64>,
    pub conversation_id: Option<String>,
    pub content: String,
    pub read: ReadState,
    pub parent_message_id: Option<i64>,
    pub created_at: OffsetDateTime,
}

impl Message {
    #[must_use]
    pub const fn is_case_worker_thread(&self) -> bool {
        self.case_worker_id.is_some()
    }
}

/// Read receipt pair. `read_at` is stamped the first time the message is
/// marked read and is never moved afterwards, even across unread/read toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadState {
    pub is_read: bool,
    pub read_at: Option<OffsetDateTime>,
}

impl ReadState {
    #[must_use]
    pub fn apply(self, is_read: bool, now: OffsetDateTime) -> Self {
        let read_at = match self.read_at {
            Some(first) => Some(first),
            None if is_read => Some(now),
            None => None,
        };
        Self { is_read, read_at }
    }
}

/// Which thread a new message belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thread {
    Peer { receiver_id: i64, conversation_id: ConversationId },
    CaseWorker { case_worker_id: i64, receiver_id: Option<i64> },
}

impl Thread {
    /// Resolves the thread for a message authored by `sender_id`.
    ///
    /// A case worker id always wins: such rows carry no conversation id and are
    /// looked up by case worker instead.
    ///
    /// # Errors
    /// Returns `ConversationError::MissingCounterpart` if neither a receiver nor a case worker is given,
    /// and the errors of [`ConversationId::derive`] for peer threads.
    pub fn resolve(
        sender_id: i64,
        receiver_id: Option<i64>,
        case_worker_id: Option<i64>,
    ) -> Result<Self, ConversationError> {
        if receiver_id == Some(sender_id) {
            return Err(ConversationError::SelfConversation);
        }
        match (case_worker_id, receiver_id) {
            (Some(case_worker_id), receiver_id) => Ok(Self::CaseWorker { case_worker_id, receiver_id }),
            (None, Some(receiver_id)) => {
                let conversation_id = ConversationId::derive(sender_id, receiver_id)?;
                Ok(Self::Peer { receiver_id, conversation_id })
            }
            (None, None) => Err(ConversationError::MissingCounterpart),
        }
    }
}

/// A validated message ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: i64,
    pub thread: Thread,
    pub content: String,
    pub parent_message_id: Option<i64>,
}

impl NewMessage {
    #[must_use]
    pub const fn receiver_id(&self) -> Option<i64> {
        match &self.thread {
            Thread::Peer { receiver_id, .. } => Some(*receiver_id),
            Thread::CaseWorker { receiver_id, .. } => *receiver_id,
        }
    }

    #[must_use]
    pub const fn case_worker_id(&self) -> Option<i64> {
        match &self.thread {
            Thread::Peer { .. } => None,
            Thread::CaseWorker { case_worker_id, .. } => Some(*case_worker_id),
        }
    }

    #[must_use]
    pub fn conversation_id(&self) -> Option<String> {
        match &self.thread {
            Thread::Peer { conversation_id, .. } => Some(conversation_id.to_string()),
            Thread::CaseWorker { .. } => None,
        }
    }
}

/// # Errors
/// Returns `ValidationError::Length` when content is empty or longer than [`MAX_CONTENT_CHARS`].
/// Whitespace counts; content is stored untrimmed.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    let len = content.chars().count();
    if !(1..=MAX_CONTENT_CHARS).contains(&len) {
        return Err(ValidationError::Length { field: "content", min: 1, max: MAX_CONTENT_CHARS });
    }
    Ok(())
}

/// Keyset page over a thread, newest-first internally, returned oldest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub before: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub conversation_id: ConversationId,
    pub other_user_id: i64,
    pub last_message: Message,
    pub unread_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub user_id: i64,
    pub display_name: String,
    pub last_message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_read_at_set_once() {
        let first = datetime!(2026-01-01 10:00 UTC);
        let later = datetime!(2026-01-02 10:00 UTC);

        let read = ReadState::default().apply(true, first);
        assert_eq!(read, ReadState { is_read: true, read_at: Some(first) });

        let reread = read.apply(true, later);
        assert_eq!(reread.read_at, Some(first));
    }

    #[test]
    fn test_unread_keeps_original_timestamp() {
        let first = datetime!(2026-01-01 10:00 UTC);
        let later = datetime!(2026-01-03 08:30 UTC);

        let toggled = ReadState::default().apply(true, first).apply(false, later);
        assert!(!toggled.is_read);
        assert_eq!(toggled.read_at, Some(first));

        assert_eq!(toggled.apply(true, later).read_at, Some(first));
    }

    #[test]
    fn test_marking_unread_message_unread_stamps_nothing() {
        let state = ReadState::default().apply(false, datetime!(2026-01-01 10:00 UTC));
        assert_eq!(state, ReadState::default());
    }

    #[test]
    fn test_peer_thread_derives_key_in_either_direction() {
        let forward = Thread::resolve(5, Some(2), None).unwrap();
        let backward = Thread::resolve(2, Some(5), None).unwrap();

        let key = |t: &Thread| match t {
            Thread::Peer { conversation_id, .. } => conversation_id.to_string(),
            Thread::CaseWorker { .. } => panic!("expected peer thread"),
        };
        assert_eq!(key(&forward), "2-5");
        assert_eq!(key(&backward), "2-5");
    }

    #[test]
    fn test_case_worker_thread_skips_derivation() {
        let thread = Thread::resolve(4, None, Some(11)).unwrap();
        assert_eq!(thread, Thread::CaseWorker { case_worker_id: 11, receiver_id: None });

        let reply = Thread::resolve(20, Some(4), Some(11)).unwrap();
        assert_eq!(reply, Thread::CaseWorker { case_worker_id: 11, receiver_id: Some(4) });
        assert_eq!(Thread::resolve(4, Some(4), Some(11)), Err(ConversationError::SelfConversation));

        let msg = NewMessage { sender_id: 4, thread, content: "hi".into(), parent_message_id: None };
        assert_eq!(msg.conversation_id(), None);
        assert_eq!(msg.case_worker_id(), Some(11));
    }

    #[test]
    fn test_thread_requires_counterpart() {
        assert_eq!(Thread::resolve(4, None, None), Err(ConversationError::MissingCounterpart));
        assert_eq!(Thread::resolve(4, Some(4), None), Err(ConversationError::SelfConversation));
    }

    #[test]
    fn test_content_bounds() {
        assert!(validate_content("x").is_ok());
        assert!(validate_content(&"y".repeat(MAX_CONTENT_CHARS)).is_ok());
        assert!(validate_content("").is_err());
        assert!(validate_content("   ").is_ok());
        assert!(validate_content(&"\u{e9}".repeat(MAX_CONTENT_CHARS)).is_ok());
        assert!(validate_content(&"y".repeat(MAX_CONTENT_CHARS + 1)).is_err());
    }
}
