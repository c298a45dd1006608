use crate::domain::message::{Message, ReadState};
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct MessageRecord {
    pub(crate) id: i64,
    pub(crate) sender_id: Option<i64>,
    pub(crate) receiver_id: Option<i64>,
    pub(crate) case_worker_id: Option<i64>,
    pub(crate) conversation_id: Option<String>,
    pub(crate) content: String,
    pub(crate) is_read: bool,
    pub(crate) read_at: Option<OffsetDateTime>,
    pub(crate) parent_message_id: Option<i64>,
    pub(crate) created_at: OffsetDateTime,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            sender_id: record.sender_id,
            receiver_id: record.receiver_id,
            case_worker_id: record.case_worker_id,
            conversation_id: record.conversation_id,
            content: record.content,
            read: ReadState { is_read: record.is_read, read_at: record.read_at },
            parent_message_id: record.parent_message_id,
            created_at: record.created_at,
        }
    }
}

/// Latest message of a conversation plus the caller's unread count.
#[derive(Debug, sqlx::FromRow)]
pub struct ConversationSummaryRecord {
    #[sqlx(flatten)]
    pub(crate) message: MessageRecord,
    pub(crate) unread_count: i64,
}

/// Latest message of a conversation joined with the other participant.
#[derive(Debug, sqlx::FromRow)]
pub struct ContactRecord {
    #[sqlx(flatten)]
    pub(crate) message: MessageRecord,
    pub(crate) contact_id: i64,
    pub(crate) contact_display_name: String,
}
