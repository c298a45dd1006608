use crate::domain::message::{Contact, ConversationSummary, Message};
use crate::services::message_service::SendMessage;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendMessageRequest {
    pub receiver_id: Option<i64>,
    pub case_worker_id: Option<i64>,
    pub content: String,
    pub parent_message_id: Option<i64>,
}

impl From<SendMessageRequest> for SendMessage {
    fn from(r: SendMessageRequest) -> Self {
        Self {
            receiver_id: r.receiver_id,
            case_worker_id: r.case_worker_id,
            content: r.content,
            parent_message_id: r.parent_message_id,
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarkRead {
    #[serde(default = "default_true")]
    pub is_read: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub before: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadQuery {
    pub user_id: Option<i64>,
    pub limit: Option<i64>,
    pub before: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i64,
    pub sender_id: Option<i64>,
    pub receiver_id: Option<i64>,
    pub case_worker_id: Option<i64>,
    pub conversation_id: Option<String>,
    pub content: String,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
    pub parent_message_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            case_worker_id: m.case_worker_id,
            conversation_id: m.conversation_id,
            content: m.content,
            is_read: m.read.is_read,
            read_at: m.read.read_at,
            parent_message_id: m.parent_message_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub other_user_id: i64,
    pub last_message: MessageResponse,
    pub unread_count: i64,
}

impl From<ConversationSummary> for ConversationResponse {
    fn from(s: ConversationSummary) -> Self {
        Self {
            conversation_id: s.conversation_id.to_string(),
            other_user_id: s.other_user_id,
            last_message: s.last_message.into(),
            unread_count: s.unread_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub user_id: i64,
    pub display_name: String,
    pub last_message: MessageResponse,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self { user_id: c.user_id, display_name: c.display_name, last_message: c.last_message.into() }
    }
}
