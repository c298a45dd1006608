use crate::api::schemas::messaging::MessageResponse;
use crate::domain::event::RelayEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
}

/// A single text frame pushed to a WebSocket session.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelayFrame {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: MessageResponse,
}

impl From<RelayEvent> for RelayFrame {
    fn from(event: RelayEvent) -> Self {
        Self { kind: event.kind.as_str().to_string(), message: event.message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::RelayEventKind;
    use crate::domain::message::{Message, ReadState};
    use time::OffsetDateTime;

    #[test]
    fn test_frame_shape() {
        let event = RelayEvent {
            kind: RelayEventKind::MessageRead,
            message: Message {
                id: 9,
                sender_id: Some(1),
                receiver_id: Some(2),
                case_worker_id: None,
                conversation_id: Some("1-2".into()),
                content: "hi".into(),
                read: ReadState { is_read: true, read_at: Some(OffsetDateTime::UNIX_EPOCH) },
                parent_message_id: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
        };

        let json = serde_json::to_value(RelayFrame::from(event)).unwrap();

        assert_eq!(json["type"], "message.read");
        assert_eq!(json["message"]["conversationId"], "1-2");
        assert_eq!(json["message"]["isRead"], true);
        assert_eq!(json["message"]["readAt"], "1970-01-01T00:00:00Z");
    }
}
