use crate::domain::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEventKind {
    MessageCreated,
    MessageRead,
}

impl RelayEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MessageCreated => "message.created",
            Self::MessageRead => "message.read",
        }
    }
}

/// An event pushed to a connected user. Delivery is best effort.
#[derive(Debug, Clone)]
pub struct RelayEvent {
    pub kind: RelayEventKind,
    pub message: Message,
}
