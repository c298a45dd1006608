use crate::config::MessagingConfig;
use crate::domain::conversation::ConversationId;
use crate::domain::event::{RelayEvent, RelayEventKind};
use crate::domain::message::{
    Contact, ConversationSummary, Message, NewMessage, PageRequest, Thread, validate_content,
};
use crate::error::{AppError, Result};
use crate::services::relay::ChatRelay;
use async_trait::async_trait;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use time::OffsetDateTime;

/// Persistence seam for messages.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug {
    async fn insert(&self, message: &NewMessage) -> Result<Message>;

    async fn find(&self, id: i64) -> Result<Option<Message>>;

    /// One page of a peer thread, oldest first.
    async fn conversation(&self, conversation_id: &ConversationId, page: PageRequest) -> Result<Vec<Message>>;

    /// One page of a case worker thread, oldest first. `participant_id` narrows it to one user's rows.
    async fn case_worker_thread(
        &self,
        case_worker_id: i64,
        participant_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<Message>>;

    async fn conversations(&self, user_id: i64) -> Result<Vec<ConversationSummary>>;

    async fn contacts(&self, user_id: i64) -> Result<Vec<Contact>>;

    async fn set_read(&self, id: i64, is_read: bool, now: OffsetDateTime) -> Result<Option<Message>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    /// Linked login account of a case worker. Outer `None` means the case worker does not exist.
    async fn case_worker_user(&self, case_worker_id: i64) -> Result<Option<Option<i64>>>;
}

#[derive(Clone, Debug)]
struct Metrics {
    sent_total: Counter<u64>,
    read_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dignity-server");
        Self {
            sent_total: meter
                .u64_counter("dignity_messages_sent_total")
                .with_description("Total messages created, labelled by thread kind and outcome")
                .build(),
            read_total: meter
                .u64_counter("dignity_messages_read_total")
                .with_description("Total read receipt updates")
                .build(),
        }
    }
}

/// Inbound message as submitted by an authenticated sender.
#[derive(Debug, Clone)]
pub struct SendMessage {
    pub receiver_id: Option<i64>,
    pub case_worker_id: Option<i64>,
    pub content: String,
    pub parent_message_id: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    relay: Arc<dyn ChatRelay>,
    config: MessagingConfig,
    metrics: Metrics,
}

impl MessageService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>, relay: Arc<dyn ChatRelay>, config: MessagingConfig) -> Self {
        Self { store, relay, config, metrics: Metrics::new() }
    }

    /// Clamps a client page request to the configured bounds.
    #[must_use]
    pub fn page(&self, limit: Option<i64>, before: Option<i64>) -> PageRequest {
        let max = self.config.max_page_size.max(1);
        let limit = limit.unwrap_or(self.config.default_page_size).clamp(1, max);
        PageRequest { limit, before }
    }

    /// Stores a message and relays it to the counterpart and the sender's other sessions.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` for invalid content, a self-addressed message or a missing counterpart,
    /// and `AppError::NotFound` if a referenced receiver, case worker or parent message does not exist.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, request),
        fields(receiver_id = ?request.receiver_id, case_worker_id = ?request.case_worker_id)
    )]
    pub async fn send(&self, sender_id: i64, request: SendMessage) -> Result<Message> {
        validate_content(&request.content)?;
        let thread = Thread::resolve(sender_id, request.receiver_id, request.case_worker_id)?;
        let kind = match thread {
            Thread::Peer { .. } => "peer",
            Thread::CaseWorker { .. } => "case_worker",
        };

        let new_message = NewMessage {
            sender_id,
            thread,
            content: request.content,
            parent_message_id: request.parent_message_id,
        };

        let message = match self.store.insert(&new_message).await {
            Ok(message) => message,
            Err(e) => {
                self.metrics.sent_total.add(1, &[KeyValue::new("thread", kind), KeyValue::new("status", "failure")]);
                return Err(e);
            }
        };
        self.metrics.sent_total.add(1, &[KeyValue::new("thread", kind), KeyValue::new("status", "success")]);

        let mut recipients = vec![sender_id];
        recipients.extend(message.receiver_id);
        if let Some(case_worker_id) = message.case_worker_id {
            match self.store.case_worker_user(case_worker_id).await {
                Ok(linked) => recipients.extend(linked.flatten()),
                Err(e) => tracing::warn!(error = %e, "Failed to resolve case worker account for relay"),
            }
        }
        self.relay_to(recipients, RelayEventKind::MessageCreated, &message);

        tracing::debug!(message_id = message.id, "Message stored");
        Ok(message)
    }

    /// Messages between `user_id` and `other_id`, looked up by their shared conversation key.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the two ids do not form a valid conversation.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn conversation_with(&self, user_id: i64, other_id: i64, page: PageRequest) -> Result<Vec<Message>> {
        let conversation_id = ConversationId::derive(user_id, other_id)?;
        self.store.conversation(&conversation_id, page).await
    }

    /// The caller's thread with a case worker.
    ///
    /// The case worker's own account sees every row of the thread, optionally
    /// narrowed to `participant_id`; anyone else sees only rows they sent or received.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the case worker does not exist.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn case_worker_thread(
        &self,
        user_id: i64,
        case_worker_id: i64,
        participant_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<Message>> {
        let linked = self.store.case_worker_user(case_worker_id).await?.ok_or(AppError::NotFound)?;
        let participant = if linked == Some(user_id) { participant_id } else { Some(user_id) };
        self.store.case_worker_thread(case_worker_id, participant, page).await
    }

    /// # Errors
    /// Returns `AppError::Database` if the lookup fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn conversations(&self, user_id: i64) -> Result<Vec<ConversationSummary>> {
        self.store.conversations(user_id).await
    }

    /// # Errors
    /// Returns `AppError::Database` if the lookup fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn contacts(&self, user_id: i64) -> Result<Vec<Contact>> {
        self.store.contacts(user_id).await
    }

    /// Sets the read flag on a message addressed to `user_id`.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` for an unknown message and `AppError::Forbidden` if the caller is not its reader.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn mark_read(&self, user_id: i64, message_id: i64, is_read: bool) -> Result<Message> {
        let message = self.store.find(message_id).await?.ok_or(AppError::NotFound)?;
        if !self.is_reader(user_id, &message).await? {
            return Err(AppError::Forbidden);
        }

        let updated =
            self.store.set_read(message_id, is_read, OffsetDateTime::now_utc()).await?.ok_or(AppError::NotFound)?;
        self.metrics.read_total.add(1, &[KeyValue::new("is_read", is_read)]);

        self.relay_to(updated.sender_id, RelayEventKind::MessageRead, &updated);
        Ok(updated)
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown message and `AppError::Forbidden` if the caller did not send it.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete(&self, user_id: i64, message_id: i64) -> Result<()> {
        let message = self.store.find(message_id).await?.ok_or(AppError::NotFound)?;
        if message.sender_id != Some(user_id) {
            return Err(AppError::Forbidden);
        }
        if self.store.delete(message_id).await? { Ok(()) } else { Err(AppError::NotFound) }
    }

    async fn is_reader(&self, user_id: i64, message: &Message) -> Result<bool> {
        if message.sender_id == Some(user_id) {
            return Ok(false);
        }
        if message.receiver_id == Some(user_id) {
            return Ok(true);
        }
        match message.case_worker_id {
            Some(case_worker_id) => Ok(self.store.case_worker_user(case_worker_id).await?.flatten() == Some(user_id)),
            None => Ok(false),
        }
    }

    fn relay_to(&self, recipients: impl IntoIterator<Item = i64>, kind: RelayEventKind, message: &Message) {
        let mut recipients: Vec<i64> = recipients.into_iter().collect();
        recipients.sort_unstable();
        recipients.dedup();
        for user_id in recipients {
            self.relay.publish(user_id, RelayEvent { kind, message: message.clone() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::ReadState;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use time::Duration;

    #[derive(Debug, Default)]
    struct InMemoryStore {
        messages: Mutex<Vec<Message>>,
        case_workers: HashMap<i64, Option<i64>>,
    }

    impl InMemoryStore {
        fn with_case_worker(case_worker_id: i64, user_id: Option<i64>) -> Self {
            Self { case_workers: HashMap::from([(case_worker_id, user_id)]), ..Self::default() }
        }

        fn page(mut rows: Vec<Message>, page: PageRequest) -> Vec<Message> {
            rows.sort_by_key(|m| std::cmp::Reverse((m.created_at, m.id)));
            let cursor = match page.before {
                Some(id) => match rows.iter().find(|m| m.id == id) {
                    Some(m) => Some((m.created_at, m.id)),
                    None => return Vec::new(),
                },
                None => None,
            };
            let mut rows: Vec<Message> = rows
                .into_iter()
                .filter(|m| cursor.is_none_or(|c| (m.created_at, m.id) < c))
                .take(usize::try_from(page.limit).unwrap())
                .collect();
            rows.reverse();
            rows
        }
    }

    #[async_trait]
    impl MessageStore for InMemoryStore {
        async fn insert(&self, message: &NewMessage) -> Result<Message> {
            if let Some(case_worker_id) = message.case_worker_id()
                && !self.case_workers.contains_key(&case_worker_id)
            {
                return Err(AppError::NotFound);
            }
            let mut messages = self.messages.lock().unwrap();
            let id = i64::try_from(messages.len()).unwrap() + 1;
            let stored = Message {
                id,
                sender_id: Some(message.sender_id),
                receiver_id: message.receiver_id(),
                case_worker_id: message.case_worker_id(),
                conversation_id: message.conversation_id(),
                content: message.content.clone(),
                read: ReadState::default(),
                parent_message_id: message.parent_message_id,
                created_at: OffsetDateTime::UNIX_EPOCH + Duration::seconds(id),
            };
            messages.push(stored.clone());
            Ok(stored)
        }

        async fn find(&self, id: i64) -> Result<Option<Message>> {
            Ok(self.messages.lock().unwrap().iter().find(|m| m.id == id).cloned())
        }

        async fn conversation(&self, conversation_id: &ConversationId, page: PageRequest) -> Result<Vec<Message>> {
            let key = conversation_id.to_string();
            let rows = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.conversation_id.as_deref() == Some(key.as_str()))
                .cloned()
                .collect();
            Ok(Self::page(rows, page))
        }

        async fn case_worker_thread(
            &self,
            case_worker_id: i64,
            participant_id: Option<i64>,
            page: PageRequest,
        ) -> Result<Vec<Message>> {
            let rows = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.case_worker_id == Some(case_worker_id))
                .filter(|m| participant_id.is_none_or(|p| m.sender_id == Some(p) || m.receiver_id == Some(p)))
                .cloned()
                .collect();
            Ok(Self::page(rows, page))
        }

        async fn conversations(&self, _user_id: i64) -> Result<Vec<ConversationSummary>> {
            Ok(Vec::new())
        }

        async fn contacts(&self, _user_id: i64) -> Result<Vec<Contact>> {
            Ok(Vec::new())
        }

        async fn set_read(&self, id: i64, is_read: bool, now: OffsetDateTime) -> Result<Option<Message>> {
            let mut messages = self.messages.lock().unwrap();
            Ok(messages.iter_mut().find(|m| m.id == id).map(|m| {
                m.read = m.read.apply(is_read, now);
                m.clone()
            }))
        }

        async fn delete(&self, id: i64) -> Result<bool> {
            let mut messages = self.messages.lock().unwrap();
            let before = messages.len();
            messages.retain(|m| m.id != id);
            Ok(messages.len() < before)
        }

        async fn case_worker_user(&self, case_worker_id: i64) -> Result<Option<Option<i64>>> {
            Ok(self.case_workers.get(&case_worker_id).copied())
        }
    }

    #[derive(Debug, Default)]
    struct RecordingRelay {
        events: Mutex<Vec<(i64, RelayEventKind, i64)>>,
    }

    impl RecordingRelay {
        fn take(&self) -> Vec<(i64, RelayEventKind, i64)> {
            std::mem::take(&mut *self.events.lock().unwrap())
        }
    }

    impl ChatRelay for RecordingRelay {
        fn publish(&self, user_id: i64, event: RelayEvent) {
            self.events.lock().unwrap().push((user_id, event.kind, event.message.id));
        }
    }

    fn service_with(store: InMemoryStore) -> (MessageService, Arc<RecordingRelay>) {
        let relay = Arc::new(RecordingRelay::default());
        let service = MessageService::new(Arc::new(store), relay.clone(), MessagingConfig::default());
        (service, relay)
    }

    fn peer(receiver_id: i64, content: &str) -> SendMessage {
        SendMessage {
            receiver_id: Some(receiver_id),
            case_worker_id: None,
            content: content.into(),
            parent_message_id: None,
        }
    }

    #[tokio::test]
    async fn test_both_directions_share_one_conversation() {
        let (service, _) = service_with(InMemoryStore::default());

        let first = service.send(5, peer(2, "hello from five")).await.unwrap();
        let second = service.send(2, peer(5, "hello from two")).await.unwrap();

        assert_eq!(first.conversation_id.as_deref(), Some("2-5"));
        assert_eq!(second.conversation_id.as_deref(), Some("2-5"));

        let page = service.page(None, None);
        let thread = service.conversation_with(5, 2, page).await.unwrap();
        let ids: Vec<i64> = thread.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_lookup_is_identical_from_either_side() {
        let (service, _) = service_with(InMemoryStore::default());
        for i in 0..4 {
            service.send(3, peer(8, &format!("a{i}"))).await.unwrap();
            service.send(8, peer(3, &format!("b{i}"))).await.unwrap();
        }
        service.send(3, peer(9, "unrelated")).await.unwrap();

        let page = service.page(None, None);
        let from_three = service.conversation_with(3, 8, page).await.unwrap();
        let from_eight = service.conversation_with(8, 3, page).await.unwrap();

        assert_eq!(from_three.len(), 8);
        assert_eq!(from_three, from_eight);
    }

    #[tokio::test]
    async fn test_pagination_walks_backwards() {
        let (service, _) = service_with(InMemoryStore::default());
        for i in 0..5 {
            service.send(1, peer(2, &format!("m{i}"))).await.unwrap();
        }

        let latest = service.conversation_with(1, 2, service.page(Some(2), None)).await.unwrap();
        assert_eq!(latest.iter().map(|m| m.id).collect::<Vec<_>>(), vec![4, 5]);

        let older = service.conversation_with(1, 2, service.page(Some(2), Some(latest[0].id))).await.unwrap();
        assert_eq!(older.iter().map(|m| m.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_cursor_outside_thread_yields_empty_page() {
        let (service, _) = service_with(InMemoryStore::default());
        service.send(1, peer(2, "in thread")).await.unwrap();
        let elsewhere = service.send(3, peer(4, "other thread")).await.unwrap();

        let foreign = service.conversation_with(1, 2, service.page(None, Some(elsewhere.id))).await.unwrap();
        assert!(foreign.is_empty());

        let unknown = service.conversation_with(1, 2, service.page(None, Some(999))).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_page_is_clamped() {
        let (service, _) = service_with(InMemoryStore::default());
        assert_eq!(service.page(None, None).limit, MessagingConfig::default().default_page_size);
        assert_eq!(service.page(Some(0), None).limit, 1);
        assert_eq!(service.page(Some(10_000), None).limit, MessagingConfig::default().max_page_size);
    }

    #[tokio::test]
    async fn test_self_message_rejected() {
        let (service, relay) = service_with(InMemoryStore::default());
        let result = service.send(4, peer(4, "note to self")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(relay.take().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_content_rejected() {
        let (service, _) = service_with(InMemoryStore::default());
        assert!(matches!(service.send(1, peer(2, "")).await, Err(AppError::BadRequest(_))));
        let long = "x".repeat(2001);
        assert!(matches!(service.send(1, peer(2, &long)).await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_missing_counterpart_rejected() {
        let (service, _) = service_with(InMemoryStore::default());
        let request = SendMessage { receiver_id: None, case_worker_id: None, content: "hi".into(), parent_message_id: None };
        assert!(matches!(service.send(1, request).await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_send_relays_to_receiver_and_sender() {
        let (service, relay) = service_with(InMemoryStore::default());
        let message = service.send(5, peer(2, "hello")).await.unwrap();

        let events = relay.take();
        assert_eq!(
            events,
            vec![(2, RelayEventKind::MessageCreated, message.id), (5, RelayEventKind::MessageCreated, message.id)]
        );
    }

    #[tokio::test]
    async fn test_case_worker_thread_has_no_conversation_key() {
        let (service, relay) = service_with(InMemoryStore::with_case_worker(30, Some(40)));

        let request = SendMessage { receiver_id: None, case_worker_id: Some(30), content: "need help".into(), parent_message_id: None };
        let message = service.send(7, request).await.unwrap();
        assert_eq!(message.conversation_id, None);
        assert!(message.is_case_worker_thread());

        let recipients: Vec<i64> = relay.take().into_iter().map(|(user, _, _)| user).collect();
        assert_eq!(recipients, vec![7, 40]);

        let reply = SendMessage { receiver_id: Some(7), case_worker_id: Some(30), content: "on it".into(), parent_message_id: None };
        service.send(40, reply).await.unwrap();

        let page = service.page(None, None);
        let client_view = service.case_worker_thread(7, 30, None, page).await.unwrap();
        let worker_view = service.case_worker_thread(40, 30, Some(7), page).await.unwrap();
        assert_eq!(client_view.len(), 2);
        assert_eq!(client_view, worker_view);

        // A stranger only sees their own rows.
        assert!(service.case_worker_thread(99, 30, Some(7), page).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_case_worker_is_not_found() {
        let (service, _) = service_with(InMemoryStore::default());
        let request = SendMessage { receiver_id: None, case_worker_id: Some(1), content: "hi".into(), parent_message_id: None };
        assert!(matches!(service.send(7, request).await, Err(AppError::NotFound)));
        assert!(matches!(service.case_worker_thread(7, 1, None, service.page(None, None)).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_read_receipt_is_monotonic() {
        let (service, relay) = service_with(InMemoryStore::default());
        let message = service.send(5, peer(2, "hello")).await.unwrap();
        relay.take();

        let read = service.mark_read(2, message.id, true).await.unwrap();
        let first_read_at = read.read.read_at.unwrap();
        assert!(read.read.is_read);
        assert_eq!(relay.take(), vec![(5, RelayEventKind::MessageRead, message.id)]);

        let unread = service.mark_read(2, message.id, false).await.unwrap();
        assert!(!unread.read.is_read);
        assert_eq!(unread.read.read_at, Some(first_read_at));

        let reread = service.mark_read(2, message.id, true).await.unwrap();
        assert_eq!(reread.read.read_at, Some(first_read_at));
    }

    #[tokio::test]
    async fn test_only_receiver_may_mark_read() {
        let (service, _) = service_with(InMemoryStore::default());
        let message = service.send(5, peer(2, "hello")).await.unwrap();

        assert!(matches!(service.mark_read(5, message.id, true).await, Err(AppError::Forbidden)));
        assert!(matches!(service.mark_read(9, message.id, true).await, Err(AppError::Forbidden)));
        assert!(matches!(service.mark_read(2, 999, true).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_case_worker_account_reads_client_messages() {
        let (service, _) = service_with(InMemoryStore::with_case_worker(30, Some(40)));
        let request = SendMessage { receiver_id: None, case_worker_id: Some(30), content: "hi".into(), parent_message_id: None };
        let message = service.send(7, request).await.unwrap();

        assert!(service.mark_read(40, message.id, true).await.unwrap().read.is_read);
        assert!(matches!(service.mark_read(7, message.id, true).await, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_only_sender_may_delete() {
        let (service, _) = service_with(InMemoryStore::default());
        let message = service.send(5, peer(2, "oops")).await.unwrap();

        assert!(matches!(service.delete(2, message.id).await, Err(AppError::Forbidden)));
        service.delete(5, message.id).await.unwrap();
        assert!(matches!(service.delete(5, message.id).await, Err(AppError::NotFound)));
    }
}
