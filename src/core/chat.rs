//! Simulated Dr. Paw chat
//!
//! The ChatSession drives the chat view:
//! 1. Appends the user's message immediately
//! 2. Raises the composing indicator
//! 3. After the reply delay, appends a canned answer with a canned quick-reply set
//!
//! Replies are queued at submit time and delivered one at a time, in
//! submission order, by a single worker per session. Observers follow along
//! through a watch channel.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::config::{Catalog, Timings};
use crate::conversation::{Conversation, Message, MessageId};

use super::random::{pick, Chooser};
use super::scheduler::Scheduler;

/// Everything an observer of the chat view can see
#[derive(Debug, Clone, Serialize)]
pub struct ChatState {
    pub conversation: Conversation,
    pub(super) pending: usize,
}

impl ChatState {
    pub fn messages(&self) -> &[Message] {
        &self.conversation.messages
    }

    /// True while any simulated reply or analysis is outstanding
    pub fn is_composing(&self) -> bool {
        self.pending > 0
    }

    pub fn pending(&self) -> usize {
        self.pending
    }
}

/// A canned answer waiting for its turn
#[derive(Debug)]
struct QueuedReply {
    content: String,
    quick_replies: Option<Vec<String>>,
}

/// Controller of one mounted chat view
pub struct ChatSession {
    pub(super) state: Arc<watch::Sender<ChatState>>,
    pub(super) catalog: Arc<Catalog>,
    pub(super) timings: Timings,
    pub(super) scheduler: Scheduler,
    chooser: Box<dyn Chooser>,
    replies: Option<mpsc::UnboundedSender<QueuedReply>>,
}

impl ChatSession {
    pub fn new(catalog: Arc<Catalog>, timings: Timings, chooser: Box<dyn Chooser>) -> Self {
        let conversation = Conversation::new().with_greeting(
            &catalog.chat.greeting,
            catalog.chat.greeting_quick_replies.clone(),
        );
        tracing::debug!(conversation_id = %conversation.id, "Chat session opened");

        let (state, _) = watch::channel(ChatState {
            conversation,
            pending: 0,
        });

        Self {
            state: Arc::new(state),
            catalog,
            timings,
            scheduler: Scheduler::new(),
            chooser,
            replies: None,
        }
    }

    pub fn conversation_id(&self) -> Uuid {
        self.state.borrow().conversation.id
    }

    /// Follow state changes, including ones made by delayed replies
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages().to_vec()
    }

    pub fn is_composing(&self) -> bool {
        self.state.borrow().is_composing()
    }

    /// Send a message to Dr. Paw
    ///
    /// Blank input and input after teardown are ignored.
    pub fn submit(&mut self, text: &str) -> Option<MessageId> {
        if text.trim().is_empty() || self.scheduler.is_shut_down() {
            return None;
        }

        let mut user_id = None;
        self.state.send_modify(|state| {
            user_id = Some(state.conversation.add_user(text));
            state.pending += 1;
        });

        let chat = &self.catalog.chat;
        let reply = pick(self.chooser.as_mut(), &chat.replies)
            .cloned()
            .unwrap_or_default();
        let quick_replies = pick(self.chooser.as_mut(), &chat.quick_reply_sets).cloned();

        tracing::info!(conversation_id = %self.conversation_id(), "User message received");
        self.enqueue(QueuedReply {
            content: reply,
            quick_replies,
        });

        user_id
    }

    /// Tapping a suggestion sends it as if typed
    pub fn submit_quick_reply(&mut self, text: &str) -> Option<MessageId> {
        self.submit(text)
    }

    /// Stop all pending replies; later submissions are ignored
    pub fn teardown(&self) {
        tracing::debug!(conversation_id = %self.conversation_id(), "Chat session torn down");
        self.stop();
    }

    /// Cancel outstanding work and drop the indicator it was holding up
    fn stop(&self) {
        self.scheduler.shutdown();
        self.state.send_if_modified(|state| {
            let was_composing = state.pending > 0;
            state.pending = 0;
            was_composing
        });
    }

    fn enqueue(&mut self, reply: QueuedReply) {
        if self.replies.is_none() {
            self.replies = Some(self.spawn_reply_worker());
        }
        if let Some(queue) = &self.replies {
            if queue.send(reply).is_err() {
                tracing::debug!("Reply worker gone, dropping canned reply");
            }
        }
    }

    /// One worker per session drains the queue in order
    fn spawn_reply_worker(&self) -> mpsc::UnboundedSender<QueuedReply> {
        let (queue, mut incoming) = mpsc::unbounded_channel::<QueuedReply>();

        let state = self.state.clone();
        let cancel = self.scheduler.token();
        let delay = self.timings.reply_delay;
        let conversation_id = self.conversation_id();

        self.scheduler.spawn(async move {
            while let Some(reply) = incoming.recv().await {
                tokio::time::sleep(delay).await;
                let delivered = state.send_if_modified(|state| {
                    if cancel.is_cancelled() {
                        return false;
                    }
                    state
                        .conversation
                        .add_assistant(&reply.content, reply.quick_replies);
                    state.pending = state.pending.saturating_sub(1);
                    true
                });
                if !delivered {
                    return;
                }
                tracing::debug!(%conversation_id, "Canned reply delivered");
            }
        });

        queue
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{MessageKind, Role};
    use crate::core::random::{RandomChooser, ScriptedChooser};
    use std::time::Duration;

    fn session(script: impl IntoIterator<Item = usize>) -> ChatSession {
        ChatSession::new(
            Arc::new(Catalog::default()),
            Timings::default(),
            Box::new(ScriptedChooser::new(script)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_with_greeting() {
        let chat = session([]);
        let messages = chat.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert!(messages[0].content.contains("Dr. Paw"));
        assert_eq!(messages[0].quick_replies.as_ref().map(Vec::len), Some(3));
        assert!(!chat.is_composing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_then_reply() {
        let mut chat = session([2, 1]);
        let catalog = Catalog::default();

        let id = chat.submit("My dog keeps scratching").unwrap();
        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].id, id);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "My dog keeps scratching");
        assert!(messages[1].quick_replies.is_none());
        assert!(chat.is_composing());

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert_eq!(chat.messages().len(), 2);
        assert!(chat.is_composing());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        let reply = &messages[2];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.kind, MessageKind::Text);
        assert_eq!(reply.content, catalog.chat.replies[2]);
        assert_eq!(reply.quick_replies.as_ref(), Some(&catalog.chat.quick_reply_sets[1]));
        assert!(reply.id > id);
        assert!(!chat.is_composing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_ignored() {
        let mut chat = session([]);
        assert!(chat.submit("").is_none());
        assert!(chat.submit("   \t\n").is_none());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(chat.messages().len(), 1);
        assert!(!chat.is_composing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_reply_is_a_submit() {
        let mut chat = session([]);
        chat.submit_quick_reply("Tell me more").unwrap();
        assert_eq!(chat.messages()[1].content, "Tell me more");

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(chat.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replies_are_serialized() {
        let mut chat = session([0, 0, 4, 2]);
        let catalog = Catalog::default();

        chat.submit("first").unwrap();
        chat.submit("second").unwrap();
        assert_eq!(chat.snapshot().pending(), 2);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        let messages = chat.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3].content, catalog.chat.replies[0]);
        assert!(chat.is_composing());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let messages = chat.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[4].content, catalog.chat.replies[4]);
        assert_eq!(messages[4].quick_replies.as_ref(), Some(&catalog.chat.quick_reply_sets[2]));
        assert!(!chat.is_composing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_indicator_clear() {
        let mut chat = session([]);
        let mut rx = chat.subscribe();
        rx.borrow_and_update();

        chat.submit("hello").unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_composing());

        rx.changed().await.unwrap();
        let state = rx.borrow_and_update();
        assert!(!state.is_composing());
        assert_eq!(state.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_drops_pending_reply() {
        let mut chat = session([]);
        chat.submit("are you there?").unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        chat.teardown();
        chat.scheduler().drained().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(chat.messages().len(), 2);
        assert!(chat.submit("hello?").is_none());
        assert_eq!(chat.messages().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_clears_indicator_for_observers() {
        let mut chat = session([]);
        let mut rx = chat.subscribe();
        chat.submit("one").unwrap();
        chat.submit("two").unwrap();
        assert!(rx.borrow_and_update().is_composing());

        chat.teardown();
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update();
        assert!(!state.is_composing());
        assert_eq!(state.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_session_clears_indicator() {
        let mut chat = session([]);
        let rx = chat.subscribe();
        chat.submit("anyone?").unwrap();
        drop(chat);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let state = rx.borrow();
        assert!(!state.is_composing());
        assert_eq!(state.messages().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_replies_keep_submission_order_across_workers() {
        let catalog = Catalog::default();
        let timings = Timings {
            reply_delay: Duration::from_millis(1),
            ..Timings::default()
        };

        for _ in 0..100 {
            let mut chat = ChatSession::new(
                Arc::new(catalog.clone()),
                timings,
                Box::new(ScriptedChooser::new([0, 0, 1, 1, 2, 2, 3, 3])),
            );
            let mut rx = chat.subscribe();
            for i in 0..4 {
                chat.submit(&format!("question {i}")).unwrap();
            }
            while rx.borrow_and_update().is_composing() {
                rx.changed().await.unwrap();
            }

            let replies: Vec<String> = chat
                .messages()
                .into_iter()
                .skip(1)
                .filter(|m| m.role == Role::Assistant)
                .map(|m| m.content)
                .collect();
            assert_eq!(replies, catalog.chat.replies[..4].to_vec());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_replies_come_from_catalog() {
        let catalog = Catalog::default();
        let mut chat = ChatSession::new(
            Arc::new(catalog.clone()),
            Timings::default(),
            Box::new(RandomChooser::seeded(99)),
        );

        for i in 0..10 {
            chat.submit(&format!("question {i}")).unwrap();
        }
        tokio::time::sleep(Duration::from_secs(20)).await;

        let snapshot = chat.snapshot();
        let replies: Vec<&Message> = snapshot
            .messages()
            .iter()
            .skip(1)
            .filter(|m| m.role == Role::Assistant)
            .collect();
        assert_eq!(replies.len(), 10);
        for reply in replies {
            assert!(catalog.chat.replies.contains(&reply.content));
            let quick = reply.quick_replies.as_ref().unwrap();
            assert!(catalog.chat.quick_reply_sets.contains(quick));
        }
    }
}
