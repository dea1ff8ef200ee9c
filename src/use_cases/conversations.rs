// Conversation state shared by the client- and vendor-side chat screens.
//
// The store owns the fetched conversation list, the focused conversation and
// its live message buffer. Outbound traffic goes through a channel command
// sender wired to the realtime socket; inbound messages are fed back in via
// `handle_incoming`.

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{Conversation, Message};
use crate::domain::errors::ChatError;
use crate::domain::ports::{Clock, ConversationApi, Notifier};

/// Commands the store emits towards the realtime channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelCommand {
    JoinConversation {
        conversation_id: String,
    },
    SendMessage {
        conversation_id: String,
        content: String,
        to_user_id: String,
        client_ref: String,
    },
    MarkRead {
        message_id: String,
    },
}

/// Focus target for `select_conversation`.
#[derive(Debug, Clone)]
pub enum ConversationTarget {
    // Resolved against the already-fetched list.
    Id(String),
    // Used as-is, e.g. a conversation handed over from another screen.
    Conversation(Conversation),
}

pub struct ConversationStore<A, N, C>
where
    A: ConversationApi,
    N: Notifier,
    C: Clock,
{
    api: A,
    notifier: N,
    clock: C,
    // Session user id; messages from this id never count as unread.
    me: String,
    outbound: mpsc::Sender<ChannelCommand>,
    conversations: Vec<Conversation>,
    current_id: Option<String>,
    messages: Vec<Message>,
}

impl<A, N, C> ConversationStore<A, N, C>
where
    A: ConversationApi,
    N: Notifier,
    C: Clock,
{
    pub fn new(
        api: A,
        notifier: N,
        clock: C,
        me: impl Into<String>,
        outbound: mpsc::Sender<ChannelCommand>,
    ) -> Self {
        Self {
            api,
            notifier,
            clock,
            me: me.into(),
            outbound,
            conversations: Vec::new(),
            current_id: None,
            messages: Vec::new(),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn current(&self) -> Option<&Conversation> {
        let id = self.current_id.as_deref()?;
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// The focused conversation's live message buffer.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Sum of unread counts across all conversations.
    pub fn total_unread(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread_count).sum()
    }

    /// Refreshes the conversation list from REST. Safe to call repeatedly:
    /// unread counts are recomputed from message state, ordering is
    /// newest-first by last activity, and the focused conversation's live
    /// buffer is merged rather than discarded.
    pub async fn fetch_conversations(&mut self) -> Result<(), ChatError> {
        let fetched = match self.api.fetch_conversations().await {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, "failed to fetch conversations");
                self.notifier
                    .error("Could not load conversations. Please try again later.");
                return Err(ChatError::Api(err));
            }
        };

        let mut next: Vec<Conversation> =
            fetched.into_iter().map(|c| self.annotate(c)).collect();
        // Stable sort keeps equal-activity conversations in server order.
        next.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));

        let mut focused_buffer: Option<Vec<Message>> = None;
        if let Some(current_id) = self.current_id.as_deref() {
            if let Some(refreshed) = next.iter_mut().find(|c| c.id == current_id) {
                // Server copy first, then optimistic sends the channel has
                // not echoed yet.
                let mut merged = refreshed.messages.clone();
                for local in self.messages.iter().filter(|m| m.optimistic) {
                    if !merged.iter().any(|m| is_echo_of(m, local)) {
                        merged.push(local.clone());
                    }
                }
                // Focused conversations never show as unread.
                refreshed.unread_count = 0;
                refreshed.messages = merged.clone();
                focused_buffer = Some(merged);
            }
        }
        if let Some(buffer) = focused_buffer {
            self.messages = buffer;
        }

        self.conversations = next;
        Ok(())
    }

    /// Starts (or resumes) a conversation with `counterpart_id`.
    ///
    /// At most one conversation exists per participant pair: when the
    /// counterpart already appears in the fetched list, that conversation is
    /// selected and no create call is issued. Callers share the store behind
    /// a lock, so rapid duplicate calls are serialized and the second one
    /// observes the first one's result.
    pub async fn start_conversation(
        &mut self,
        counterpart_id: &str,
    ) -> Result<Conversation, ChatError> {
        if let Some(existing) = self
            .conversations
            .iter()
            .find(|c| c.involves(counterpart_id))
            .cloned()
        {
            debug!(
                conversation_id = %existing.id,
                counterpart_id,
                "reusing existing conversation"
            );
            self.focus_on(&existing);
            let mut selected = existing;
            selected.unread_count = 0;
            return Ok(selected);
        }

        let created = match self.api.start_conversation(counterpart_id).await {
            Ok(conversation) => conversation,
            Err(err) => {
                warn!(error = %err, counterpart_id, "failed to start conversation");
                self.notifier
                    .error("Failed to start conversation. Please try again.");
                return Err(ChatError::Api(err));
            }
        };

        let mut conversation = self.annotate(created);
        conversation.unread_count = 0;
        conversation.last_activity = self.clock.now();
        self.conversations.insert(0, conversation.clone());
        self.focus_on(&conversation);
        Ok(conversation)
    }

    /// Switches conversation focus. `None` clears focus and the buffer;
    /// selecting by id resolves against the fetched list and leaves state
    /// untouched when the id is unknown.
    pub fn select_conversation(&mut self, target: Option<ConversationTarget>) {
        match target {
            None => {
                self.current_id = None;
                self.messages.clear();
            }
            Some(ConversationTarget::Id(id)) => {
                let Some(conversation) =
                    self.conversations.iter().find(|c| c.id == id).cloned()
                else {
                    // Known edge case: ids can arrive before the list fetch.
                    warn!(conversation_id = %id, "conversation not found in fetched list");
                    return;
                };
                self.focus_on(&conversation);
            }
            Some(ConversationTarget::Conversation(conversation)) => {
                let conversation = self.annotate(conversation);
                // A conversation handed over from another screen may not be
                // in the fetched list yet; track it so unread bookkeeping
                // and counterpart lookups keep working.
                if !self.conversations.iter().any(|c| c.id == conversation.id) {
                    self.conversations.insert(0, conversation.clone());
                    self.conversations
                        .sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
                }
                self.focus_on(&conversation);
            }
        }
    }

    /// Appends an optimistic message and emits a send event. Never blocks on
    /// channel acknowledgement; the echo later replaces the optimistic entry.
    pub fn send_message(&mut self, content: &str, to_user_id: &str) -> Result<Message, ChatError> {
        let conversation_id = self
            .current_id
            .clone()
            .ok_or(ChatError::NoActiveConversation)?;

        let client_ref = Uuid::new_v4().to_string();
        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.clone(),
            sender_id: self.me.clone(),
            recipient_id: to_user_id.to_string(),
            content: content.to_string(),
            created_at: self.clock.now(),
            read: false,
            client_ref: Some(client_ref.clone()),
            optimistic: true,
        };
        self.messages.push(message.clone());

        let delivered = self.send_command(ChannelCommand::SendMessage {
            conversation_id,
            content: content.to_string(),
            to_user_id: to_user_id.to_string(),
            client_ref,
        });
        if !delivered {
            self.notifier
                .error("Chat connection error: message not delivered.");
        }
        Ok(message)
    }

    /// Vendor-side convenience: the recipient is the focused conversation's
    /// other participant.
    pub fn send_message_to_counterpart(&mut self, content: &str) -> Result<Message, ChatError> {
        let current = self.current().ok_or(ChatError::NoActiveConversation)?;
        let counterpart = current
            .counterpart(&self.me)
            .ok_or(ChatError::MissingCounterpart)?;
        let to_user_id = counterpart.user_id.clone();
        self.send_message(content, &to_user_id)
    }

    /// Applies an inbound channel message: reconciles echoes of optimistic
    /// sends, appends new messages to the focused buffer, and bumps unread
    /// counts for everything else.
    pub fn handle_incoming(&mut self, message: Message) {
        let focused = self.current_id.as_deref() == Some(message.conversation_id.as_str());

        if focused {
            let slot = self
                .messages
                .iter()
                .position(|m| m.optimistic && is_echo_of(&message, m));
            match slot {
                Some(index) => {
                    debug!(message_id = %message.id, "reconciled optimistic message with echo");
                    self.messages[index] = message.clone();
                }
                None => self.messages.push(message.clone()),
            }
            if message.sender_id != self.me {
                self.send_command(ChannelCommand::MarkRead {
                    message_id: message.id.clone(),
                });
            }
        }

        // Keep the list in sync: record the message, bump activity so the
        // conversation moves to the head, and count off-focus arrivals.
        if let Some(position) = self
            .conversations
            .iter()
            .position(|c| c.id == message.conversation_id)
        {
            let mut conversation = self.conversations.remove(position);
            if !focused && message.sender_id != self.me {
                conversation.unread_count += 1;
            }
            conversation.last_activity = conversation.last_activity.max(message.created_at);
            conversation.messages.push(message);
            self.conversations.insert(0, conversation);
        } else {
            debug!(
                conversation_id = %message.conversation_id,
                "message for unknown conversation; it will surface on the next fetch"
            );
        }
    }

    // Recomputes unread from message state and keeps activity monotonic.
    fn annotate(&self, mut conversation: Conversation) -> Conversation {
        conversation.unread_count = conversation
            .messages
            .iter()
            .filter(|m| !m.read && m.sender_id != self.me)
            .count() as u32;
        if let Some(latest) = conversation.messages.iter().map(|m| m.created_at).max() {
            conversation.last_activity = conversation.last_activity.max(latest);
        }
        conversation
    }

    fn focus_on(&mut self, conversation: &Conversation) {
        self.send_command(ChannelCommand::JoinConversation {
            conversation_id: conversation.id.clone(),
        });
        self.messages = conversation.messages.clone();

        // Acknowledge whatever was pending before this focus, then zero the
        // local counter; the counter reset does not depend on the acks.
        for message in conversation
            .messages
            .iter()
            .filter(|m| !m.read && m.sender_id != self.me)
        {
            self.send_command(ChannelCommand::MarkRead {
                message_id: message.id.clone(),
            });
        }
        if let Some(entry) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation.id)
        {
            entry.unread_count = 0;
        }
        self.current_id = Some(conversation.id.clone());
    }

    fn send_command(&self, command: ChannelCommand) -> bool {
        match self.outbound.try_send(command) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "realtime channel unavailable; dropping command");
                false
            }
        }
    }
}

// Correlation-ref match with a value-match fallback for echoes without one.
fn is_echo_of(incoming: &Message, local: &Message) -> bool {
    match (&incoming.client_ref, &local.client_ref) {
        (Some(incoming_ref), Some(local_ref)) => incoming_ref == local_ref,
        _ => {
            incoming.conversation_id == local.conversation_id
                && incoming.content == local.content
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ApiError;
    use crate::use_cases::test_support::{
        ConversationFailures, FixedClock, RecordingConversationApi, RecordingNotifier,
        fixed_time, test_conversation, test_message,
    };
    use chrono::Duration;

    type TestStore = ConversationStore<RecordingConversationApi, RecordingNotifier, FixedClock>;

    fn store_with(
        api: RecordingConversationApi,
    ) -> (TestStore, mpsc::Receiver<ChannelCommand>, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let (tx, rx) = mpsc::channel(32);
        let store = ConversationStore::new(api, notifier.clone(), FixedClock(fixed_time()), "me", tx);
        (store, rx, notifier)
    }

    fn drain(rx: &mut mpsc::Receiver<ChannelCommand>) -> Vec<ChannelCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    #[tokio::test]
    async fn when_fetch_succeeds_then_list_is_sorted_newest_first_with_unread_counts() {
        let api = RecordingConversationApi::new("me");
        let mut older = test_conversation("conv-a", "me", "vendor-a");
        older
            .messages
            .push(test_message("conv-a", "vendor-a", "me", "hello", fixed_time()));
        let mut newer = test_conversation("conv-b", "me", "vendor-b");
        newer.messages.push(test_message(
            "conv-b",
            "vendor-b",
            "me",
            "quote ready",
            fixed_time() + Duration::seconds(60),
        ));
        api.seed(older);
        api.seed(newer);
        let (mut store, _rx, _notifier) = store_with(api);

        store
            .fetch_conversations()
            .await
            .expect("expected fetch to succeed");

        let ids: Vec<&str> = store.conversations().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["conv-b", "conv-a"]);
        assert_eq!(store.conversations()[0].unread_count, 1);
        assert_eq!(store.conversations()[1].unread_count, 1);
    }

    #[tokio::test]
    async fn when_fetch_repeats_with_no_change_then_list_is_identical() {
        let api = RecordingConversationApi::new("me");
        let mut conversation = test_conversation("conv-a", "me", "vendor-a");
        conversation
            .messages
            .push(test_message("conv-a", "vendor-a", "me", "hello", fixed_time()));
        api.seed(conversation);
        let (mut store, _rx, _notifier) = store_with(api);

        store.fetch_conversations().await.expect("first fetch");
        let first = store.conversations().to_vec();
        store.fetch_conversations().await.expect("second fetch");

        assert_eq!(store.conversations(), first.as_slice());
    }

    #[tokio::test]
    async fn when_fetch_fails_then_state_is_intact_and_error_is_notified() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, _rx, notifier) = store_with(api.clone());
        store.fetch_conversations().await.expect("seed fetch");

        let failing = api.with_failures(ConversationFailures {
            fetch: true,
            ..Default::default()
        });
        let (mut broken, _rx2, broken_notifier) = store_with(failing);

        let result = broken.fetch_conversations().await;

        assert!(matches!(result, Err(ChatError::Api(ApiError::Transport(_)))));
        assert!(broken.conversations().is_empty());
        assert_eq!(broken_notifier.messages_of("error").len(), 1);
        // The healthy store is untouched by the failing one.
        assert_eq!(store.conversations().len(), 1);
        assert!(notifier.messages_of("error").is_empty());
    }

    #[tokio::test]
    async fn when_fetch_runs_while_focused_then_optimistic_buffer_survives() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, _rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));
        store
            .send_message("are you free in June?", "vendor-a")
            .expect("send");

        store.fetch_conversations().await.expect("refetch");

        assert_eq!(store.messages().len(), 1);
        assert!(store.messages()[0].optimistic);
        assert_eq!(store.conversations()[0].unread_count, 0);
    }

    #[tokio::test]
    async fn when_counterpart_already_has_a_conversation_then_no_create_call_is_made() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, mut rx, _notifier) = store_with(api.clone());
        store.fetch_conversations().await.expect("fetch");

        let selected = store
            .start_conversation("vendor-a")
            .await
            .expect("expected start to reuse");

        assert_eq!(selected.id, "conv-a");
        assert_eq!(api.start_calls(), 0);
        assert_eq!(store.conversations().len(), 1);
        let commands = drain(&mut rx);
        assert!(commands.contains(&ChannelCommand::JoinConversation {
            conversation_id: "conv-a".to_string()
        }));
    }

    #[tokio::test]
    async fn when_start_is_called_twice_then_exactly_one_conversation_exists() {
        let api = RecordingConversationApi::new("me");
        let (mut store, _rx, _notifier) = store_with(api.clone());

        store.start_conversation("vendor-1").await.expect("first");
        store.start_conversation("vendor-1").await.expect("second");

        assert_eq!(api.start_calls(), 1);
        assert_eq!(store.conversations().len(), 1);
    }

    #[tokio::test]
    async fn when_start_fails_then_list_is_unchanged_and_error_is_notified() {
        let api = RecordingConversationApi::new("me").with_failures(ConversationFailures {
            start: true,
            ..Default::default()
        });
        let (mut store, _rx, notifier) = store_with(api);

        let result = store.start_conversation("vendor-1").await;

        assert!(matches!(result, Err(ChatError::Api(_))));
        assert!(store.conversations().is_empty());
        assert!(store.current_id().is_none());
        assert_eq!(notifier.messages_of("error").len(), 1);
    }

    #[tokio::test]
    async fn when_selecting_an_unknown_id_then_state_is_unchanged() {
        let api = RecordingConversationApi::new("me");
        let (mut store, mut rx, _notifier) = store_with(api);

        store.select_conversation(Some(ConversationTarget::Id("missing".to_string())));

        assert!(store.current_id().is_none());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn when_selecting_a_conversation_with_unread_then_counter_resets_and_acks_flow() {
        let api = RecordingConversationApi::new("me");
        let mut conversation = test_conversation("conv-a", "me", "vendor-a");
        conversation
            .messages
            .push(test_message("conv-a", "vendor-a", "me", "hello", fixed_time()));
        conversation.messages.push(test_message(
            "conv-a",
            "vendor-a",
            "me",
            "any update?",
            fixed_time() + Duration::seconds(5),
        ));
        api.seed(conversation);
        let (mut store, mut rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        assert_eq!(store.conversations()[0].unread_count, 2);

        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));

        assert_eq!(store.conversations()[0].unread_count, 0);
        assert_eq!(store.messages().len(), 2);
        let marks = drain(&mut rx)
            .into_iter()
            .filter(|c| matches!(c, ChannelCommand::MarkRead { .. }))
            .count();
        assert_eq!(marks, 2);
    }

    #[tokio::test]
    async fn when_clearing_selection_then_focus_and_buffer_reset() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, _rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));

        store.select_conversation(None);

        assert!(store.current_id().is_none());
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn when_sending_without_focus_then_send_is_rejected() {
        let api = RecordingConversationApi::new("me");
        let (mut store, mut rx, _notifier) = store_with(api);

        let result = store.send_message("hello", "vendor-1");

        assert!(matches!(result, Err(ChatError::NoActiveConversation)));
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn when_sending_then_optimistic_message_and_command_share_a_client_ref() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, mut rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));
        drain(&mut rx);

        let message = store
            .send_message("are you free in June?", "vendor-a")
            .expect("send");

        assert!(message.optimistic);
        assert_eq!(store.messages().len(), 1);
        let commands = drain(&mut rx);
        match commands.as_slice() {
            [ChannelCommand::SendMessage {
                conversation_id,
                content,
                to_user_id,
                client_ref,
            }] => {
                assert_eq!(conversation_id, "conv-a");
                assert_eq!(content, "are you free in June?");
                assert_eq!(to_user_id, "vendor-a");
                assert_eq!(Some(client_ref.as_str()), message.client_ref.as_deref());
            }
            other => panic!("expected a single send command, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn when_echo_arrives_then_optimistic_message_is_replaced_not_duplicated() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, _rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));
        let optimistic = store.send_message("hello there", "vendor-a").expect("send");

        let mut echo = test_message("conv-a", "me", "vendor-a", "hello there", fixed_time());
        echo.id = "server-1".to_string();
        echo.client_ref = optimistic.client_ref.clone();
        store.handle_incoming(echo);

        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].id, "server-1");
        assert!(!store.messages()[0].optimistic);
    }

    #[tokio::test]
    async fn when_echo_lacks_a_client_ref_then_value_match_reconciles() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, _rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));
        store.send_message("hello there", "vendor-a").expect("send");

        let mut echo = test_message("conv-a", "me", "vendor-a", "hello there", fixed_time());
        echo.id = "server-1".to_string();
        store.handle_incoming(echo);

        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].id, "server-1");
    }

    #[tokio::test]
    async fn when_a_message_lands_off_focus_then_unread_increments_and_buffer_is_untouched() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        api.seed(test_conversation("conv-b", "me", "vendor-b"));
        let (mut store, _rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));

        let inbound = test_message(
            "conv-b",
            "vendor-b",
            "me",
            "new quote",
            fixed_time() + Duration::seconds(30),
        );
        store.handle_incoming(inbound);

        assert!(store.messages().is_empty());
        let conv_b = store
            .conversations()
            .iter()
            .find(|c| c.id == "conv-b")
            .expect("conv-b present");
        assert_eq!(conv_b.unread_count, 1);
        // Newest activity moves the conversation to the head of the list.
        assert_eq!(store.conversations()[0].id, "conv-b");
    }

    #[tokio::test]
    async fn when_an_inbound_message_hits_the_focused_conversation_then_it_is_acked() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, mut rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));
        drain(&mut rx);

        let mut inbound = test_message("conv-a", "vendor-a", "me", "got it", fixed_time());
        inbound.id = "server-9".to_string();
        store.handle_incoming(inbound);

        assert_eq!(store.messages().len(), 1);
        let commands = drain(&mut rx);
        assert_eq!(
            commands,
            vec![ChannelCommand::MarkRead {
                message_id: "server-9".to_string()
            }]
        );
        // Focused arrivals never count as unread.
        assert_eq!(store.conversations()[0].unread_count, 0);
    }

    #[tokio::test]
    async fn when_a_full_conversation_is_selected_then_it_joins_the_list() {
        let api = RecordingConversationApi::new("me");
        let (mut store, _rx, _notifier) = store_with(api);
        let handed_over = test_conversation("conv-x", "me", "vendor-x");

        store.select_conversation(Some(ConversationTarget::Conversation(handed_over)));

        assert_eq!(store.current_id(), Some("conv-x"));
        assert_eq!(store.conversations().len(), 1);
    }

    #[tokio::test]
    async fn when_sending_to_the_counterpart_then_the_recipient_is_derived() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        let (mut store, mut rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");
        store.select_conversation(Some(ConversationTarget::Id("conv-a".to_string())));
        drain(&mut rx);

        let message = store
            .send_message_to_counterpart("quote please")
            .expect("send");

        assert_eq!(message.recipient_id, "vendor-a");
        match drain(&mut rx).as_slice() {
            [ChannelCommand::SendMessage { to_user_id, .. }] => {
                assert_eq!(to_user_id, "vendor-a");
            }
            other => panic!("expected a single send command, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn when_messages_arrive_across_conversations_then_total_unread_sums() {
        let api = RecordingConversationApi::new("me");
        api.seed(test_conversation("conv-a", "me", "vendor-a"));
        api.seed(test_conversation("conv-b", "me", "vendor-b"));
        let (mut store, _rx, _notifier) = store_with(api);
        store.fetch_conversations().await.expect("fetch");

        store.handle_incoming(test_message("conv-a", "vendor-a", "me", "one", fixed_time()));
        store.handle_incoming(test_message("conv-b", "vendor-b", "me", "two", fixed_time()));
        store.handle_incoming(test_message("conv-b", "vendor-b", "me", "three", fixed_time()));

        assert_eq!(store.total_unread(), 3);
    }
}
