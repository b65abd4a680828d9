// EstateHub - app/chat.rs
//
// Chat session: the display-only message log plus delayed bot replies.
//
// Architecture:
//   - The reply is computed on the caller's thread when the user message is
//     sent, so the seeded RNG sees a deterministic call sequence.
//   - Delivery is deferred by a per-reply timer thread that sleeps for a
//     pseudo-random delay and then sends the reply over an mpsc channel.
//   - An `Arc<AtomicBool>` cancel flag is shared with every timer thread.
//     `close()` and `Drop` set it; timers sleep in small sub-intervals and
//     exit within REPLY_CANCEL_CHECK_INTERVAL_MS without sending.
//   - The owner polls the channel (`poll`) or blocks on it
//     (`wait_for_reply`). Nothing is appended once the session is closed.

use crate::core::responder::{utterance_for_action, Reply, Responder};
use crate::util::constants::REPLY_CANCEL_CHECK_INTERVAL_MS;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// One entry in the chat log.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    User {
        id: u64,
        text: String,
        sent_at: DateTime<Utc>,
    },
    Bot {
        id: u64,
        reply: Reply,
        sent_at: DateTime<Utc>,
    },
}

impl ChatMessage {
    pub fn id(&self) -> u64 {
        match self {
            Self::User { id, .. } | Self::Bot { id, .. } => *id,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::User { text, .. } => text,
            Self::Bot { reply, .. } => reply.text(),
        }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Self::Bot { .. })
    }
}

pub struct ChatSession {
    responder: Responder,
    rng: StdRng,
    delay_min_ms: u64,
    delay_max_ms: u64,
    messages: Vec<ChatMessage>,
    next_id: u64,
    reply_tx: mpsc::Sender<Reply>,
    reply_rx: mpsc::Receiver<Reply>,
    cancel_flag: Arc<AtomicBool>,
    pending: usize,
}

impl ChatSession {
    /// Start a session with the welcome message already in the log.
    ///
    /// `seed` fixes the RNG for fallback picks and reply delays; `None`
    /// seeds from entropy.
    pub fn new(responder: Responder, delay_min_ms: u64, delay_max_ms: u64, seed: Option<u64>) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel();
        let mut session = Self {
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
            delay_min_ms: delay_min_ms.min(delay_max_ms),
            delay_max_ms: delay_max_ms.max(delay_min_ms),
            messages: Vec::new(),
            next_id: 1,
            reply_tx,
            reply_rx,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            pending: 0,
            responder,
        };
        let welcome = session.responder.welcome();
        session.push_bot(welcome);
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while at least one reply is still on its way.
    pub fn is_typing(&self) -> bool {
        self.pending > 0
    }

    pub fn is_closed(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    /// Append a user message and schedule the bot's reply.
    ///
    /// Blank input and sends after `close()` are ignored; returns whether
    /// the message was accepted.
    pub fn send(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.is_closed() {
            return false;
        }

        let id = self.take_id();
        self.messages.push(ChatMessage::User {
            id,
            text: text.to_string(),
            sent_at: Utc::now(),
        });

        let reply = self.responder.respond(text, &mut self.rng);
        let delay = Duration::from_millis(self.rng.gen_range(self.delay_min_ms..=self.delay_max_ms));
        let tx = self.reply_tx.clone();
        let cancel = Arc::clone(&self.cancel_flag);
        std::thread::spawn(move || deliver_after(reply, delay, tx, cancel));
        self.pending += 1;

        tracing::debug!(message_id = id, delay_ms = delay.as_millis() as u64, "Reply scheduled");
        true
    }

    /// Press a suggested-action button.
    pub fn invoke_action(&mut self, action_id: &str) -> bool {
        self.send(&utterance_for_action(action_id))
    }

    /// Append every reply delivered so far. Never blocks.
    pub fn poll(&mut self) -> usize {
        let mut delivered = 0;
        while !self.is_closed() {
            match self.reply_rx.try_recv() {
                Ok(reply) => {
                    self.accept(reply);
                    delivered += 1;
                }
                Err(_) => break,
            }
        }
        delivered
    }

    /// Block until the next reply arrives or `timeout` passes.
    pub fn wait_for_reply(&mut self, timeout: Duration) -> Option<&ChatMessage> {
        if self.pending == 0 || self.is_closed() {
            return None;
        }
        let reply = self.reply_rx.recv_timeout(timeout).ok()?;
        self.accept(reply);
        self.messages.last()
    }

    /// Tear the session down. Pending replies are discarded.
    pub fn close(&mut self) {
        if !self.is_closed() {
            self.cancel_flag.store(true, Ordering::SeqCst);
            if self.pending > 0 {
                tracing::debug!(discarded = self.pending, "Chat closed with replies pending");
            }
            self.pending = 0;
        }
    }

    fn accept(&mut self, reply: Reply) {
        self.pending = self.pending.saturating_sub(1);
        self.push_bot(reply);
    }

    fn push_bot(&mut self, reply: Reply) {
        let id = self.take_id();
        self.messages.push(ChatMessage::Bot {
            id,
            reply,
            sent_at: Utc::now(),
        });
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }
}

/// Timer thread body: sleep for `delay` in small steps, then deliver.
fn deliver_after(reply: Reply, delay: Duration, tx: mpsc::Sender<Reply>, cancel: Arc<AtomicBool>) {
    let step = Duration::from_millis(REPLY_CANCEL_CHECK_INTERVAL_MS);
    let mut remaining = delay;
    while !remaining.is_zero() {
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        let nap = remaining.min(step);
        std::thread::sleep(nap);
        remaining -= nap;
    }
    if cancel.load(Ordering::SeqCst) {
        return;
    }
    // The receiver is gone once the session is dropped; nothing to do then.
    let _ = tx.send(reply);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed;

    fn session(min_ms: u64, max_ms: u64) -> ChatSession {
        let responder = Responder::from_catalog(&seed::properties(), &seed::service_offers());
        ChatSession::new(responder, min_ms, max_ms, Some(5))
    }

    #[test]
    fn test_starts_with_welcome() {
        let chat = session(0, 0);
        assert_eq!(chat.messages().len(), 1);
        assert!(chat.messages()[0].is_bot());
        assert!(!chat.is_typing());
    }

    #[test]
    fn test_message_ids_are_sequential() {
        let mut chat = session(0, 0);
        chat.send("where can I buy?");
        chat.wait_for_reply(Duration::from_secs(2));
        let ids: Vec<u64> = chat.messages().iter().map(ChatMessage::id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut chat = session(0, 0);
        assert!(!chat.send("   "));
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn test_reply_follows_user_message() {
        let mut chat = session(0, 10);
        assert!(chat.send("show me featured homes"));
        assert!(chat.is_typing());
        // The user message is in the log before any reply.
        assert_eq!(chat.messages().last().map(ChatMessage::is_bot), Some(false));

        let reply = chat
            .wait_for_reply(Duration::from_secs(2))
            .expect("reply within timeout")
            .clone();
        assert!(matches!(reply, ChatMessage::Bot { reply: Reply::PropertyCards { .. }, .. }));
        assert_eq!(chat.messages().len(), 3);
        assert!(!chat.is_typing());
    }

    #[test]
    fn test_close_discards_pending_reply() {
        let mut chat = session(100, 100);
        chat.send("what services do you offer");
        chat.close();
        std::thread::sleep(Duration::from_millis(250));
        assert_eq!(chat.poll(), 0);
        assert_eq!(chat.messages().len(), 2);
        assert!(!chat.send("hello again"));
    }

    #[test]
    fn test_invoke_action_sends_canned_utterance() {
        let mut chat = session(0, 0);
        chat.invoke_action("price-luxury");
        assert_eq!(
            chat.messages().last().map(ChatMessage::text),
            Some("I'm looking for luxury properties over $1,000,000")
        );
    }

    #[test]
    fn test_poll_collects_all_delivered() {
        let mut chat = session(0, 0);
        chat.send("where can I live");
        chat.send("what is the price");
        let mut delivered = 0;
        for _ in 0..100 {
            delivered += chat.poll();
            if delivered == 2 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(delivered, 2);
        assert_eq!(chat.messages().len(), 5);
    }
}
