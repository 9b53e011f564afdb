// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

/// Pause between the user's pick landing and the guide's answer, so the
/// reply does not appear in the same frame as the question.
pub const REPLY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

pub struct Topic {
    pub key: char,
    pub label: &'static str,
    pub response: &'static str,
}

pub const GREETING: &str = "Hello! I'm your crypto spirit guide. Press one of the keys below to learn about the world of cryptocurrencies.";

pub const TOPICS: [Topic; 4] = [
    Topic {
        key: '1',
        label: "What is Bitcoin?",
        response: "Bitcoin is like the ancient tree spirit of the crypto forest. Born in 2009 by a mysterious entity known as Satoshi Nakamoto, it was the first cryptocurrency to use blockchain technology. Like how Totoro watches over the forest, Bitcoin stands as the guardian of the crypto realm, inspiring all who came after it.",
    },
    Topic {
        key: '2',
        label: "Explain blockchain",
        response: "Blockchain is like the river that flows through the Valley of the Wind. Each drop of water is a transaction, flowing together in blocks, creating a continuous stream of information that cannot be altered. Just as the river connects all parts of the valley, blockchain connects all transactions in a transparent, immutable ledger that anyone can see but no one can change without consensus.",
    },
    Topic {
        key: '3',
        label: "Crypto risks",
        response: "Like venturing into the toxic jungle in Nausicaä, the crypto world has its dangers. Market volatility can rise and fall like the winds of change. Scams lurk like toxic spores. Even the most beautiful crypto projects can hide risks. Always research thoroughly, invest only what you can afford to lose, and keep your private keys safe like Sheeta guards her crystal pendant.",
    },
    Topic {
        key: '4',
        label: "Getting started",
        response: "Beginning your crypto journey is like Chihiro entering the spirit world. First, find a reputable exchange to be your guide. Create a secure wallet to store your treasures. Start with small amounts as you learn. Read the ancient scrolls (whitepapers) before investing. And remember, like Haku helped Chihiro, the community can offer guidance when you're lost. The path may seem strange at first, but with time, you'll find your way.",
    },
];

struct PendingReply {
    due: Instant,
    topic: usize,
}

/// Append-only message log with at most one reply in flight.
pub struct Chat {
    messages: Vec<Message>,
    pending: Option<PendingReply>,
    changed: bool,
}

impl Chat {
    pub fn new() -> Self {
        Self {
            messages: vec![Message {
                role: Role::Assistant,
                content: GREETING.to_string(),
            }],
            pending: None,
            changed: true,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn reply_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// User picked topic `idx`. The question lands immediately, the
    /// answer after `REPLY_DELAY`. Ignored while a reply is in flight.
    pub fn select_topic(&mut self, idx: usize, now: Instant) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let Some(topic) = TOPICS.get(idx) else {
            return false;
        };

        self.messages.push(Message {
            role: Role::User,
            content: topic.label.to_string(),
        });
        self.pending = Some(PendingReply {
            due: now + REPLY_DELAY,
            topic: idx,
        });
        self.changed = true;
        true
    }

    /// Deliver the pending reply once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) {
        let due = match &self.pending {
            Some(p) if now >= p.due => p.topic,
            _ => return,
        };
        self.pending = None;
        self.messages.push(Message {
            role: Role::Assistant,
            content: TOPICS[due].response.to_string(),
        });
        self.changed = true;
    }

    /// True once per change; the render loop uses this to skip frames
    /// where only the backdrop moved.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_with_the_greeting() {
        let chat = Chat::new();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, Role::Assistant);
        assert_eq!(chat.messages()[0].content, GREETING);
    }

    #[test]
    fn selecting_a_topic_asks_now_and_answers_after_the_delay() {
        let mut chat = Chat::new();
        let t0 = Instant::now();

        assert!(chat.select_topic(0, t0));
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1].role, Role::User);
        assert_eq!(chat.messages()[1].content, TOPICS[0].label);
        assert!(chat.reply_pending());

        chat.poll(t0 + REPLY_DELAY - Duration::from_millis(1));
        assert_eq!(chat.messages().len(), 2);

        chat.poll(t0 + REPLY_DELAY);
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[2].role, Role::Assistant);
        assert_eq!(chat.messages()[2].content, TOPICS[0].response);
        assert!(!chat.reply_pending());
    }

    #[test]
    fn only_one_reply_in_flight() {
        let mut chat = Chat::new();
        let t0 = Instant::now();

        assert!(chat.select_topic(1, t0));
        assert!(!chat.select_topic(2, t0));
        assert_eq!(chat.messages().len(), 2);

        chat.poll(t0 + REPLY_DELAY);
        assert!(chat.select_topic(2, t0 + REPLY_DELAY));
        assert_eq!(chat.messages().len(), 4);
    }

    #[test]
    fn out_of_range_topic_is_rejected() {
        let mut chat = Chat::new();
        assert!(!chat.select_topic(TOPICS.len(), Instant::now()));
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn take_changed_reports_once() {
        let mut chat = Chat::new();
        assert!(chat.take_changed());
        assert!(!chat.take_changed());
        chat.select_topic(0, Instant::now());
        assert!(chat.take_changed());
        assert!(!chat.take_changed());
    }
}
