use crate::{Card, Direction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Tap,
    Retry,
    Swipe,
    Touch,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    Running,
    AwaitingRetry,
    Idle,
    Suppressed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RunStarted {
        run: u64,
        force: Card,
        /// True when the force came from a gesture rather than a random pick.
        forced: bool,
        length: usize,
        force_index: usize,
    },
    CardShown { index: usize, card: Card },
    SequenceExhausted { run: u64 },
    RetryOffered,
    RetryTaken,
    SwipeBuffered { len: usize },
    ForceArmed { card: Card, runs: u32 },
    SwipeRejected { directions: [Direction; 3] },
    InputIgnored { input: InputKind, reason: IgnoreReason },
    Reset,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
