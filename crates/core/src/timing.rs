use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When the reveal chain switches from `speed_start` to `speed_end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Settle {
    /// Past this fraction of the sequence length (strictly greater).
    Fraction(f64),
    /// Once the forced card has been shown.
    AfterForce,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DelayPolicy {
    pub speed_start_ms: u64,
    pub speed_end_ms: u64,
    pub settle: Settle,
    /// Pause held on the forced card itself.
    #[serde(default)]
    pub force_hold_ms: Option<u64>,
}

impl DelayPolicy {
    /// Delay before the next reveal step.
    ///
    /// `revealed` counts the cards shown so far, i.e. the position index after
    /// it has been advanced past the card just displayed.
    pub fn next_delay(&self, revealed: usize, len: usize, force_index: usize) -> Duration {
        if let Some(hold) = self.force_hold_ms {
            if revealed.checked_sub(1) == Some(force_index) {
                return Duration::from_millis(hold);
            }
        }
        let settled = match self.settle {
            Settle::Fraction(fraction) => revealed as f64 > len as f64 * fraction,
            Settle::AfterForce => revealed > force_index,
        };
        if settled {
            Duration::from_millis(self.speed_end_ms)
        } else {
            Duration::from_millis(self.speed_start_ms)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    /// Run start to the first reveal step.
    pub initial_delay_ms: u64,
    /// Hide to show within one reveal step.
    pub flip_delay_ms: u64,
    /// Last card to the retry affordance.
    pub exit_delay_ms: u64,
    pub indicator_hold_ms: u64,
    /// Taps are dropped for this long after a swipe or a retry click.
    pub input_suppression_ms: u64,
    pub policy: DelayPolicy,
}

impl TimingConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn flip_delay(&self) -> Duration {
        Duration::from_millis(self.flip_delay_ms)
    }

    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }

    pub fn indicator_hold(&self) -> Duration {
        Duration::from_millis(self.indicator_hold_ms)
    }

    pub fn input_suppression(&self) -> Duration {
        Duration::from_millis(self.input_suppression_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 120,
            flip_delay_ms: 40,
            exit_delay_ms: 120,
            indicator_hold_ms: 420,
            input_suppression_ms: 450,
            policy: DelayPolicy {
                speed_start_ms: 60,
                speed_end_ms: 38,
                settle: Settle::Fraction(0.65),
                force_hold_ms: None,
            },
        }
    }
}
