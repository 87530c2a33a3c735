use crate::Card;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForceDirective {
    pub card: Card,
    pub runs_left: u32,
}

/// Pending force override, armed by a decoded gesture and spent by runs.
#[derive(Debug, Default, Clone)]
pub struct ForcePlan {
    pending: Option<ForceDirective>,
}

impl ForcePlan {
    /// Replaces whatever was pending. Zero runs disarms.
    pub fn arm(&mut self, card: Card, runs: u32) {
        self.pending = (runs > 0).then_some(ForceDirective {
            card,
            runs_left: runs,
        });
    }

    /// Spend one use of the pending force, if any.
    pub fn take(&mut self) -> Option<Card> {
        let directive = self.pending.as_mut()?;
        let card = directive.card;
        directive.runs_left = directive.runs_left.saturating_sub(1);
        if directive.runs_left == 0 {
            self.pending = None;
        }
        Some(card)
    }

    pub fn pending(&self) -> Option<ForceDirective> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
