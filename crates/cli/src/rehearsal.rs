//! Headless runs of the trick on a virtual clock.

use forcedeck_core::{Direction, Event, EventBus, Phase, Trick};
use serde::Serialize;
use std::time::Duration;

/// Gap left between scripted swipes, like a hand lifting between strokes.
const SWIPE_GAP: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: Event,
}

#[derive(Debug, Default, Serialize)]
pub struct Rehearsal {
    pub timeline: Vec<TimedEvent>,
    pub sequences: Vec<Vec<String>>,
}

struct Recorder {
    events: EventBus,
    timeline: Vec<TimedEvent>,
}

impl Recorder {
    fn collect(&mut self, now: Duration) {
        let at_ms = now.as_millis() as u64;
        self.timeline
            .extend(self.events.drain().map(|event| TimedEvent { at_ms, event }));
    }
}

/// Swipe the given directions, then perform `runs` full runs, pressing retry
/// after each one.
pub fn rehearse(trick: &mut Trick, swipes: &[Direction], runs: usize) -> Rehearsal {
    let suppression = trick.config().timing.input_suppression();
    let mut recorder = Recorder {
        events: EventBus::default(),
        timeline: Vec::new(),
    };
    let mut sequences = Vec::new();
    let mut now = trick.now();

    for direction in swipes {
        trick.swipe(*direction, now, &mut recorder.events);
        recorder.collect(now);
        now += SWIPE_GAP;
    }
    if !swipes.is_empty() {
        now += suppression;
    }

    for _ in 0..runs {
        trick.tap(now, &mut recorder.events);
        recorder.collect(now);
        if let Some(sequence) = trick.sequence() {
            sequences.push(sequence.cards().iter().map(|card| card.code()).collect());
        }
        while trick.phase() != Phase::AwaitingRetry {
            let Some(due) = trick.next_due() else {
                break;
            };
            now = now.max(due);
            trick.advance(now, &mut recorder.events);
            recorder.collect(now);
        }
        trick.retry(now, &mut recorder.events);
        recorder.collect(now);
        now += suppression;
    }

    Rehearsal {
        timeline: recorder.timeline,
        sequences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forcedeck_core::{RngState, TrickConfig};

    fn trick() -> Trick {
        Trick::staged(TrickConfig::default(), RngState::from_seed(77)).expect("trick")
    }

    #[test]
    fn rehearsal_forces_the_swiped_card() {
        let mut trick = trick();
        let swipes = Direction::parse_sequence("UUR").expect("dirs");
        let rehearsal = rehearse(&mut trick, &swipes, 3);
        assert_eq!(rehearsal.sequences.len(), 3);
        assert_eq!(rehearsal.sequences[0][17], "qh");
        assert_eq!(rehearsal.sequences[1][17], "qh");
        let starts: Vec<bool> = rehearsal
            .timeline
            .iter()
            .filter_map(|timed| match timed.event {
                Event::RunStarted { forced, .. } => Some(forced),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec![true, true, false]);
        assert_eq!(trick.phase(), Phase::Idle);
    }

    #[test]
    fn timeline_is_ordered() {
        let mut trick = trick();
        let rehearsal = rehearse(&mut trick, &[], 1);
        assert!(rehearsal
            .timeline
            .windows(2)
            .all(|pair| pair[0].at_ms <= pair[1].at_ms));
        let shown = rehearsal
            .timeline
            .iter()
            .filter(|timed| matches!(timed.event, Event::CardShown { .. }))
            .count();
        assert_eq!(shown, 25);
        assert!(rehearsal
            .timeline
            .iter()
            .any(|timed| timed.event == Event::RetryOffered && timed.at_ms == 2_542));
    }
}
