use forcedeck_core::{
    Card, Direction, Event, EventBus, Face, IgnoreReason, InputKind, Phase, Preset, RngState,
    Trick, TrickConfig,
};
use std::time::Duration;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn card(code: &str) -> Card {
    code.parse().expect("card code")
}

fn new_trick(seed: u64) -> Trick {
    Trick::staged(TrickConfig::default(), RngState::from_seed(seed)).expect("trick")
}

fn swipes(trick: &mut Trick, dirs: &str, at: Duration, events: &mut EventBus) {
    for dir in Direction::parse_sequence(dirs).expect("directions") {
        trick.swipe(dir, at, events);
    }
}

fn shown_cards(events: &mut EventBus) -> Vec<(usize, Card)> {
    events
        .drain()
        .filter_map(|event| match event {
            Event::CardShown { index, card } => Some((index, card)),
            _ => None,
        })
        .collect()
}

#[test]
fn forced_queen_of_hearts_end_to_end() {
    let mut trick = new_trick(1);
    let mut events = EventBus::default();
    swipes(&mut trick, "UUR", ms(0), &mut events);
    assert_eq!(trick.presenter().indicator_text, "QH");
    events.drain().for_each(drop);

    trick.tap(ms(1_000), &mut events);
    assert_eq!(trick.phase(), Phase::Running);
    let sequence = trick.sequence().expect("sequence").clone();
    assert_eq!(sequence.len(), 25);
    assert_eq!(sequence.cards()[17], card("qh"));
    assert_eq!(
        sequence.cards().iter().filter(|c| **c == card("qh")).count(),
        1
    );

    trick.advance(ms(10_000), &mut events);
    let collected: Vec<Event> = events.drain().collect();
    assert!(matches!(
        collected.first(),
        Some(Event::RunStarted { force, forced: true, force_index: 17, length: 25, .. })
            if *force == card("qh")
    ));
    let shown: Vec<Card> = collected
        .iter()
        .filter_map(|event| match event {
            Event::CardShown { card, .. } => Some(*card),
            _ => None,
        })
        .collect();
    assert_eq!(shown, sequence.cards());
    assert_eq!(collected.last(), Some(&Event::RetryOffered));
    assert_eq!(trick.phase(), Phase::AwaitingRetry);
    assert!(trick.presenter().retry_visible);
    assert!(!trick.presenter().card_visible);
}

#[test]
fn ace_of_diamonds_gesture_shows_indicator() {
    let mut trick = new_trick(2);
    let mut events = EventBus::default();
    swipes(&mut trick, "URUL", ms(0), &mut events);
    // URU decodes to the ace of spades, L starts a new triplet.
    assert_eq!(trick.presenter().indicator_text, "AS");
    assert_eq!(trick.buffered_swipes(), &[Direction::Left]);

    let mut trick = new_trick(2);
    swipes(&mut trick, "URL", ms(0), &mut events);
    assert_eq!(trick.pending_force().map(|d| d.card), Some(card("ad")));
    assert_eq!(trick.pending_force().map(|d| d.runs_left), Some(2));
    assert!(trick.presenter().indicator_visible);
    assert_eq!(trick.presenter().indicator_text, "AD");
    assert!(events
        .drain()
        .any(|event| event == Event::ForceArmed { card: card("ad"), runs: 2 }));
}

#[test]
fn unknown_triplet_is_silently_discarded() {
    let mut trick = new_trick(3);
    let mut events = EventBus::default();
    swipes(&mut trick, "DUL", ms(0), &mut events);
    assert_eq!(trick.pending_force(), None);
    assert!(!trick.presenter().indicator_visible);
    assert!(trick.buffered_swipes().is_empty());
    assert!(events.drain().any(|event| matches!(event, Event::SwipeRejected { .. })));
}

#[test]
fn force_is_spent_over_two_runs() {
    let mut trick = new_trick(4);
    let mut events = EventBus::default();
    swipes(&mut trick, "UDR", ms(0), &mut events);
    let mut now = ms(1_000);
    let mut forced_flags = Vec::new();
    for _ in 0..3 {
        trick.tap(now, &mut events);
        now += ms(5_000);
        trick.advance(now, &mut events);
        assert!(trick.retry(now, &mut events));
        now += ms(1_000);
        for event in events.drain() {
            if let Event::RunStarted { force, forced, .. } = event {
                forced_flags.push((force, forced));
            }
        }
    }
    assert_eq!(forced_flags[0], (card("kh"), true));
    assert_eq!(forced_flags[1], (card("kh"), true));
    assert!(!forced_flags[2].1);
    assert_eq!(trick.pending_force(), None);
    assert_eq!(trick.runs_started(), 3);
}

#[test]
fn run_counter_ticks_when_a_run_begins() {
    let mut trick = new_trick(4);
    let mut events = EventBus::default();
    assert_eq!(trick.runs_started(), 0);
    trick.tap(ms(0), &mut events);
    assert_eq!(trick.phase(), Phase::Running);
    assert_eq!(trick.runs_started(), 1);
    trick.advance(ms(5_000), &mut events);
    assert!(trick.retry(ms(5_000), &mut events));
    assert_eq!(trick.runs_started(), 1);
}

#[test]
fn start_is_a_no_op_while_busy() {
    let mut trick = new_trick(5);
    let mut events = EventBus::default();
    assert!(trick.start_run(ms(0), &mut events));
    trick.advance(ms(500), &mut events);
    let sequence = trick.sequence().cloned();
    let index = trick.index();
    assert!(!trick.start_run(ms(500), &mut events));
    trick.tap(ms(500), &mut events);
    assert_eq!(trick.sequence().cloned(), sequence);
    assert_eq!(trick.index(), index);

    trick.advance(ms(10_000), &mut events);
    assert_eq!(trick.phase(), Phase::AwaitingRetry);
    let sequence = trick.sequence().cloned();
    assert!(!trick.start_run(ms(10_000), &mut events));
    trick.tap(ms(10_000), &mut events);
    assert_eq!(trick.phase(), Phase::AwaitingRetry);
    assert_eq!(trick.sequence().cloned(), sequence);
    assert!(events.drain().any(|event| event
        == Event::InputIgnored {
            input: InputKind::Tap,
            reason: IgnoreReason::AwaitingRetry,
        }));
}

#[test]
fn classic_run_timeline() {
    let mut trick = new_trick(6);
    let mut events = EventBus::default();
    trick.start_run(ms(0), &mut events);
    // 120 initial + 25 flips of 40 + 16 fast gaps of 60 + 9 settled gaps of 38
    trick.advance(ms(2_421), &mut events);
    assert_eq!(trick.index(), 25);
    assert!(!events
        .drain()
        .any(|event| matches!(event, Event::SequenceExhausted { .. })));
    trick.advance(ms(2_422), &mut events);
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::SequenceExhausted { .. })));

    // Still running during the exit delay, so taps cannot start a run.
    trick.tap(ms(2_500), &mut events);
    assert_eq!(trick.phase(), Phase::Running);
    trick.advance(ms(2_541), &mut events);
    assert_eq!(trick.phase(), Phase::Running);
    trick.advance(ms(2_542), &mut events);
    assert_eq!(trick.phase(), Phase::AwaitingRetry);
}

#[test]
fn dramatic_preset_holds_on_the_force() {
    let config = TrickConfig::preset(Preset::Dramatic);
    let mut trick = Trick::staged(config, RngState::from_seed(7)).expect("trick");
    let mut events = EventBus::default();
    trick.start_run(ms(0), &mut events);
    // 120 + 18 flips of 40 + 16 gaps of 55 + one gap of 80 (index 17 > 16.25)
    let force_shown = 120 + 18 * 40 + 16 * 55 + 80;
    trick.advance(ms(force_shown), &mut events);
    assert_eq!(trick.index(), 18);
    assert_eq!(trick.next_due(), Some(ms(force_shown + 320)));
}

#[test]
fn retry_resets_display_and_suppresses_taps() {
    let mut trick = new_trick(8);
    let mut events = EventBus::default();
    trick.start_run(ms(0), &mut events);
    trick.advance(ms(10_000), &mut events);
    assert!(trick.retry(ms(10_000), &mut events));
    assert_eq!(trick.phase(), Phase::Idle);
    assert!(!trick.presenter().retry_visible);
    assert!(trick.presenter().card_visible);
    assert_eq!(trick.presenter().face, Face::Back);
    assert!(trick.sequence().is_none());

    trick.tap(ms(10_449), &mut events);
    assert_eq!(trick.phase(), Phase::Idle);
    trick.tap(ms(10_450), &mut events);
    assert_eq!(trick.phase(), Phase::Running);
    assert!(!trick.retry(ms(10_500), &mut events));
}

#[test]
fn swipe_suppresses_the_following_tap() {
    let mut trick = new_trick(9);
    let mut events = EventBus::default();
    trick.swipe(Direction::Up, ms(100), &mut events);
    trick.tap(ms(300), &mut events);
    assert_eq!(trick.phase(), Phase::Idle);
    assert!(events.drain().any(|event| event
        == Event::InputIgnored {
            input: InputKind::Tap,
            reason: IgnoreReason::Suppressed,
        }));
    trick.tap(ms(600), &mut events);
    assert_eq!(trick.phase(), Phase::Running);
}

#[test]
fn touches_become_swipes_or_taps() {
    let mut trick = new_trick(10);
    let mut events = EventBus::default();
    let mut now = ms(0);
    for (dx, dy) in [(0.0, -80.0), (0.0, -80.0), (90.0, 12.0)] {
        trick.touch_start(200.0, 300.0, now, &mut events);
        trick.touch_end(200.0 + dx, 300.0 + dy, now + ms(80), &mut events);
        now += ms(200);
    }
    assert_eq!(trick.pending_force().map(|d| d.card), Some(card("qh")));

    now += ms(1_000);
    trick.touch_start(200.0, 300.0, now, &mut events);
    trick.touch_end(210.0, 305.0, now + ms(50), &mut events);
    assert_eq!(trick.phase(), Phase::Running);
    assert_eq!(trick.sequence().map(|s| s.force()), Some(card("qh")));

    trick.touch_start(0.0, 0.0, now + ms(100), &mut events);
    trick.touch_end(0.0, -100.0, now + ms(150), &mut events);
    assert!(trick.buffered_swipes().is_empty());
}

#[test]
fn reset_cancels_the_running_chain() {
    let mut trick = new_trick(11);
    let mut events = EventBus::default();
    trick.start_run(ms(0), &mut events);
    trick.advance(ms(700), &mut events);
    assert!(trick.index() > 0);
    trick.reset(ms(700), &mut events);
    assert_eq!(trick.phase(), Phase::Idle);
    assert_eq!(trick.next_due(), None);
    events.drain().for_each(drop);

    trick.start_run(ms(700), &mut events);
    trick.advance(ms(20_000), &mut events);
    let shown = shown_cards(&mut events);
    let indices: Vec<usize> = shown.iter().map(|(index, _)| *index).collect();
    assert_eq!(indices, (0..25).collect::<Vec<_>>());
}

#[test]
fn swipes_during_a_run_are_ignored() {
    let mut trick = new_trick(12);
    let mut events = EventBus::default();
    trick.start_run(ms(0), &mut events);
    swipes(&mut trick, "UUR", ms(200), &mut events);
    assert!(trick.buffered_swipes().is_empty());
    assert_eq!(trick.pending_force(), None);
}
