use crate::{
    preload_assets, prepare_deck, random_card, ConfigError, Direction, Event, EventBus, Face,
    ForceDirective, ForcePlan, IgnoreReason, InputKind, Presenter, RngState, Sequence, Stage,
    SwipeDecoder, SwipeOutcome, Timeline, Timer, TimerId, TimerKind, TrickConfig,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Running,
    AwaitingRetry,
}

impl Phase {
    fn ignore_reason(self) -> IgnoreReason {
        match self {
            Phase::Idle => IgnoreReason::Idle,
            Phase::Running => IgnoreReason::Running,
            Phase::AwaitingRetry => IgnoreReason::AwaitingRetry,
        }
    }
}

/// The trick controller: owns every piece of mutable state and drives the
/// presenter from a single virtual timeline.
///
/// Every input takes the caller's current time (an offset from any fixed
/// epoch) and first fires the timers that came due before it.
#[derive(Debug)]
pub struct Trick<P: Presenter = Stage> {
    config: TrickConfig,
    rng: RngState,
    force_plan: ForcePlan,
    swipes: SwipeDecoder,
    timeline: Timeline,
    presenter: P,
    phase: Phase,
    sequence: Option<Sequence>,
    index: usize,
    step_timer: Option<TimerId>,
    indicator_timer: Option<TimerId>,
    suppress_until: Option<Duration>,
    touch_origin: Option<(f64, f64)>,
    runs: u64,
}

impl Trick<Stage> {
    pub fn staged(config: TrickConfig, rng: RngState) -> Result<Self, ConfigError> {
        Self::new(config, rng, Stage::default())
    }
}

impl<P: Presenter> Trick<P> {
    pub fn new(config: TrickConfig, rng: RngState, mut presenter: P) -> Result<Self, ConfigError> {
        config.validate()?;
        presenter.preload(&preload_assets());
        presenter.display(Face::Back);
        Ok(Self {
            config,
            rng,
            force_plan: ForcePlan::default(),
            swipes: SwipeDecoder::default(),
            timeline: Timeline::default(),
            presenter,
            phase: Phase::Idle,
            sequence: None,
            index: 0,
            step_timer: None,
            indicator_timer: None,
            suppress_until: None,
            touch_origin: None,
            runs: 0,
        })
    }

    pub fn config(&self) -> &TrickConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    /// Cards shown so far in the current run.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pending_force(&self) -> Option<ForceDirective> {
        self.force_plan.pending()
    }

    pub fn buffered_swipes(&self) -> &[Direction] {
        self.swipes.buffered()
    }

    /// Runs begun so far, including one still on screen.
    pub fn runs_started(&self) -> u64 {
        self.runs
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    /// When the next timer fires, for shells that sleep between frames.
    pub fn next_due(&self) -> Option<Duration> {
        self.timeline.next_due()
    }

    pub fn is_suppressed(&self, now: Duration) -> bool {
        self.suppress_until.is_some_and(|until| now < until)
    }

    /// Fire every timer due at or before `now`.
    pub fn advance(&mut self, now: Duration, events: &mut EventBus) {
        while let Some(timer) = self.timeline.pop_due(now) {
            self.fire(timer, events);
        }
        self.timeline.settle_at(now);
    }

    /// Tap or click on the main display.
    pub fn tap(&mut self, now: Duration, events: &mut EventBus) {
        self.advance(now, events);
        if self.is_suppressed(now) {
            events.push(Event::InputIgnored {
                input: InputKind::Tap,
                reason: IgnoreReason::Suppressed,
            });
            return;
        }
        if self.phase != Phase::Idle {
            events.push(Event::InputIgnored {
                input: InputKind::Tap,
                reason: self.phase.ignore_reason(),
            });
            return;
        }
        self.start_run(now, events);
    }

    /// Begin a run. Does nothing unless idle.
    pub fn start_run(&mut self, now: Duration, events: &mut EventBus) -> bool {
        self.advance(now, events);
        if self.phase != Phase::Idle {
            return false;
        }
        self.cancel_step_timer();

        let (force, forced) = match self.force_plan.take() {
            Some(card) => (card, true),
            None => (random_card(&mut self.rng), false),
        };
        self.runs += 1;
        self.presenter.display(Face::Back);

        let sequence = prepare_deck(force, &self.config.layout, &mut self.rng);
        debug!(run = self.runs, forced, length = sequence.len(), "run started");
        events.push(Event::RunStarted {
            run: self.runs,
            force,
            forced,
            length: sequence.len(),
            force_index: sequence.force_index(),
        });
        self.sequence = Some(sequence);
        self.index = 0;
        self.phase = Phase::Running;
        self.step_timer = Some(
            self.timeline
                .schedule(self.config.timing.initial_delay(), TimerKind::Step),
        );
        true
    }

    /// Activate the retry affordance.
    pub fn retry(&mut self, now: Duration, events: &mut EventBus) -> bool {
        self.advance(now, events);
        if self.phase != Phase::AwaitingRetry {
            events.push(Event::InputIgnored {
                input: InputKind::Retry,
                reason: self.phase.ignore_reason(),
            });
            return false;
        }
        self.suppress_until = Some(now + self.config.timing.input_suppression());
        self.cancel_step_timer();
        self.presenter.hide_retry();
        self.presenter.display(Face::Back);
        self.sequence = None;
        self.index = 0;
        self.phase = Phase::Idle;
        events.push(Event::RetryTaken);
        true
    }

    pub fn touch_start(&mut self, x: f64, y: f64, now: Duration, events: &mut EventBus) {
        self.advance(now, events);
        if self.phase != Phase::Idle {
            events.push(Event::InputIgnored {
                input: InputKind::Touch,
                reason: self.phase.ignore_reason(),
            });
            return;
        }
        self.touch_origin = Some((x, y));
    }

    /// A long enough drag is a swipe, anything shorter is a tap.
    pub fn touch_end(&mut self, x: f64, y: f64, now: Duration, events: &mut EventBus) {
        self.advance(now, events);
        if self.phase != Phase::Idle {
            events.push(Event::InputIgnored {
                input: InputKind::Touch,
                reason: self.phase.ignore_reason(),
            });
            return;
        }
        let (sx, sy) = self.touch_origin.take().unwrap_or((x, y));
        match Direction::from_drag(x - sx, y - sy, self.config.gesture.swipe_min_distance) {
            Some(direction) => self.swipe(direction, now, events),
            None => self.tap(now, events),
        }
    }

    pub fn swipe(&mut self, direction: Direction, now: Duration, events: &mut EventBus) {
        self.advance(now, events);
        if self.phase != Phase::Idle {
            events.push(Event::InputIgnored {
                input: InputKind::Swipe,
                reason: self.phase.ignore_reason(),
            });
            return;
        }
        match self.swipes.push(direction) {
            SwipeOutcome::Buffered(len) => events.push(Event::SwipeBuffered { len }),
            SwipeOutcome::Decoded(card) => {
                let runs = self.config.gesture.force_runs;
                self.force_plan.arm(card, runs);
                debug!(runs, "force armed");
                events.push(Event::ForceArmed { card, runs });
                self.flash_indicator(&card.label());
            }
            SwipeOutcome::NoMatch(directions) => {
                events.push(Event::SwipeRejected { directions });
            }
        }
        self.suppress_until = Some(now + self.config.timing.input_suppression());
    }

    /// Hard stop back to idle from any phase. A pending force survives.
    pub fn reset(&mut self, now: Duration, events: &mut EventBus) {
        self.advance(now, events);
        self.cancel_step_timer();
        self.swipes.clear();
        self.touch_origin = None;
        self.presenter.hide_retry();
        self.presenter.display(Face::Back);
        self.sequence = None;
        self.index = 0;
        self.phase = Phase::Idle;
        events.push(Event::Reset);
    }

    fn flash_indicator(&mut self, text: &str) {
        self.presenter.show_indicator(text);
        if let Some(id) = self.indicator_timer.take() {
            self.timeline.cancel(id);
        }
        self.indicator_timer = Some(
            self.timeline
                .schedule(self.config.timing.indicator_hold(), TimerKind::IndicatorFade),
        );
    }

    fn cancel_step_timer(&mut self) {
        if let Some(id) = self.step_timer.take() {
            self.timeline.cancel(id);
        }
    }

    fn fire(&mut self, timer: Timer, events: &mut EventBus) {
        trace!(kind = ?timer.kind, due_ms = timer.due.as_millis() as u64, "timer fired");
        if timer.kind == TimerKind::IndicatorFade {
            if self.indicator_timer == Some(timer.id) {
                self.indicator_timer = None;
                self.presenter.hide_indicator();
            }
            return;
        }
        if self.step_timer != Some(timer.id) {
            return;
        }
        self.step_timer = None;
        match timer.kind {
            TimerKind::Step => self.reveal_step(events),
            TimerKind::Flip => self.flip(events),
            TimerKind::ShowRetry => self.offer_retry(events),
            TimerKind::IndicatorFade => {}
        }
    }

    fn reveal_step(&mut self, events: &mut EventBus) {
        if self.phase != Phase::Running {
            return;
        }
        let len = self.sequence.as_ref().map_or(0, Sequence::len);
        if self.index >= len {
            debug!(run = self.runs, "sequence exhausted");
            events.push(Event::SequenceExhausted { run: self.runs });
            self.step_timer = Some(
                self.timeline
                    .schedule(self.config.timing.exit_delay(), TimerKind::ShowRetry),
            );
            return;
        }
        self.presenter.hide_card();
        self.step_timer = Some(
            self.timeline
                .schedule(self.config.timing.flip_delay(), TimerKind::Flip),
        );
    }

    fn flip(&mut self, events: &mut EventBus) {
        let Some(sequence) = self.sequence.as_ref() else {
            return;
        };
        let Some(card) = sequence.get(self.index) else {
            return;
        };
        let len = sequence.len();
        let force_index = sequence.force_index();
        self.presenter.display(Face::Card(card));
        events.push(Event::CardShown {
            index: self.index,
            card,
        });
        self.index += 1;
        let delay = self
            .config
            .timing
            .policy
            .next_delay(self.index, len, force_index);
        self.step_timer = Some(self.timeline.schedule(delay, TimerKind::Step));
    }

    fn offer_retry(&mut self, events: &mut EventBus) {
        self.presenter.hide_card();
        self.presenter.show_retry();
        self.phase = Phase::AwaitingRetry;
        events.push(Event::RetryOffered);
    }
}
