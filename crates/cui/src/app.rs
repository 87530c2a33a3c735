use crate::input::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use anyhow::{Context, Result};
use forcedeck_core::{
    Direction, Event, EventBus, IgnoreReason, Phase, Preset, RngState, Stage, Trick, TrickConfig,
};
use ratatui::layout::{Position, Rect};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

const MAX_EVENT_LOG: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiLocale {
    EnUs,
    PtBr,
}

impl UiLocale {
    pub fn from_opt(value: Option<&str>) -> Self {
        let normalized = value
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .replace('-', "_");
        if normalized == "pt" || normalized.starts_with("pt_") {
            Self::PtBr
        } else {
            Self::EnUs
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
        }
    }

    pub fn text<'a>(self, en: &'a str, pt: &'a str) -> &'a str {
        if matches!(self, Self::PtBr) {
            pt
        } else {
            en
        }
    }
}

pub struct App {
    pub locale: UiLocale,
    pub preset: Preset,
    pub trick: Trick,
    pub events: EventBus,
    pub event_log: VecDeque<String>,
    pub show_help: bool,
    pub show_log: bool,
    pub should_quit: bool,
    /// Cells covered by the retry button in the last drawn frame.
    pub retry_button: Option<Rect>,
    pointer_origin: Option<(f64, f64)>,
    clock: Instant,
}

impl App {
    pub fn bootstrap(locale: UiLocale, preset: Preset, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        };
        let trick = Trick::staged(TrickConfig::preset(preset), rng)
            .with_context(|| format!("build trick with preset {}", preset.name()))?;
        debug!(preset = preset.name(), seed = trick.seed(), "trick ready");
        Ok(Self {
            locale,
            preset,
            trick,
            events: EventBus::default(),
            event_log: VecDeque::new(),
            show_help: false,
            show_log: false,
            should_quit: false,
            retry_button: None,
            pointer_origin: None,
            clock: Instant::now(),
        })
    }

    pub fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn stage(&self) -> &Stage {
        self.trick.presenter()
    }

    pub fn on_tick(&mut self, now: Duration) {
        self.trick.advance(now, &mut self.events);
        self.flush_events();
    }

    pub fn tap(&mut self, now: Duration) {
        self.trick.tap(now, &mut self.events);
        self.flush_events();
    }

    /// Enter on the retry screen presses the button; anywhere else it taps.
    pub fn activate(&mut self, now: Duration) {
        self.trick.advance(now, &mut self.events);
        if self.trick.phase() == Phase::AwaitingRetry {
            self.retry(now);
        } else {
            self.tap(now);
        }
    }

    pub fn retry(&mut self, now: Duration) {
        self.trick.retry(now, &mut self.events);
        self.flush_events();
    }

    pub fn swipe(&mut self, direction: Direction, now: Duration) {
        self.trick.swipe(direction, now, &mut self.events);
        self.flush_events();
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, now: Duration) {
        self.pointer_origin = Some((x, y));
        self.trick.touch_start(x, y, now, &mut self.events);
        self.flush_events();
    }

    /// A release over the retry button presses it. Anywhere else the
    /// trick sees an ordinary touch.
    pub fn pointer_up(&mut self, x: f64, y: f64, now: Duration) {
        self.trick.advance(now, &mut self.events);
        let origin = self.pointer_origin.take();
        if self.trick.phase() == Phase::AwaitingRetry
            && origin.is_some()
            && self.on_retry_button(x, y)
        {
            self.retry(now);
            return;
        }
        self.trick.touch_end(x, y, now, &mut self.events);
        self.flush_events();
    }

    fn on_retry_button(&self, x: f64, y: f64) -> bool {
        let Some(button) = self.retry_button else {
            return false;
        };
        let cell = Position {
            x: (x / CELL_WIDTH_PX) as u16,
            y: (y / CELL_HEIGHT_PX) as u16,
        };
        button.contains(cell)
    }

    pub fn reset(&mut self, now: Duration) {
        self.trick.reset(now, &mut self.events);
        self.flush_events();
    }

    pub fn phase_label(&self) -> &'static str {
        match self.trick.phase() {
            Phase::Idle => self.locale.text("ready", "pronto"),
            Phase::Running => self.locale.text("running", "rodando"),
            Phase::AwaitingRetry => self.locale.text("done", "fim"),
        }
    }

    pub fn retry_label(&self) -> &'static str {
        self.locale.text("Try again", "Tentar de novo")
    }

    fn flush_events(&mut self) {
        let drained: Vec<Event> = self.events.drain().collect();
        for event in drained {
            debug!(?event, "trick event");
            if let Some(line) = describe_event(&event) {
                self.push_event_line(line);
            }
        }
    }

    fn push_event_line(&mut self, line: String) {
        self.event_log.push_back(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
    }
}

/// Log line for the rehearsal panel. Card reveals are too chatty to list.
pub fn describe_event(event: &Event) -> Option<String> {
    let line = match event {
        Event::RunStarted {
            run,
            force,
            forced,
            force_index,
            ..
        } => format!(
            "run {run}: {} at #{} ({})",
            force.label(),
            force_index + 1,
            if *forced { "gesture" } else { "random" }
        ),
        Event::CardShown { .. } => return None,
        Event::SequenceExhausted { run } => format!("run {run} finished"),
        Event::RetryOffered => "retry offered".to_string(),
        Event::RetryTaken => "retry".to_string(),
        Event::SwipeBuffered { len } => format!("swipe {len}/3"),
        Event::ForceArmed { card, runs } => format!("armed {} for {runs} runs", card.label()),
        Event::SwipeRejected { directions } => {
            let code: String = directions.iter().map(|dir| dir.code()).collect();
            format!("no card for {code}")
        }
        Event::InputIgnored { input, reason } => match reason {
            IgnoreReason::Suppressed => format!("{input:?} suppressed"),
            other => format!("{input:?} ignored while {other:?}"),
        },
        Event::Reset => "reset".to_string(),
    };
    Some(line)
}
