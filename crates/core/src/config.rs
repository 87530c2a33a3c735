use crate::{DelayPolicy, Settle, TimingConfig, DECK_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckLayout {
    /// Total cards shown in one run, forced card included.
    pub cards_to_show: usize,
    /// How many cards before the end the forced card lands.
    pub force_offset_from_end: usize,
}

impl Default for DeckLayout {
    fn default() -> Self {
        Self {
            cards_to_show: 25,
            force_offset_from_end: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GestureConfig {
    /// Minimum drag distance, in pixels, on either axis.
    pub swipe_min_distance: f64,
    /// Runs a decoded force stays armed for.
    pub force_runs: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_min_distance: 42.0,
            force_runs: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Classic,
    Settle,
    Dramatic,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Classic, Preset::Settle, Preset::Dramatic];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Settle => "settle",
            Preset::Dramatic => "dramatic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Preset::ALL.into_iter().find(|preset| preset.name() == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TrickConfig {
    pub layout: DeckLayout,
    pub timing: TimingConfig,
    pub gesture: GestureConfig,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cards_to_show must be between 3 and 52, got {0}")]
    CardsToShow(usize),
    #[error("swipe distance must be a positive number, got {0}")]
    SwipeDistance(f64),
    #[error("force_runs must be at least 1")]
    ForceRuns,
    #[error("settle fraction must be in (0, 1], got {0}")]
    SettleFraction(f64),
}

impl TrickConfig {
    pub fn preset(preset: Preset) -> Self {
        let mut config = Self::default();
        match preset {
            Preset::Classic => {}
            Preset::Settle => {
                config.timing.policy = DelayPolicy {
                    speed_start_ms: 60,
                    speed_end_ms: 90,
                    settle: Settle::AfterForce,
                    force_hold_ms: None,
                };
            }
            Preset::Dramatic => {
                config.timing.policy = DelayPolicy {
                    speed_start_ms: 55,
                    speed_end_ms: 80,
                    settle: Settle::Fraction(0.65),
                    force_hold_ms: Some(320),
                };
            }
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let shown = self.layout.cards_to_show;
        if !(3..=DECK_SIZE).contains(&shown) {
            return Err(ConfigError::CardsToShow(shown));
        }
        let distance = self.gesture.swipe_min_distance;
        if !(distance.is_finite() && distance > 0.0) {
            return Err(ConfigError::SwipeDistance(distance));
        }
        if self.gesture.force_runs == 0 {
            return Err(ConfigError::ForceRuns);
        }
        if let Settle::Fraction(fraction) = self.timing.policy.settle {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(ConfigError::SettleFraction(fraction));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for preset in Preset::ALL {
            TrickConfig::preset(preset).validate().expect("preset is valid");
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(Preset::from_name(" Dramatic "), Some(Preset::Dramatic));
        assert_eq!(Preset::from_name("slow"), None);
    }

    #[test]
    fn default_is_classic() {
        assert_eq!(TrickConfig::default(), TrickConfig::preset(Preset::Classic));
        let config = TrickConfig::default();
        assert_eq!(config.layout.cards_to_show, 25);
        assert_eq!(config.layout.force_offset_from_end, 7);
        assert_eq!(config.gesture.force_runs, 2);
    }

    #[test]
    fn rejects_out_of_range_layout() {
        let mut config = TrickConfig::default();
        config.layout.cards_to_show = 2;
        assert_eq!(config.validate(), Err(ConfigError::CardsToShow(2)));
        config.layout.cards_to_show = 53;
        assert_eq!(config.validate(), Err(ConfigError::CardsToShow(53)));
        config.layout.cards_to_show = 52;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_gesture_and_timing() {
        let mut config = TrickConfig::default();
        config.gesture.swipe_min_distance = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SwipeDistance(_))
        ));
        config.gesture.swipe_min_distance = 42.0;
        config.gesture.force_runs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ForceRuns));
        config.gesture.force_runs = 1;
        config.timing.policy.settle = Settle::Fraction(1.5);
        assert_eq!(config.validate(), Err(ConfigError::SettleFraction(1.5)));
    }

    #[test]
    fn config_serializes() {
        let json = serde_json::to_string(&TrickConfig::preset(Preset::Dramatic)).expect("json");
        assert!(json.contains("\"force_hold_ms\":320"));
        let back: TrickConfig = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, TrickConfig::preset(Preset::Dramatic));
    }
}
