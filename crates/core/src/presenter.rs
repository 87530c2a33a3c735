use crate::{asset_path, Card, BACK_ASSET};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "card", rename_all = "snake_case")]
pub enum Face {
    Back,
    Card(Card),
}

impl Face {
    pub fn asset(&self) -> String {
        match self {
            Face::Back => BACK_ASSET.to_string(),
            Face::Card(card) => asset_path(*card),
        }
    }
}

/// Everything the trick needs from a display.
pub trait Presenter {
    fn preload(&mut self, _assets: &[String]) {}
    /// Put `face` up and make it visible.
    fn display(&mut self, face: Face);
    fn hide_card(&mut self);
    fn show_retry(&mut self);
    fn hide_retry(&mut self);
    fn show_indicator(&mut self, text: &str);
    fn hide_indicator(&mut self);
}

/// Plain observable display state. Shells render from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stage {
    pub face: Face,
    pub card_visible: bool,
    pub retry_visible: bool,
    pub indicator_text: String,
    pub indicator_visible: bool,
    #[serde(skip)]
    pub preloaded: Vec<String>,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            face: Face::Back,
            card_visible: true,
            retry_visible: false,
            indicator_text: String::new(),
            indicator_visible: false,
            preloaded: Vec::new(),
        }
    }
}

impl Presenter for Stage {
    fn preload(&mut self, assets: &[String]) {
        self.preloaded = assets.to_vec();
    }

    fn display(&mut self, face: Face) {
        self.face = face;
        self.card_visible = true;
    }

    fn hide_card(&mut self) {
        self.card_visible = false;
    }

    fn show_retry(&mut self) {
        self.retry_visible = true;
    }

    fn hide_retry(&mut self) {
        self.retry_visible = false;
    }

    fn show_indicator(&mut self, text: &str) {
        self.indicator_text = text.to_string();
        self.indicator_visible = true;
    }

    // The text stays put; only visibility changes, like an opacity fade.
    fn hide_indicator(&mut self) {
        self.indicator_visible = false;
    }
}
