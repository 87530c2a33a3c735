//! Core trick logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod force;
pub mod gesture;
pub mod presenter;
pub mod rng;
pub mod scheduler;
pub mod sequencer;
pub mod timing;
pub mod trick;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use force::*;
pub use gesture::*;
pub use presenter::*;
pub use rng::*;
pub use scheduler::*;
pub use sequencer::*;
pub use timing::*;
pub use trick::*;
