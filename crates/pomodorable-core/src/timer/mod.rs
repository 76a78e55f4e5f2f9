//! Timer engine.

mod engine;

pub use engine::{Phase, TickOutcome, TimerEngine, TimerState};
