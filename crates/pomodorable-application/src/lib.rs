//! Application layer for Pomodorable.
//!
//! This crate provides the use cases that coordinate between the domain
//! core and the infrastructure adapters: session lifecycle and timer
//! driving, per-field widget synchronization, and history views.

pub mod context;
pub mod session;
pub mod sync;

pub use context::AppContext;
pub use session::{
    DaySummary, PlantStage, SessionHistory, SessionLifecycleManager, TimerCommand, TimerDriver,
    TimerSnapshot,
};
pub use sync::{Debouncer, GoalsSync, MoodSync, TodoListSync};
