//! Session use cases: lifecycle, wall-clock timer, and history views.

pub mod history;
pub mod manager;
pub mod timer_driver;

pub use history::{DaySummary, PlantStage, SessionHistory};
pub use manager::SessionLifecycleManager;
pub use timer_driver::{TimerCommand, TimerDriver, TimerSnapshot};
