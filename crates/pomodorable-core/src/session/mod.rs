//! Session domain: model, partial updates, and the store contract.

mod model;
mod patch;
mod store;

pub use model::{GoalsNote, Mood, MoodEntry, Session, SessionDraft, SessionStatus, Task};
pub use patch::{FieldPath, FieldWrite, SessionPatch};
pub use store::{SessionListWatch, SessionQuery, SessionStore, SessionWatch};
