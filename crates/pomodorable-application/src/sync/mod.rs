//! Widget field synchronizers.
//!
//! Each synchronizer owns exactly one field of the session document and
//! performs independent whole-field reads and writes against it; the only
//! coordination between them is that they never touch each other's field
//! path.

mod debounce;
mod goals;
mod mood;
mod todos;
mod write_queue;

pub use debounce::Debouncer;
pub use goals::GoalsSync;
pub use mood::MoodSync;
pub use todos::TodoListSync;
pub use write_queue::FieldWriter;
