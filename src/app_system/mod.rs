//! System orchestration, startup, and shutdown logic.

pub mod note_system;
pub mod tracing;

pub use self::note_system::*;
pub use self::tracing::*;
