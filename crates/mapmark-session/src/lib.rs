//! Editor session, gesture handling and undo history for mapmark.
//!
//! An [`EditorSession`] is created by whichever view opens the marker editor
//! and owned by it for the lifetime of the edit. Hosts forward pointer and
//! form events to the session; the session decides when a change becomes an
//! undo step.

pub mod config;
pub mod error;
pub mod gesture;
pub mod history;
pub mod session;
pub mod store;

pub use config::EditorConfig;
pub use error::{ConfigError, StoreError};
pub use gesture::{DragState, Gesture};
pub use history::History;
pub use session::{Axis, EditorSession, SaveSummary, SessionId};
pub use store::{JsonFileStore, MemoryStore, PositionStore};
