//! Core types for the mapmark marker editor.
//!
//! The [`Registry`] is the authoritative list of marker positions for the map
//! being edited. It is seeded from the external property list and mutated
//! only by the editor session, which decides when history is recorded.

pub mod error;
pub mod marker;
pub mod presets;
pub mod registry;
pub mod settings;

pub use error::RegistryError;
pub use marker::{MarkerId, MarkerPosition, PositionUpdate, PropertyRecord, UNKNOWN_PROPERTY_NAME};
pub use presets::{Preset, PresetLocation};
pub use registry::{Registry, Snapshot};
pub use settings::{MapSettings, MapSettingsUpdate, MapTheme};
