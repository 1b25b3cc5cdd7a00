//! Instrument documents: immutable graph templates, loaded as collections.
//!
//! This layer sits below voice management. A `WiringCollection` is loaded
//! once at startup, validated eagerly, and then treated as read-only; note
//! events compile `GeneratorInstance`s from its documents.

pub mod collection;
pub mod descriptor;
pub mod document;
pub mod error;

pub use collection::WiringCollection;
pub use descriptor::NodeDescriptor;
pub use document::WiringDocument;
pub use error::{WiringError, WiringResult};
