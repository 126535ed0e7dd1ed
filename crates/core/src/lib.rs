//! Shared domain types for the story generation platform.
//!
//! Contains the error taxonomy used across crates, the image composition
//! routine (the only pixel-level work in the system), and the local media
//! file store for generated images and uploaded audio.

pub mod compose;
pub mod error;
pub mod storage;
pub mod types;

pub use error::CoreError;
pub use storage::MediaStore;
