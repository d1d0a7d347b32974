//! # climbhub-shared
//!
//! Domain types shared by every ClimbHub crate: entity ids, grading and
//! skill enums, and the video/comment/profile models exchanged with the
//! backend.

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
