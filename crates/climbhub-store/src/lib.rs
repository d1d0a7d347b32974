//! # climbhub-store
//!
//! The authoritative in-memory copy of a video list for one view session.
//!
//! [`VideoStore`] owns the video and comment entities plus the derived
//! per-video saved projection, and is the only place they are mutated.
//! Views hold a cloned store handle, read snapshots, and subscribe to
//! [`StoreEvent`]s so every mounted view of the same entity stays
//! consistent.

pub mod events;
pub mod store;

mod error;

pub use error::StoreError;
pub use events::{EventBus, StoreEvent, Subscription};
pub use store::VideoStore;
