//! # climbhub-client
//!
//! The interaction layer of the ClimbHub sync core: [`InteractionController`]
//! orchestrates optimistic like/comment/save intents against the backend,
//! [`ProfileSyncAdapter`] reconciles the saved-videos projection, and
//! [`ClimbClient`] wires both to a [`VideoStore`](climbhub_store::VideoStore)
//! for the rendering layer to consume.

pub mod client;
pub mod controller;
pub mod profile_sync;

mod error;

use tracing_subscriber::{fmt, EnvFilter};

pub use client::ClimbClient;
pub use controller::InteractionController;
pub use error::{InteractionError, ValidationError};
pub use profile_sync::ProfileSyncAdapter;

/// Install the default tracing subscriber for an embedding application.
///
/// Honors `RUST_LOG`; idempotent, so embedding apps and tests can both call
/// it.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("climbhub_client=debug,climbhub_store=info,climbhub_api=info,warn")
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
