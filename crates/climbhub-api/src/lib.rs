//! # climbhub-api
//!
//! The remote collaborator of the sync core: the [`VideoApi`] trait models
//! the backend's logical operations, [`HttpApi`] implements it over the
//! REST endpoints, and [`InMemoryApi`] is a scriptable double for tests and
//! offline development. Request and response bodies are owned by the
//! backend; this crate only pins the contracts the core depends on.

pub mod client;
pub mod config;
pub mod http;
pub mod memory;

mod error;

pub use client::{LikeStatus, SaveStatus, VideoApi};
pub use config::ApiConfig;
pub use error::ApiError;
pub use http::HttpApi;
pub use memory::InMemoryApi;
