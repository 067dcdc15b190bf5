//! Twitter v1.1-style API integration surface.
//!
//! Submodules provide the timeline reader over the shared HTTP transport,
//! the wire and normalized record types, and the pure text enrichment
//! helpers applied to retained posts.

pub mod client;
pub mod enrich;
pub mod types;

pub use client::{RequestOptions, TimelineError, TimelineReader};
pub use types::{Post, Profile, RawPost};
