//! In-memory session state keyed by opaque tokens.

pub mod store;
pub mod token;
