//! Cache inspection tools.
//!
//! Read-only views of the generation store.

pub mod generations;
pub mod get;

pub use generations::{CacheGenerationsParams, generations_impl};
pub use get::{CacheGetParams, get_impl};
