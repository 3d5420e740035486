//! Object identity for texam.
//!
//! Provides the `ObjectId` type, SHA-1 hashing of typed object payloads,
//! hex encoding/decoding, and the `OidSet` used by the reachability walk.

mod error;
pub mod hex;
mod oid;
mod oid_set;
pub mod hasher;

pub use error::HashError;
pub use oid::ObjectId;
pub use oid_set::OidSet;
