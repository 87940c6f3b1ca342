//! Configuration crate for the apsched multi-user scheduling engine.

pub mod accesspoint;
pub use accesspoint::*;
