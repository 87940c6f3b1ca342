pub mod access_req;
pub use access_req::*;

pub mod allocation;
pub use allocation::*;

pub mod engine;
pub use engine::*;

pub mod error;
pub use error::*;

pub mod rotation;
pub use rotation::*;

pub mod strategy;
pub use strategy::*;

pub mod txrecord;
pub use txrecord::*;
