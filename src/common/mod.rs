pub mod address;
pub use address::*;

pub mod debug;

pub mod ids;
pub use ids::*;

pub mod messages;
pub use messages::*;

pub mod time;
pub use time::*;
