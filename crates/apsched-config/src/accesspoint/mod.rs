pub mod parsing;
pub use parsing::*;

pub mod config;
pub use config::*;

pub mod sec_mu;
pub use sec_mu::*;

pub mod sec_links;
pub use sec_links::*;

pub mod state;
pub use state::*;
