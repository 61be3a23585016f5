//! CLI command handling

pub mod config;
pub mod limits;
pub mod output;
pub mod push;

pub use config::*;
pub use limits::*;
pub use output::*;
pub use push::*;
