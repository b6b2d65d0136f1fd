pub mod config;
pub mod diff;
pub mod error;
pub mod events;
pub mod io;
pub mod notify;
pub mod paths;
pub mod prompts;
pub mod templates;

pub use error::{PrAgentError, Result};
