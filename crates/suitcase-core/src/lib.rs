//! Shared vocabulary of the airsoft suitcase controller: keypad symbols and
//! logical keys, teams and game kinds, access codes, and typed configuration.

pub mod code;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use code::{AccessCode, CodeGenerator};
pub use config::GameConfig;
pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
