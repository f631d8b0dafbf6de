//! Command implementations

mod cache;
mod core;
mod import;

pub use cache::{cmd_cache, cmd_override};
pub use core::{cmd_init, open_db};
pub use import::cmd_import;
