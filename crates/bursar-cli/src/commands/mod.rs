//! CLI command implementations

mod analyze;
mod serve;

pub use analyze::cmd_analyze;
pub use serve::cmd_serve;
