//! CLI subcommand implementations.

pub mod events;
pub mod range;
pub mod source;
pub mod status;
pub mod summary;
pub mod timeline;
pub mod util;
