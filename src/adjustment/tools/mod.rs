pub mod config;
pub mod error;
pub mod highlight;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod purge;
pub mod split;
pub mod summary;
pub mod sync;

pub use error::{Result, ToolError};
