//! Data models

mod migration;
mod notification;
mod report;
mod shard;

pub use migration::*;
pub use notification::*;
pub use report::*;
pub use shard::*;
