//! Data models for the bot backend.
//!
//! The persisted types serialize to the exact shape of the JSON record file,
//! including the fields older bot versions expect.

mod activity;
mod ai;
mod document;
mod notification;
mod reminder;
pub mod timestamp;

pub use activity::*;
pub use ai::*;
pub use document::*;
pub use notification::*;
pub use reminder::*;
