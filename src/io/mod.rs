//! Document I/O: reading stored pages, accumulating scratch pages, and
//! atomic publishing.

pub mod publisher;
pub mod sink;
pub mod source;

pub use publisher::{PublishStats, Publisher};
pub use sink::PageSink;
pub use source::{LoadedPages, read_pages};
