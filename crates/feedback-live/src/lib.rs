//! Live Feedback Updates
//!
//! A listening socket.io client for the feedback backend's notification
//! gateway. Status changes pushed by the server arrive as [`LiveEvent`]s
//! over a tokio channel, ready to be merged into a paged list.

pub mod error;
pub mod event;
pub mod packet;
pub mod subscription;

pub use error::{LiveError, Result};
pub use event::LiveEvent;
pub use packet::Packet;
pub use subscription::{LiveConfig, LiveSubscription};
