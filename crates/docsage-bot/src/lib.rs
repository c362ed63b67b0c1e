//! Telegram-facing bot logic.
//!
//! Ties the platform client, the session store and the retrieval pipeline
//! together: inbound messages are classified into events, uploads become
//! per-user sessions, and questions stream their answers back by editing a
//! placeholder message.

mod bot;
mod dispatch;
mod error;
pub mod messages;
mod relay;
mod transport;

pub use bot::{Bot, Session};
pub use dispatch::{Event, classify};
pub use error::{BotError, Result};
pub use relay::{DEFAULT_EDIT_INTERVAL, StreamingRelay};
pub use transport::{MockTransport, SharedTransport, Transport, TransportCall};
