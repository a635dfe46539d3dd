#![cfg_attr(not(test), no_std)]
#![doc = "Mailbox command channel for the real-time core."]
#![doc = ""]
#![doc = "Receives fixed-size command records from the application core through"]
#![doc = "a mailbox interrupt, queues them, and answers them from a single"]
#![doc = "dispatcher task."]
//!
//! # Example
//!
//! ```ignore
//! use ipc_cmd::{config, Config, IngressQueue, PinIndicator};
//!
//! static INGRESS: IngressQueue<{ config::QUEUE_DEPTH }> = IngressQueue::new();
//!
//! #[embassy_executor::task]
//! async fn command_task(mailbox: BoardMailbox, led: Output<'static>) {
//!     // Only returns if startup failed; the error has been logged.
//!     let _ = ipc_cmd::serve(&INGRESS, mailbox, PinIndicator::new(led), Config::default()).await;
//! }
//! ```

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod indicator;
pub mod protocol;
pub mod queue;
pub mod record;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use dispatch::{serve, DispatchStats, Dispatcher};
pub use error::{RecordError, SetupError};
pub use indicator::{Indicator, PinIndicator};
pub use protocol::{IndicatorState, Opcode};
pub use queue::{Admission, IngressQueue};
pub use record::{OwnerTags, Record, Reserved, ReservedKind, RECORD_SIZE};
pub use transport::{ChannelId, Mailbox, ReceiveHandler};
