//! Mailbox transport contract.
//!
//! The mailbox/doorbell driver itself lives outside this crate. It delivers
//! fixed-size buffers to a registered [`ReceiveHandler`] from interrupt
//! context and sends records to the peer from the dispatcher task.

use crate::record::RECORD_SIZE;

/// Mailbox channel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(pub u32);

impl core::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiver of mailbox data.
///
/// Called from the mailbox interrupt. Implementations must not block,
/// log, or perform I/O.
pub trait ReceiveHandler: Sync {
    /// A buffer arrived on `channel`.
    fn on_receive(&self, channel: ChannelId, data: &[u8]);
}

/// Mailbox driver as consumed by the command channel.
#[allow(async_fn_in_trait)]
pub trait Mailbox {
    /// Driver error.
    type Error: core::fmt::Debug;

    /// Register `handler` to be called for every buffer received on `channel`.
    fn register_receive_handler(
        &mut self,
        channel: ChannelId,
        handler: &'static dyn ReceiveHandler,
    ) -> Result<(), Self::Error>;

    /// Enable or disable reception on `channel`.
    fn set_channel_enabled(&mut self, channel: ChannelId, enabled: bool) -> Result<(), Self::Error>;

    /// Send one record to the peer on `channel` and raise its doorbell.
    async fn send(&mut self, channel: ChannelId, data: &[u8; RECORD_SIZE]) -> Result<(), Self::Error>;
}
