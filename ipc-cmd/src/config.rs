//! Build-time configuration.

use crate::transport::ChannelId;

/// Outstanding commands the ingress queue can hold.
pub const QUEUE_DEPTH: usize = 4;

/// Mailbox channel binding.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Channel commands arrive on.
    pub rx_channel: ChannelId,
    /// Channel replies are sent on.
    pub tx_channel: ChannelId,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rx_channel: ChannelId(0),
            tx_channel: ChannelId(1),
        }
    }
}

impl Config {
    pub fn rx_channel(mut self, channel: u32) -> Self {
        self.rx_channel = ChannelId(channel);
        self
    }

    pub fn tx_channel(mut self, channel: u32) -> Self {
        self.tx_channel = ChannelId(channel);
        self
    }
}
