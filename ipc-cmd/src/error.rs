//! Record decoding and startup error types.

use crate::transport::ChannelId;

/// Error decoding a receive buffer into a [`Record`](crate::record::Record).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Buffer length differs from the fixed record size.
    WrongSize {
        expected: usize,
        actual: usize,
    },
}

impl core::fmt::Display for RecordError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WrongSize { expected, actual } => {
                write!(f, "record must be {} bytes, got {}", expected, actual)
            }
        }
    }
}

impl core::error::Error for RecordError {}

/// Error during the startup sequence. The processing loop is never entered.
///
/// `T` is the mailbox driver error, `P` the indicator error.
#[derive(Debug)]
pub enum SetupError<T, P> {
    /// Registering the receive handler failed.
    RegisterHandler { channel: ChannelId, error: T },
    /// Enabling the RX channel failed.
    EnableChannel { channel: ChannelId, error: T },
    /// Configuring the indicator output failed.
    ConfigureIndicator(P),
}

#[cfg(feature = "defmt")]
impl<T: core::fmt::Debug, P: core::fmt::Debug> defmt::Format for SetupError<T, P> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::RegisterHandler { channel, error } => defmt::write!(
                f,
                "could not register callback on channel {}: {:?}",
                channel,
                defmt::Debug2Format(error)
            ),
            Self::EnableChannel { channel, error } => defmt::write!(
                f,
                "could not enable RX channel {}: {:?}",
                channel,
                defmt::Debug2Format(error)
            ),
            Self::ConfigureIndicator(e) => defmt::write!(
                f,
                "could not configure indicator output: {:?}",
                defmt::Debug2Format(e)
            ),
        }
    }
}

impl<T: core::fmt::Debug, P: core::fmt::Debug> core::fmt::Display for SetupError<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RegisterHandler { channel, error } => {
                write!(f, "could not register callback on channel {}: {:?}", channel, error)
            }
            Self::EnableChannel { channel, error } => {
                write!(f, "could not enable RX channel {}: {:?}", channel, error)
            }
            Self::ConfigureIndicator(e) => {
                write!(f, "could not configure indicator output: {:?}", e)
            }
        }
    }
}

impl<T: core::fmt::Debug, P: core::fmt::Debug> core::error::Error for SetupError<T, P> {}
