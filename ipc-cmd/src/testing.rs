//! Host-side doubles for the mailbox and indicator pin.

use crate::record::{Record, RECORD_SIZE};
use crate::transport::{ChannelId, Mailbox, ReceiveHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MockMailboxError {
    Register,
    Enable,
    Busy,
}

/// Records every call; failures are injected per operation.
#[derive(Default)]
pub(crate) struct MockMailbox {
    pub handler: Option<(ChannelId, &'static dyn ReceiveHandler)>,
    pub enabled: Vec<(ChannelId, bool)>,
    pub sent: Vec<(ChannelId, [u8; RECORD_SIZE])>,
    pub fail_register: bool,
    pub fail_enable: bool,
    /// Number of upcoming sends that fail.
    pub fail_sends: usize,
}

impl MockMailbox {
    /// Deliver a buffer as if the peer had sent it.
    pub fn deliver(&self, data: &[u8]) {
        let (channel, handler) = self.handler.expect("no receive handler registered");
        handler.on_receive(channel, data);
    }

    pub fn sent_records(&self) -> Vec<Record> {
        self.sent
            .iter()
            .map(|(_, bytes)| Record::from_array(bytes))
            .collect()
    }
}

impl Mailbox for MockMailbox {
    type Error = MockMailboxError;

    fn register_receive_handler(
        &mut self,
        channel: ChannelId,
        handler: &'static dyn ReceiveHandler,
    ) -> Result<(), Self::Error> {
        if self.fail_register {
            return Err(MockMailboxError::Register);
        }
        self.handler = Some((channel, handler));
        Ok(())
    }

    fn set_channel_enabled(&mut self, channel: ChannelId, enabled: bool) -> Result<(), Self::Error> {
        if self.fail_enable {
            return Err(MockMailboxError::Enable);
        }
        self.enabled.push((channel, enabled));
        Ok(())
    }

    async fn send(&mut self, channel: ChannelId, data: &[u8; RECORD_SIZE]) -> Result<(), Self::Error> {
        if self.fail_sends > 0 {
            self.fail_sends -= 1;
            return Err(MockMailboxError::Busy);
        }
        self.sent.push((channel, *data));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockPinError;

impl embedded_hal_1::digital::Error for MockPinError {
    fn kind(&self) -> embedded_hal_1::digital::ErrorKind {
        embedded_hal_1::digital::ErrorKind::Other
    }
}

/// Output pin that remembers its last driven level.
#[derive(Debug, Default)]
pub(crate) struct MockPin {
    level: Option<bool>,
    broken: bool,
    writes: usize,
}

impl MockPin {
    /// A pin whose every write fails.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// Last driven level, `None` if never driven.
    pub fn level(&self) -> Option<bool> {
        self.level
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    fn drive(&mut self, high: bool) -> Result<(), MockPinError> {
        if self.broken {
            return Err(MockPinError);
        }
        self.level = Some(high);
        self.writes += 1;
        Ok(())
    }
}

impl embedded_hal_1::digital::ErrorType for MockPin {
    type Error = MockPinError;
}

impl embedded_hal_1::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }
}
