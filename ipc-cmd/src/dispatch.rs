//! Command dispatcher.
//!
//! A single task owns the mailbox TX side and the indicator. It pops records
//! from the [`IngressQueue`] one at a time, applies the command table and
//! sends the reply, so replies leave in the order their commands arrived.
//!
//! | command         | effect                   | reply `param_ptr`     |
//! |-----------------|--------------------------|-----------------------|
//! | `SELF_TEST_A`   | -                        | `diag::SELF_TEST_A`   |
//! | `SELF_TEST_B`   | -                        | no reply              |
//! | `SELF_TEST_C`   | -                        | `diag::SELF_TEST_C`   |
//! | `INDICATOR_SET` | drive indicator          | `indicator::DONE`     |
//! | anything else   | -                        | echo                  |
//!
//! Every reply is tagged as produced by this core.

use core::convert::Infallible;

use crate::config::Config;
use crate::error::SetupError;
use crate::fmt::Debug2Format;
use crate::indicator::Indicator;
use crate::protocol::{diag, indicator, IndicatorState, Opcode};
use crate::queue::IngressQueue;
use crate::record::{OwnerTags, Record, Reserved};
use crate::transport::Mailbox;

/// Counters kept by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchStats {
    /// Records taken from the queue.
    pub received: u32,
    /// Replies accepted by the mailbox.
    pub replied: u32,
    /// Replies the mailbox refused. These are not retried.
    pub send_failures: u32,
    /// `INDICATOR_SET` commands whose output could not be driven.
    pub indicator_failures: u32,
}

/// The consumer side of the command channel.
pub struct Dispatcher<M, I, const N: usize> {
    queue: &'static IngressQueue<N>,
    mailbox: M,
    indicator: I,
    config: Config,
    stats: DispatchStats,
}

impl<M: Mailbox, I: Indicator, const N: usize> Dispatcher<M, I, N> {
    /// Run the startup sequence.
    ///
    /// Registers `queue` as the receive handler, enables the RX channel and
    /// configures the indicator, in that order. Stops at the first failure.
    pub fn start(
        queue: &'static IngressQueue<N>,
        mut mailbox: M,
        mut indicator: I,
        config: Config,
    ) -> Result<Self, SetupError<M::Error, I::Error>> {
        let rx = config.rx_channel;

        mailbox
            .register_receive_handler(rx, queue)
            .map_err(|error| SetupError::RegisterHandler { channel: rx, error })?;
        mailbox
            .set_channel_enabled(rx, true)
            .map_err(|error| SetupError::EnableChannel { channel: rx, error })?;
        indicator
            .configure_output()
            .map_err(SetupError::ConfigureIndicator)?;

        info!(
            "command channel ready: rx {} tx {} depth {}",
            rx.0,
            config.tx_channel.0,
            N
        );

        Ok(Self {
            queue,
            mailbox,
            indicator,
            config,
            stats: DispatchStats::default(),
        })
    }

    /// Apply the command table to one record and build its reply.
    ///
    /// Returns `None` for commands that are not answered.
    pub fn handle(&mut self, mut record: Record) -> Option<Record> {
        self.stats.received = self.stats.received.wrapping_add(1);

        let op = Opcode::from(record.cmd_id());
        debug!(
            "received cmd ip_id({}) cmd_id({:#04x}) param_ptr({:#010x})",
            record.ip_id,
            record.cmd_id(),
            record.param_ptr
        );

        match op {
            Opcode::SelfTestA => {
                record.param_ptr = diag::SELF_TEST_A;
            }
            Opcode::SelfTestB => {
                debug!("SELF_TEST_B: nothing to do");
                return None;
            }
            Opcode::SelfTestC => {
                record.param_ptr = diag::SELF_TEST_C;
            }
            Opcode::IndicatorSet => {
                let state = IndicatorState::from_param(record.param_ptr);
                self.drive_indicator(state);
                record.param_ptr = indicator::DONE;
            }
            Opcode::Unrecognized(raw) => {
                if let Reserved::Timestamp(mstime) = record.reserved(op.reserved_kind()) {
                    debug!(
                        "unrecognized cmd {:#04x} (mstime {}), echoing",
                        raw,
                        mstime
                    );
                }
            }
        }

        record.set_cmd_id(op.into());
        record.set_tags(OwnerTags::RTOS);
        debug!(
            "reply cmd_id({:#04x}) param_ptr({:#010x})",
            record.cmd_id(),
            record.param_ptr
        );
        Some(record)
    }

    fn drive_indicator(&mut self, state: IndicatorState) {
        let on = state.is_on();
        debug!("INDICATOR_SET: on={}", on);
        if let Err(e) = self.indicator.set_output(on) {
            self.stats.indicator_failures = self.stats.indicator_failures.wrapping_add(1);
            warn!("could not drive indicator: {:?}", Debug2Format(&e));
        }
    }

    /// Wait for one command, handle it and send the reply, if any.
    ///
    /// A failed send is logged and the reply is abandoned.
    pub async fn process_one(&mut self) {
        let record = self.queue.pop().await;
        let Some(reply) = self.handle(record) else {
            return;
        };

        let tx = self.config.tx_channel;
        match self.mailbox.send(tx, &reply.to_bytes()).await {
            Ok(()) => {
                self.stats.replied = self.stats.replied.wrapping_add(1);
                debug!("responded via channel {}", tx.0);
            }
            Err(e) => {
                self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                error!(
                    "could not send reply to cmd {:#04x}: {:?}",
                    reply.cmd_id(),
                    Debug2Format(&e)
                );
            }
        }
    }

    /// Process commands forever.
    pub async fn run(mut self) -> Infallible {
        loop {
            self.process_one().await;
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn mailbox(&self) -> &M {
        &self.mailbox
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

/// Start the command channel and process commands until power-off.
///
/// Only returns if the startup sequence fails; the error is logged first.
pub async fn serve<M: Mailbox, I: Indicator, const N: usize>(
    queue: &'static IngressQueue<N>,
    mailbox: M,
    indicator: I,
    config: Config,
) -> Result<Infallible, SetupError<M::Error, I::Error>> {
    match Dispatcher::start(queue, mailbox, indicator, config) {
        Ok(dispatcher) => Ok(dispatcher.run().await),
        Err(e) => {
            error!("command channel setup failed: {}", e);
            Err(e)
        }
    }
}
