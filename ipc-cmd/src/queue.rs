//! Ingress queue between the mailbox interrupt and the dispatcher task.
//!
//! The producer side never waits: a record that does not fit is dropped and
//! counted. The single consumer waits on [`IngressQueue::pop`] for as long as
//! it takes.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::record::Record;
use crate::transport::{ChannelId, ReceiveHandler};

/// Outcome of [`IngressQueue::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Admission {
    /// The record was queued.
    Admitted,
    /// The queue was full; the record was discarded.
    Dropped,
}

/// Fixed-capacity FIFO of command records.
///
/// Const-constructible so it can be a `static` shared with the interrupt
/// handler.
///
/// ```ignore
/// static INGRESS: IngressQueue<{ config::QUEUE_DEPTH }> = IngressQueue::new();
/// ```
pub struct IngressQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, Record, N>,
    dropped: AtomicU32,
    malformed: AtomicU32,
}

impl<const N: usize> IngressQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
            malformed: AtomicU32::new(0),
        }
    }

    /// Queue a record without blocking.
    pub fn push(&self, record: Record) -> Admission {
        match self.channel.try_send(record) {
            Ok(()) => Admission::Admitted,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Admission::Dropped
            }
        }
    }

    /// Wait for the next record.
    pub async fn pop(&self) -> Record {
        self.channel.receive().await
    }

    /// Take the next record if one is queued.
    pub fn try_pop(&self) -> Option<Record> {
        self.channel.try_receive().ok()
    }

    /// Records discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Receive buffers discarded because they had the wrong size.
    pub fn malformed(&self) -> u32 {
        self.malformed.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for IngressQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReceiveHandler for IngressQueue<N> {
    fn on_receive(&self, _channel: ChannelId, data: &[u8]) {
        match Record::from_bytes(data) {
            Ok(record) => {
                let _ = self.push(record);
            }
            Err(_) => {
                self.malformed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::protocol::cmd;

    fn record(n: u32) -> Record {
        Record::new(0, cmd::SELF_TEST_A, n)
    }

    #[test]
    fn pops_in_push_order() {
        let queue = IngressQueue::<4>::new();
        for n in 0..3 {
            assert_eq!(queue.push(record(n)), Admission::Admitted);
        }

        assert_eq!(queue.len(), 3);
        for n in 0..3 {
            assert_eq!(block_on(queue.pop()), record(n));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn overflow_drops_newest_and_counts() {
        let queue = IngressQueue::<4>::new();
        let results: [Admission; 5] = core::array::from_fn(|n| queue.push(record(n as u32)));

        assert_eq!(&results[..4], &[Admission::Admitted; 4]);
        assert_eq!(results[4], Admission::Dropped);
        assert_eq!(queue.dropped(), 1);

        for n in 0..4 {
            assert_eq!(queue.try_pop(), Some(record(n)));
        }
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn drop_count_is_pushed_minus_capacity() {
        let queue = IngressQueue::<4>::new();
        for n in 0..11 {
            let _ = queue.push(record(n));
        }

        assert_eq!(queue.dropped(), 11 - queue.capacity() as u32);
        assert_eq!(queue.len(), queue.capacity());
    }

    #[test]
    fn space_is_reclaimed_after_pop() {
        let queue = IngressQueue::<2>::new();
        let _ = queue.push(record(0));
        let _ = queue.push(record(1));
        assert_eq!(queue.push(record(2)), Admission::Dropped);

        assert_eq!(queue.try_pop(), Some(record(0)));
        assert_eq!(queue.push(record(3)), Admission::Admitted);
        assert_eq!(queue.try_pop(), Some(record(1)));
        assert_eq!(queue.try_pop(), Some(record(3)));
        assert_eq!(queue.dropped(), 1);
    }

    #[test]
    fn receive_handler_copies_buffer() {
        let queue = IngressQueue::<4>::new();
        let mut buf = Record::new(3, cmd::INDICATOR_SET, 2).to_bytes();

        queue.on_receive(ChannelId(0), &buf);
        buf.fill(0xEE);

        assert_eq!(queue.try_pop(), Some(Record::new(3, cmd::INDICATOR_SET, 2)));
    }

    #[test]
    fn receive_handler_discards_malformed_buffer() {
        let queue = IngressQueue::<4>::new();

        queue.on_receive(ChannelId(0), &[0u8; 3]);

        assert!(queue.is_empty());
        assert_eq!(queue.malformed(), 1);
        assert_eq!(queue.dropped(), 0);
    }
}
