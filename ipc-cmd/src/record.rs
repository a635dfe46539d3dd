//! Command record wire format.
//!
//! Every message exchanged over the mailbox is one packed 8-byte record:
//!
//! | offset | size | field                                  |
//! |--------|------|----------------------------------------|
//! | 0      | 1    | `ip_id`                                |
//! | 1      | 1    | `cmd_id` (bits 0..=6), `block` (bit 7) |
//! | 2      | 2    | reserved: `linux`/`rtos` tags or `mstime` |
//! | 4      | 4    | `param_ptr`                            |
//!
//! Both cores share the SoC, so multi-byte fields use native byte order.

use crate::error::RecordError;

/// Size of one record on the wire, in the ingress queue and in memory.
pub const RECORD_SIZE: usize = 8;

const CMD_ID_MASK: u8 = 0x7F;
const BLOCK_BIT: u8 = 0x80;

/// Validity/ownership tags carried in the reserved field.
///
/// Each side sets its own tag when it produces a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OwnerTags {
    /// Set by the application (Linux) core.
    pub linux: u8,
    /// Set by this (real-time) core.
    pub rtos: u8,
}

impl OwnerTags {
    /// Tags of a record produced by this core.
    pub const RTOS: Self = Self { linux: 0, rtos: 1 };

    /// Whether the record was last produced by this core.
    pub const fn is_from_rtos(&self) -> bool {
        self.rtos != 0 && self.linux == 0
    }
}

/// Which interpretation of the reserved field applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReservedKind {
    /// Two ownership tag bytes.
    Tags,
    /// One 16-bit timestamp-like scalar.
    Timestamp,
}

/// Semantic view of the 2-byte reserved field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reserved {
    Tags(OwnerTags),
    Timestamp(u16),
}

impl Reserved {
    /// Interpret raw reserved bytes as `kind`.
    pub const fn from_raw(kind: ReservedKind, raw: [u8; 2]) -> Self {
        match kind {
            ReservedKind::Tags => Self::Tags(OwnerTags {
                linux: raw[0],
                rtos: raw[1],
            }),
            ReservedKind::Timestamp => Self::Timestamp(u16::from_ne_bytes(raw)),
        }
    }

    /// Raw wire bytes of this view.
    pub const fn to_raw(self) -> [u8; 2] {
        match self {
            Self::Tags(tags) => [tags.linux, tags.rtos],
            Self::Timestamp(mstime) => mstime.to_ne_bytes(),
        }
    }
}

/// A command or reply record.
///
/// Records are plain values: the receive handler copies them out of the
/// mailbox buffer and the dispatcher rewrites them in place to build replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Record {
    /// Logical sub-block identifier. Informational, echoed in replies.
    pub ip_id: u8,
    cmd_id: u8,
    /// Peer expects a blocking reply. Carried through, not enforced here.
    pub block: bool,
    reserved: [u8; 2],
    /// Opaque payload: an address, a status code or a scalar depending on `cmd_id`.
    pub param_ptr: u32,
}

impl Record {
    /// Create a record with zeroed reserved bytes.
    ///
    /// `cmd_id` is truncated to its 7-bit wire width.
    pub const fn new(ip_id: u8, cmd_id: u8, param_ptr: u32) -> Self {
        Self {
            ip_id,
            cmd_id: cmd_id & CMD_ID_MASK,
            block: false,
            reserved: [0; 2],
            param_ptr,
        }
    }

    /// 7-bit command opcode.
    #[inline]
    pub const fn cmd_id(&self) -> u8 {
        self.cmd_id
    }

    /// Set the opcode. Bits above the 7-bit field are discarded.
    #[inline]
    pub fn set_cmd_id(&mut self, cmd_id: u8) {
        self.cmd_id = cmd_id & CMD_ID_MASK;
    }

    /// Raw reserved bytes.
    #[inline]
    pub const fn reserved_raw(&self) -> [u8; 2] {
        self.reserved
    }

    /// Reserved field read as `kind`.
    pub const fn reserved(&self, kind: ReservedKind) -> Reserved {
        Reserved::from_raw(kind, self.reserved)
    }

    pub fn set_reserved(&mut self, reserved: Reserved) {
        self.reserved = reserved.to_raw();
    }

    /// Reserved field read as ownership tags.
    pub const fn tags(&self) -> OwnerTags {
        OwnerTags {
            linux: self.reserved[0],
            rtos: self.reserved[1],
        }
    }

    pub fn set_tags(&mut self, tags: OwnerTags) {
        self.set_reserved(Reserved::Tags(tags));
    }

    /// Builder-style variant of [`Record::set_reserved`].
    pub fn with_reserved(mut self, reserved: Reserved) -> Self {
        self.set_reserved(reserved);
        self
    }

    /// Builder-style setter for the `block` flag.
    pub fn with_block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    /// Decode a record from a receive buffer.
    ///
    /// The buffer must be exactly [`RECORD_SIZE`] bytes.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, RecordError> {
        let buf: &[u8; RECORD_SIZE] = buf.try_into().map_err(|_| RecordError::WrongSize {
            expected: RECORD_SIZE,
            actual: buf.len(),
        })?;
        Ok(Self::from_array(buf))
    }

    /// Decode a record from its exact wire image.
    pub const fn from_array(buf: &[u8; RECORD_SIZE]) -> Self {
        Self {
            ip_id: buf[0],
            cmd_id: buf[1] & CMD_ID_MASK,
            block: buf[1] & BLOCK_BIT != 0,
            reserved: [buf[2], buf[3]],
            param_ptr: u32::from_ne_bytes([buf[4], buf[5], buf[6], buf[7]]),
        }
    }

    /// Encode the record into its wire image.
    pub const fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let flags = self.cmd_id | if self.block { BLOCK_BIT } else { 0 };
        let p = self.param_ptr.to_ne_bytes();
        [
            self.ip_id,
            flags,
            self.reserved[0],
            self.reserved[1],
            p[0],
            p[1],
            p[2],
            p[3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_id_and_block_share_one_byte() {
        let raw = [0x07, 0x93, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
        let record = Record::from_array(&raw);

        assert_eq!(record.ip_id, 0x07);
        assert_eq!(record.cmd_id(), 0x13);
        assert!(record.block);
        assert_eq!(record.to_bytes(), raw);
    }

    #[test]
    fn set_cmd_id_keeps_block_bit() {
        let mut record = Record::new(0, 0x10, 0).with_block(true);
        record.set_cmd_id(0xFF);

        assert_eq!(record.cmd_id(), 0x7F);
        assert!(record.block);
        assert_eq!(record.to_bytes()[1], 0xFF);
    }

    #[test]
    fn param_ptr_uses_native_byte_order() {
        let record = Record::new(0, 0x10, 0x1234_5678);
        let bytes = record.to_bytes();

        assert_eq!(&bytes[4..], &0x1234_5678u32.to_ne_bytes());
    }

    #[test]
    fn reserved_views_alias_the_same_bytes() {
        let record = Record::new(0, 0x20, 0).with_reserved(Reserved::Tags(OwnerTags {
            linux: 0xAB,
            rtos: 0xCD,
        }));

        assert_eq!(record.reserved_raw(), [0xAB, 0xCD]);
        assert_eq!(
            record.reserved(ReservedKind::Timestamp),
            Reserved::Timestamp(u16::from_ne_bytes([0xAB, 0xCD]))
        );
        assert_eq!(
            record.tags(),
            OwnerTags {
                linux: 0xAB,
                rtos: 0xCD
            }
        );
    }

    #[test]
    fn rtos_tags_mark_origin() {
        let mut record = Record::new(0, 0x10, 0);
        assert!(!record.tags().is_from_rtos());

        record.set_tags(OwnerTags::RTOS);
        assert!(record.tags().is_from_rtos());
        assert_eq!(record.reserved_raw(), [0, 1]);
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert_eq!(
            Record::from_bytes(&[0u8; 7]),
            Err(RecordError::WrongSize {
                expected: RECORD_SIZE,
                actual: 7
            })
        );
        assert_eq!(
            Record::from_bytes(&[0u8; 9]),
            Err(RecordError::WrongSize {
                expected: RECORD_SIZE,
                actual: 9
            })
        );
    }

    #[test]
    fn from_bytes_accepts_exact_length() {
        let raw = [1, 0x12, 0, 1, 0xAA, 0x55, 0, 0];
        let record = Record::from_bytes(&raw).unwrap();

        assert_eq!(record.cmd_id(), 0x12);
        assert!(!record.block);
        assert_eq!(record.tags(), OwnerTags::RTOS);
    }
}
