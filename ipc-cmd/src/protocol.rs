//! Command table shared with the application core.

use crate::record::ReservedKind;

/// Opcode values on the wire.
pub mod cmd {
    pub const SELF_TEST_A: u8 = 0x10;
    pub const SELF_TEST_B: u8 = 0x11;
    pub const SELF_TEST_C: u8 = 0x12;
    pub const INDICATOR_SET: u8 = 0x13;
    /// First value past the defined opcodes.
    pub const LIMIT: u8 = 0x14;
}

/// `param_ptr` values used by `INDICATOR_SET`.
pub mod indicator {
    pub const ON: u32 = 0x02;
    pub const OFF: u32 = 0x03;
    /// Reply payload once the output has been driven.
    pub const DONE: u32 = 0x04;
}

/// Diagnostic payloads returned by the self-tests.
pub mod diag {
    pub const SELF_TEST_A: u32 = 0x1234_5678;
    pub const SELF_TEST_C: u32 = 0x0000_55AA;
}

/// A decoded opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    SelfTestA,
    /// Accepted without effect and without reply.
    SelfTestB,
    SelfTestC,
    IndicatorSet,
    /// Any value outside the table. Answered with an echo so the peer
    /// always sees a response.
    Unrecognized(u8),
}

impl From<u8> for Opcode {
    fn from(cmd_id: u8) -> Self {
        match cmd_id {
            cmd::SELF_TEST_A => Self::SelfTestA,
            cmd::SELF_TEST_B => Self::SelfTestB,
            cmd::SELF_TEST_C => Self::SelfTestC,
            cmd::INDICATOR_SET => Self::IndicatorSet,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        match op {
            Opcode::SelfTestA => cmd::SELF_TEST_A,
            Opcode::SelfTestB => cmd::SELF_TEST_B,
            Opcode::SelfTestC => cmd::SELF_TEST_C,
            Opcode::IndicatorSet => cmd::INDICATOR_SET,
            Opcode::Unrecognized(raw) => raw,
        }
    }
}

impl Opcode {
    /// Whether handling this opcode produces a reply.
    pub const fn replies(&self) -> bool {
        !matches!(self, Self::SelfTestB)
    }

    /// How the reserved field of an inbound record with this opcode is read.
    ///
    /// Replies always carry [`ReservedKind::Tags`].
    pub const fn reserved_kind(&self) -> ReservedKind {
        match self {
            Self::Unrecognized(_) => ReservedKind::Timestamp,
            _ => ReservedKind::Tags,
        }
    }
}

/// Requested indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorState {
    On,
    Off,
}

impl IndicatorState {
    /// Decode an `INDICATOR_SET` payload.
    ///
    /// Only the exact ON value turns the indicator on; everything else,
    /// including values outside the enum, resolves to off.
    pub const fn from_param(param_ptr: u32) -> Self {
        match param_ptr {
            indicator::ON => Self::On,
            _ => Self::Off,
        }
    }

    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}
