use num_derive::FromPrimitive;

/// The marker packed into a lead byte's high nibble when a parameterized
/// opcode's operand doesn't fit in 4 bits (spec §4.4). The low nibble then
/// carries `base_byte() >> 4` for the family being extended, and the next
/// byte in the stream is the full 8-bit operand.
pub const OP_EXTENDED: u8 = 0xF0;

/// The bytecode instructions the generator emits (spec §6.2).
///
/// **NOTE:** the numeric values below are part of the wire contract with
/// the interpreter (out of scope for this crate) and with the opcode
/// encoder's nibble-packing scheme: every parameterized family's base byte
/// is a multiple of 16 so its low nibble is free to carry a 0..=15 operand,
/// and no parameterized family's high nibble collides with `OP_EXTENDED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum OpCode {
  // Parameterized opcodes: one 4-bit operand packed into the lead byte, or
  // an extended two-byte form when the operand is >= 16.
  PushInst = 0x00,
  PushTemp = 0x10,
  PushLtrl = 0x20,
  PushAssoc = 0x30,
  StoreInst = 0x40,
  StoreTemp = 0x50,
  StoreAssoc = 0x60,
  /// Operand is the argument count; a trailing byte carries the selector's
  /// literal index.
  Send = 0x70,
  SendSuper = 0x80,
  /// Operand is the block's argument+temporary count; a trailing byte
  /// carries the block-activation baseline (see `PUSHBLOCK_FRAME_BASE`).
  PushBlock = 0x90,

  // Zero-operand opcodes: single byte, no packing.
  PushSelf = 0xA0,
  PushNil = 0xA1,
  PushFalse = 0xA2,
  PushTrue = 0xA3,
  Dup = 0xA4,
  Pop = 0xA5,
  Ret = 0xA6,
  RetBlock = 0xA7,

  /// Unconditional jump to an absolute big-endian u16 code offset.
  Jump = 0xA8,
}

impl OpCode {
  /// The lead byte's value when this opcode has no operand, or when a
  /// parameterized opcode's operand fits in the low nibble.
  pub fn base_byte(self) -> u8 {
    self as u8
  }

  /// Whether this opcode packs a 4-bit-or-extended operand into its lead
  /// byte (as opposed to taking no operand, or a fixed-width jump offset).
  pub fn is_parameterized(self) -> bool {
    matches!(
      self,
      OpCode::PushInst
        | OpCode::PushTemp
        | OpCode::PushLtrl
        | OpCode::PushAssoc
        | OpCode::StoreInst
        | OpCode::StoreTemp
        | OpCode::StoreAssoc
        | OpCode::Send
        | OpCode::SendSuper
        | OpCode::PushBlock
    )
  }

  /// Whether this opcode additionally appends a plain parameter byte after
  /// its (possibly extended) lead sequence: `SEND`'s selector index and
  /// `PUSHBLOCK`'s frame-size baseline.
  pub fn has_trailing_param(self) -> bool {
    matches!(self, OpCode::Send | OpCode::SendSuper | OpCode::PushBlock)
  }

  /// Recovers the opcode family from a masked-off base byte (a lead byte
  /// with any packed operand nibble cleared, or an extended prefix with its
  /// low nibble restored to the family's base). Used by the disassembler.
  pub fn from_base_byte(byte: u8) -> Option<OpCode> {
    num_traits::FromPrimitive::from_u8(byte)
  }
}

/// `PUSHBLOCK`'s second operand. The original MiniTalk compiler hard-codes
/// this as a literal `10`; preserved here as a named constant per spec
/// §9's design note. TODO: the VM contract should state what this baseline
/// actually primes in the block's activation frame — the original never
/// documents it beyond the literal.
pub const PUSHBLOCK_FRAME_BASE: u8 = 10;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parameterized_bases_are_nibble_aligned() {
    for op in [
      OpCode::PushInst,
      OpCode::PushTemp,
      OpCode::PushLtrl,
      OpCode::PushAssoc,
      OpCode::StoreInst,
      OpCode::StoreTemp,
      OpCode::StoreAssoc,
      OpCode::Send,
      OpCode::SendSuper,
      OpCode::PushBlock,
    ] {
      assert!(op.is_parameterized());
      assert_eq!(op.base_byte() & 0x0F, 0, "{op:?} base byte must leave its low nibble free");
    }
  }

  #[test]
  fn extended_prefix_never_collides_with_a_base_byte() {
    for op in [
      OpCode::PushInst,
      OpCode::PushTemp,
      OpCode::PushLtrl,
      OpCode::PushAssoc,
      OpCode::StoreInst,
      OpCode::StoreTemp,
      OpCode::StoreAssoc,
      OpCode::Send,
      OpCode::SendSuper,
      OpCode::PushBlock,
    ] {
      for nibble in 0u8..16 {
        assert_ne!(op.base_byte() | nibble, OP_EXTENDED);
      }
    }
  }

  #[test]
  fn from_base_byte_round_trips() {
    assert_eq!(OpCode::from_base_byte(0x20), Some(OpCode::PushLtrl));
    assert_eq!(OpCode::from_base_byte(0xA6), Some(OpCode::Ret));
    assert_eq!(OpCode::from_base_byte(0xFF), None);
  }
}
