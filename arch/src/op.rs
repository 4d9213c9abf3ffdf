use color_print::cformat;
use num_enum::{IntoPrimitive, TryFromPrimitive, TryFromPrimitiveError};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::inst::Inst;

pub const OPCODE_SHIFT: u16 = 12;
pub const OPERAND_MASK: u16 = 0x0FFF;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    Display,
)]
#[repr(u8)]
pub enum Opcode {
    LDA = 0b0000,
    STO = 0b0001,
    ADD = 0b0010,
    SUB = 0b0011,
    JMP = 0b0100,
    JGE = 0b0101,
    JNE = 0b0110,
    STP = 0b0111,
}

/// One machine word: 4-bit opcode in bits 15..12, 12-bit operand in bits 11..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Op {
    pub opcode: Opcode,
    pub operand: u16,
}

impl Op {
    /// The operand is masked to 12 bits.
    pub fn new(opcode: Opcode, operand: u16) -> Self {
        Op {
            opcode,
            operand: operand & OPERAND_MASK,
        }
    }

    pub fn to_bin(&self) -> u16 {
        let opcode: u8 = self.opcode.into();
        (opcode as u16 & 0xF) << OPCODE_SHIFT | (self.operand & OPERAND_MASK)
    }

    pub fn from_bin(bin: u16) -> Result<Op, TryFromPrimitiveError<Opcode>> {
        let opcode = Opcode::try_from((bin >> OPCODE_SHIFT) as u8)?;
        Ok(Op::new(opcode, bin))
    }

    pub fn cformat(&self) -> String {
        match self.opcode {
            Opcode::STP => cformat!("<red>{:<4}</>", Inst::from(self.opcode).mnemonic()),
            _ => cformat!(
                "<red>{:<4}</><yellow>0x{:03X}</>",
                Inst::from(self.opcode).mnemonic(),
                self.operand
            ),
        }
    }
}
