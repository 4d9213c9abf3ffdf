use bimap::BiMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::op::Opcode;

/// Prefix of a label declaration (`.loop:`) and of a label reference (`.loop`).
pub const LABEL_PREFIX: char = '.';
/// Prefix of a data reference (`$x`).
pub const DATA_PREFIX: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Inst {
    LDA,
    STO,
    ADD,
    SUB,
    JMP,
    JGE,
    JNE,
    STP,

    // Pseudo
    CALL,
    RET,

    // Directive
    DATA,
    LABEL,

    INVALID,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Directly encodable
    Primitive,
    /// Lowered to primitives before addressing
    Pseudo,
    /// Consumed by the symbol passes
    Directive,
    Invalid,
}

static MNEMONICS: Lazy<BiMap<&'static str, Inst>> = Lazy::new(|| {
    let mut map = BiMap::new();
    map.insert("lda", Inst::LDA);
    map.insert("sto", Inst::STO);
    map.insert("add", Inst::ADD);
    map.insert("sub", Inst::SUB);
    map.insert("jmp", Inst::JMP);
    map.insert("jge", Inst::JGE);
    map.insert("jne", Inst::JNE);
    map.insert("stp", Inst::STP);
    map.insert("call", Inst::CALL);
    map.insert("ret", Inst::RET);
    map.insert("d", Inst::DATA);
    map.insert(".label", Inst::LABEL);
    map
});

impl Inst {
    /// Case-insensitive mnemonic lookup. A leading `.` always yields `LABEL`,
    /// unknown text yields `INVALID`.
    pub fn lookup(text: &str) -> Inst {
        if text.starts_with(LABEL_PREFIX) {
            return Inst::LABEL;
        }
        MNEMONICS
            .get_by_left(text.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(Inst::INVALID)
    }

    pub fn mnemonic(&self) -> &'static str {
        MNEMONICS
            .get_by_right(self)
            .copied()
            .unwrap_or("(unknown instruction)")
    }

    pub fn class(&self) -> Class {
        use Inst::*;
        match self {
            LDA | STO | ADD | SUB | JMP | JGE | JNE | STP => Class::Primitive,
            CALL | RET => Class::Pseudo,
            DATA | LABEL => Class::Directive,
            INVALID => Class::Invalid,
        }
    }

    pub fn expects_operand(&self) -> bool {
        use Inst::*;
        matches!(self, LDA | STO | ADD | SUB | JMP | JGE | JNE | CALL | DATA)
    }

    /// Opcode of a primitive, `None` for anything that is never encoded.
    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Inst::LDA => Some(Opcode::LDA),
            Inst::STO => Some(Opcode::STO),
            Inst::ADD => Some(Opcode::ADD),
            Inst::SUB => Some(Opcode::SUB),
            Inst::JMP => Some(Opcode::JMP),
            Inst::JGE => Some(Opcode::JGE),
            Inst::JNE => Some(Opcode::JNE),
            Inst::STP => Some(Opcode::STP),
            _ => None,
        }
    }

    /// Whether the statement takes up a word in the output.
    pub fn occupies_slot(&self) -> bool {
        matches!(self.class(), Class::Primitive) || *self == Inst::DATA
    }
}

impl From<Opcode> for Inst {
    fn from(opcode: Opcode) -> Self {
        match opcode {
            Opcode::LDA => Inst::LDA,
            Opcode::STO => Inst::STO,
            Opcode::ADD => Inst::ADD,
            Opcode::SUB => Inst::SUB,
            Opcode::JMP => Inst::JMP,
            Opcode::JGE => Inst::JGE,
            Opcode::JNE => Inst::JNE,
            Opcode::STP => Inst::STP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    macro_rules! test_lookup {
        ($($name:ident: $text:expr => $inst:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Inst::lookup($text), $inst);
                }
            )*
        }
    }

    test_lookup! {
        test_lookup_lower: "lda" => Inst::LDA,
        test_lookup_upper: "STO" => Inst::STO,
        test_lookup_mixed: "JnE" => Inst::JNE,
        test_lookup_call: "Call" => Inst::CALL,
        test_lookup_data: "D" => Inst::DATA,
        test_lookup_label: ".loop:" => Inst::LABEL,
        test_lookup_unknown: "mov" => Inst::INVALID,
        test_lookup_empty: "" => Inst::INVALID,
    }

    #[test]
    fn test_mnemonic_inverse() {
        for inst in Inst::iter().filter(|i| *i != Inst::INVALID && *i != Inst::LABEL) {
            assert_eq!(Inst::lookup(inst.mnemonic()), inst);
        }
        assert_eq!(Inst::INVALID.mnemonic(), "(unknown instruction)");
    }

    #[test]
    fn test_expects_operand() {
        let with: Vec<Inst> = Inst::iter().filter(|i| i.expects_operand()).collect();
        assert_eq!(
            with,
            vec![
                Inst::LDA,
                Inst::STO,
                Inst::ADD,
                Inst::SUB,
                Inst::JMP,
                Inst::JGE,
                Inst::JNE,
                Inst::CALL,
                Inst::DATA
            ]
        );
    }

    #[test]
    fn test_opcode_roundtrip() {
        for inst in Inst::iter() {
            match inst.opcode() {
                Some(op) => {
                    assert_eq!(inst.class(), Class::Primitive);
                    assert_eq!(Inst::from(op), inst);
                }
                None => assert_ne!(inst.class(), Class::Primitive),
            }
        }
    }

    #[test]
    fn test_slots() {
        assert!(Inst::STP.occupies_slot());
        assert!(Inst::DATA.occupies_slot());
        assert!(!Inst::LABEL.occupies_slot());
        assert!(!Inst::CALL.occupies_slot());
        assert!(!Inst::INVALID.occupies_slot());
    }
}
