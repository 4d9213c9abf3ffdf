use crate::op::Opcode;

/// Accumulator arithmetic. `None` for opcodes that do not compute.
pub fn alu(op: Opcode, acc: u16, val: u16) -> Option<u16> {
    match op {
        Opcode::ADD => Some(acc.wrapping_add(val)),
        Opcode::SUB => Some(acc.wrapping_sub(val)),
        _ => None,
    }
}

/// Whether a jump opcode is taken for the given accumulator.
pub fn taken(op: Opcode, acc: u16) -> bool {
    match op {
        Opcode::JMP => true,
        Opcode::JGE => (acc as i16) >= 0,
        Opcode::JNE => acc != 0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alu() {
        assert_eq!(alu(Opcode::ADD, 2, 3), Some(5));
        assert_eq!(alu(Opcode::ADD, 0xFFFF, 1), Some(0));
        assert_eq!(alu(Opcode::SUB, 0, 1), Some(0xFFFF));
        assert_eq!(alu(Opcode::LDA, 1, 1), None);
    }

    #[test]
    fn test_taken() {
        assert!(taken(Opcode::JMP, 0));
        assert!(taken(Opcode::JGE, 0));
        assert!(taken(Opcode::JGE, 0x7FFF));
        assert!(!taken(Opcode::JGE, 0x8000));
        assert!(taken(Opcode::JNE, 1));
        assert!(!taken(Opcode::JNE, 0));
        assert!(!taken(Opcode::STP, 1));
    }
}
