use arch::{
    inst::Inst,
    op::{Op, OPERAND_MASK},
};

use crate::{error::Error, ident::Idents, msg::Msgs, operand, parser::Program};

/// Pass 2: one word per slot, in slot order.
///
/// A slot that fails to encode still yields a word so later addresses stay
/// where Pass 1 put them; the error marks the run invalid anyway.
pub fn generate(program: &Program, idents: &Idents) -> (Vec<u16>, Msgs) {
    let mut words = Vec::with_capacity(program.len());
    let mut msgs = Msgs::new();

    for (pc, stmt) in program.slots() {
        let word = match stmt.kind {
            Inst::LABEL => continue,
            Inst::DATA => match idents.data_at(pc) {
                Some((_, data)) => data.value,
                None => {
                    msgs.error(Error::DataSlotMissing(pc), Some(stmt.line));
                    0
                }
            },
            kind => {
                let Some(opcode) = kind.opcode() else {
                    msgs.error(Error::NoEncoder(kind.to_string()), Some(stmt.line));
                    continue;
                };
                let operand = match kind {
                    Inst::STP => 0,
                    _ => match operand::resolve(&stmt.arg, idents) {
                        Ok(v) => {
                            if v > OPERAND_MASK as u32 {
                                msgs.warn(
                                    Error::Truncated(stmt.arg.clone(), 12, v as u16 & OPERAND_MASK),
                                    Some(stmt.line),
                                );
                            }
                            v as u16
                        }
                        Err(err) => {
                            msgs.error(err, Some(stmt.line));
                            0
                        }
                    },
                };
                Op::new(opcode, operand).to_bin()
            }
        };
        log::trace!("0x{:04x}: 0x{:04x}", pc, word);
        words.push(word);
    }
    (words, msgs)
}
