//! Lowering of `call` and `ret`.
//!
//! The machine has no call stack and a single accumulator, so a call goes
//! through two fixed memory cells: [`Cell::ACC_SAVE`] keeps the caller's
//! accumulator for a moment, and [`Cell::RET_ADDR`] receives a `jmp` back to
//! the caller. `ret` simply jumps into that cell. Only one call can be live
//! at a time.

use arch::{
    inst::{Inst, DATA_PREFIX, LABEL_PREFIX},
    mem::Cell,
    op::{Op, Opcode},
};
use indexmap::IndexSet;

use crate::{
    error::Error,
    msg::Msgs,
    operand::Operand,
    parser::{Stmt, Token},
};

/// Words a lowered `call` takes up.
pub const CALL_LEN: u16 = 7;

/// Lower one instruction at `pc`. Anything but `call`/`ret` passes through.
pub fn lower(kind: Inst, arg: &str, pc: u16, line: usize, msgs: &mut Msgs) -> Vec<Stmt> {
    match kind {
        Inst::CALL => {
            if let Err(err) = Operand::parse(arg) {
                msgs.error(err, Some(line));
            }
            call(arg, pc, line)
        }
        Inst::RET => vec![ret(line)],
        _ => vec![Stmt::new(kind, arg, line)],
    }
}

/// `call <target>` with its first word at `pc`.
pub fn call(target: &str, pc: u16, line: usize) -> Vec<Stmt> {
    let ret = pc.wrapping_add(CALL_LEN);
    let name = format!("__pc__0x{:x}", ret);
    // the cell gets an executable jump, so `ret` can land on it
    let word = Op::new(Opcode::JMP, ret).to_bin();
    log::debug!("call {} at 0x{:04x} returns to 0x{:04x}", target, pc, ret);

    vec![
        Stmt::new(Inst::STO, Cell::ACC_SAVE_ARG, line),
        Stmt::new(Inst::JMP, format!("0x{:x}", pc.wrapping_add(3)), line),
        Stmt::new(Inst::DATA, format!("{}=0x{:x}", name, word), line),
        Stmt::new(Inst::LDA, format!("{}{}", DATA_PREFIX, name), line),
        Stmt::new(Inst::STO, Cell::RET_ADDR_ARG, line),
        Stmt::new(Inst::LDA, Cell::ACC_SAVE_ARG, line),
        Stmt::new(Inst::JMP, target, line),
    ]
}

pub fn ret(line: usize) -> Stmt {
    Stmt::new(Inst::JMP, Cell::RET_ADDR_ARG, line)
}

/// Warn about calls made from inside a called subroutine, i.e. between the
/// target label and the first `ret` after it.
pub fn check_nesting(outline: &[(Token, usize)]) -> Msgs {
    let mut msgs = Msgs::new();

    let targets: IndexSet<&str> = outline
        .iter()
        .filter_map(|(token, _)| match token {
            Token::Inst(Inst::CALL, target) => target.strip_prefix(LABEL_PREFIX),
            _ => None,
        })
        .collect();

    for (idx, (token, _)) in outline.iter().enumerate() {
        let Token::Label(decl) = token else {
            continue;
        };
        let name = decl.trim_end_matches(':').trim();
        if !targets.contains(name) {
            continue;
        }
        for (token, line) in &outline[idx + 1..] {
            match token {
                Token::Inst(Inst::RET, _) => break,
                Token::Inst(Inst::CALL, target) => msgs.warn(
                    Error::NestedCall(target.clone(), format!("{}{}", LABEL_PREFIX, name)),
                    Some(*line),
                ),
                _ => {}
            }
        }
    }
    msgs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Program;

    #[test]
    fn test_call_layout() {
        let stmts = call(".sub", 5, 9);
        let lowered: Vec<(Inst, &str)> = stmts.iter().map(|s| (s.kind, s.arg.as_str())).collect();
        assert_eq!(
            lowered,
            vec![
                (Inst::STO, "0xffe"),
                (Inst::JMP, "0x8"),
                (Inst::DATA, "__pc__0xc=0x400c"),
                (Inst::LDA, "$__pc__0xc"),
                (Inst::STO, "0xfff"),
                (Inst::LDA, "0xffe"),
                (Inst::JMP, ".sub"),
            ]
        );
        assert!(stmts.iter().all(|s| s.line == 9));
        assert_eq!(stmts.len() as u16, CALL_LEN);
    }

    #[test]
    fn test_ret() {
        assert_eq!(ret(3), Stmt::new(Inst::JMP, "0xfff", 3));
    }

    #[test]
    fn test_passthrough() {
        let mut msgs = Msgs::new();
        let stmts = lower(Inst::ADD, "$x", 0, 1, &mut msgs);
        assert_eq!(stmts, vec![Stmt::new(Inst::ADD, "$x", 1)]);
        assert!(msgs.is_empty());
    }

    #[test]
    fn test_bad_target_still_lowered() {
        let mut msgs = Msgs::new();
        let stmts = lower(Inst::CALL, "sub", 0, 1, &mut msgs);
        assert_eq!(stmts.len(), CALL_LEN as usize);
        assert!(msgs.has_error());
        assert!(matches!(
            msgs.errors().next().unwrap().body,
            Error::MissingPrefix(_)
        ));
    }

    #[test]
    fn test_expansion_in_program() {
        let (program, msgs) = Program::parse(["lda 1", "call .f", "stp", ".f:", "ret"]);
        assert!(msgs.is_empty());
        // 1 + 7 + 1 + 1
        assert_eq!(program.len(), 10);
        let (pc, stmt) = program
            .slots()
            .find(|(_, s)| s.kind == Inst::DATA)
            .unwrap();
        assert_eq!(pc, 3);
        assert_eq!(stmt.arg, "__pc__0x8=0x4008");
    }

    #[test]
    fn test_nested_call_warns() {
        let (_, msgs) = Program::parse([
            "call .outer",
            "stp",
            ".outer:",
            "call .inner",
            "ret",
            ".inner:",
            "ret",
        ]);
        assert!(!msgs.has_error());
        let warns: Vec<_> = msgs.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].line, Some(4));
        assert!(matches!(&warns[0].body, Error::NestedCall(inner, outer) if inner == ".inner" && outer == ".outer"));
    }

    #[test]
    fn test_sequential_calls_do_not_warn() {
        let (_, msgs) = Program::parse(["call .f", "call .f", "stp", ".f:", "ret"]);
        assert!(msgs.is_empty());
    }
}
