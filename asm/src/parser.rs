use arch::inst::{Inst, LABEL_PREFIX};
use color_print::cformat;

use crate::{error::Error, msg::Msgs, pseudo};

/// Start of a comment, up to the end of the line.
pub const COMMENT: char = '#';

// ----------------------------------------------------------------------------
// Line

#[derive(Debug, Clone)]
pub struct Line {
    idx: usize,
    code: String,
}

/// A tokenized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Label declaration, prefix stripped (`loop:` for `.loop:`)
    Label(String),
    Inst(Inst, String),
}

impl Line {
    pub fn new(idx: usize, raw: &str) -> Self {
        let code = match raw.split_once(COMMENT) {
            Some((code, _)) => code,
            None => raw,
        };
        Self {
            idx,
            code: code.to_string(),
        }
    }

    /// 1-based line number
    pub fn no(&self) -> usize {
        self.idx + 1
    }

    /// `Ok(None)` for blank and comment-only lines.
    pub fn tokenize(&self) -> Result<Option<Token>, Error> {
        let code = self.code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        // .loop:
        if let Some(decl) = code.strip_prefix(LABEL_PREFIX) {
            return Ok(Some(Token::Label(decl.to_string())));
        }

        let (head, arg) = match code.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (code, ""),
        };

        let inst = Inst::lookup(head);
        if inst == Inst::INVALID {
            return Err(Error::UnknownInstruction(head.to_string()));
        }
        if inst.expects_operand() {
            if arg.is_empty() {
                return Err(Error::MissingArgument(code.to_string()));
            }
        } else if !arg.is_empty() {
            return Err(Error::UnexpectedArgument {
                inst: head.to_string(),
                arg: arg.to_string(),
            });
        }
        Ok(Some(Token::Inst(inst, arg.to_string())))
    }
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub kind: Inst,
    pub arg: String,
    /// Source line the statement came from; lowered statements share the
    /// line of their pseudo-instruction.
    pub line: usize,
}

impl Stmt {
    pub fn new(kind: Inst, arg: impl Into<String>, line: usize) -> Self {
        Stmt {
            kind,
            arg: arg.into(),
            line,
        }
    }

    pub fn cformat(&self) -> String {
        match self.kind {
            Inst::LABEL => cformat!("<green>{}{}</>", LABEL_PREFIX, self.arg),
            Inst::DATA => cformat!("<cyan>{:<5}{}</>", self.kind.mnemonic(), self.arg),
            _ => cformat!("<red>{:<5}</><blue>{}</>", self.kind.mnemonic(), self.arg),
        }
    }
}

// ----------------------------------------------------------------------------
// Program

/// The expanded statement list. Built once, then only read: both passes walk
/// it through [`Program::slots`] so they see the same order.
#[derive(Debug, Default, Clone)]
pub struct Program {
    stmts: Vec<Stmt>,
    words: usize,
}

impl Program {
    pub fn parse<I, S>(src: I) -> (Program, Msgs)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut program = Program::default();
        let mut msgs = Msgs::new();
        let mut outline = vec![];

        for (idx, raw) in src.into_iter().enumerate() {
            let line = Line::new(idx, raw.as_ref());
            match line.tokenize() {
                Ok(None) => {}
                Ok(Some(token)) => {
                    let stmts = match &token {
                        Token::Label(decl) => vec![Stmt::new(Inst::LABEL, decl.as_str(), line.no())],
                        Token::Inst(kind, arg) => {
                            pseudo::lower(*kind, arg, program.pc(), line.no(), &mut msgs)
                        }
                    };
                    for stmt in stmts {
                        program.push(stmt);
                    }
                    outline.push((token, line.no()));
                }
                Err(err) => msgs.error(err, Some(line.no())),
            }
        }

        msgs.extend(pseudo::check_nesting(&outline));
        (program, msgs)
    }

    fn push(&mut self, stmt: Stmt) {
        if stmt.kind.occupies_slot() {
            self.words += 1;
        }
        log::trace!("{:>5}: {} {}", self.words, stmt.kind, stmt.arg);
        self.stmts.push(stmt);
    }

    /// Address the next slot-occupying statement will get.
    pub fn pc(&self) -> u16 {
        self.words as u16
    }

    /// Number of words the program encodes to.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// Every statement with its address. Labels carry the address of the
    /// next slot-occupying statement.
    pub fn slots(&self) -> impl Iterator<Item = (u16, &Stmt)> + '_ {
        self.stmts.iter().scan(0u16, |pc, stmt| {
            let at = *pc;
            if stmt.kind.occupies_slot() {
                *pc = pc.wrapping_add(1);
            }
            Some((at, stmt))
        })
    }
}
