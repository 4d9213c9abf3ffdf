//! Two-pass assembler for the A16 accumulator machine.
//!
//! Source lines are tokenized and lowered into one statement list
//! ([`parser::Program`]), symbol addresses are collected from it
//! ([`ident::Idents`]), and every slot is then encoded into a 16-bit word
//! ([`generate::generate`]).

pub mod emit;
pub mod error;
pub mod generate;
pub mod ident;
pub mod msg;
pub mod operand;
pub mod parser;
pub mod pseudo;

use std::{
    fs::File,
    io::{BufRead, BufReader},
};

pub use error::{Category, Error};
pub use msg::{Msg, MsgKind, Msgs};

use ident::Idents;
use parser::Program;

/// Result of a successful run.
#[derive(Debug)]
pub struct Assembly {
    pub program: Program,
    pub idents: Idents,
    pub words: Vec<u16>,
    /// Warnings and notes; never contains an error.
    pub msgs: Msgs,
}

impl Assembly {
    pub fn to_bytes(&self) -> Vec<u8> {
        emit::to_bytes(&self.words)
    }

    pub fn listing(&self) -> String {
        emit::listing(&self.program, &self.idents)
    }

    pub fn dump(&self) -> String {
        emit::dump(&self.program, &self.idents, &self.words)
    }
}

/// Run every stage, stopping after the first one that reports an error.
/// On failure all diagnostics gathered so far are returned.
pub fn assemble<I, S>(src: I) -> Result<Assembly, Msgs>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (program, mut msgs) = Program::parse(src);
    log::debug!("parsed {} statements, {} words", program.stmts().len(), program.len());
    if msgs.has_error() {
        return Err(msgs);
    }

    let (idents, pass1) = Idents::collect(&program);
    msgs.extend(pass1);
    log::debug!(
        "collected {} data, {} labels",
        idents.data_len(),
        idents.labels_len()
    );
    if msgs.has_error() {
        return Err(msgs);
    }

    let (words, pass2) = generate::generate(&program, &idents);
    msgs.extend(pass2);
    if msgs.has_error() {
        return Err(msgs);
    }

    Ok(Assembly {
        program,
        idents,
        words,
        msgs,
    })
}

/// Read source lines. A file that opens but cannot be read to the end (e.g.
/// invalid UTF-8) is a `FileRead` error.
pub fn read_source(path: &str) -> Result<Vec<String>, Error> {
    let file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<String>, _>>()
        .map_err(|e| Error::FileRead(path.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &[u8]) -> String {
        let path = std::env::temp_dir().join(format!("a16asm-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_read_source() {
        let path = temp_file("ok.s", b"d x=0x5\nlda $x # load\nstp\n");
        let src = read_source(&path).unwrap();
        assert_eq!(src, vec!["d x=0x5", "lda $x # load", "stp"]);
        assert_eq!(assemble(&src).unwrap().words, vec![0x0005, 0x0000, 0x7000]);
    }

    #[test]
    fn test_read_source_invalid_utf8() {
        let path = temp_file("bad.s", b"lda 1\n\xff\xfe\n");
        let err = read_source(&path).unwrap_err();
        assert!(matches!(err, Error::FileRead(..)));
        assert_eq!(err.category(), Category::Io);
    }

    #[test]
    fn test_read_source_missing() {
        assert!(matches!(
            read_source("/nonexistent/a16/main.s"),
            Err(Error::FileOpen(..))
        ));
    }
}
