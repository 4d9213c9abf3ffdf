use color_print::cprintln;

use crate::error::{Category, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgKind {
    Error,
    Warn,
    Note,
}

#[derive(Debug)]
pub struct Msg {
    pub kind: MsgKind,
    pub body: Error,
    /// 1-based source line, if the message belongs to one
    pub line: Option<usize>,
}

impl Msg {
    pub fn category(&self) -> Category {
        self.body.category()
    }

    /// Print with file location and line content.
    pub fn print(&self, file: &str, src: &[String]) {
        match self.kind {
            MsgKind::Error => cprintln!("<red,bold>error[{}]</>: {}", self.category(), self.body),
            MsgKind::Warn => cprintln!("<yellow,bold>warn[{}]</>: {}", self.category(), self.body),
            MsgKind::Note => cprintln!("<green,bold>note</>: {}", self.body),
        }
        let Some(line) = self.line else {
            cprintln!("     <blue>--></> <underline>{}</>", file);
            return;
        };
        let content = src
            .get(line.wrapping_sub(1))
            .map(|s| s.as_str())
            .unwrap_or("");
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", line, content);
        cprintln!("      <blue>|</>");
    }
}

/// Diagnostics accumulated over a run. Any `Error` entry marks the run invalid.
#[derive(Debug, Default)]
pub struct Msgs(Vec<Msg>);

impl Msgs {
    pub fn new() -> Self {
        Msgs(vec![])
    }

    pub fn error(&mut self, body: Error, line: Option<usize>) {
        log::debug!("error at line {:?}: {}", line, body);
        self.0.push(Msg {
            kind: MsgKind::Error,
            body,
            line,
        });
    }

    pub fn warn(&mut self, body: Error, line: Option<usize>) {
        self.0.push(Msg {
            kind: MsgKind::Warn,
            body,
            line,
        });
    }

    pub fn note(&mut self, body: Error, line: Option<usize>) {
        self.0.push(Msg {
            kind: MsgKind::Note,
            body,
            line,
        });
    }

    pub fn extend(&mut self, other: Msgs) {
        self.0.extend(other.0);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|msg| msg.kind == MsgKind::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Msg> {
        self.0.iter().filter(|msg| msg.kind == MsgKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Msg> {
        self.0.iter().filter(|msg| msg.kind == MsgKind::Warn)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Msg> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dump(&self, file: &str, src: &[String]) {
        for msg in &self.0 {
            msg.print(file, src);
        }
    }
}
