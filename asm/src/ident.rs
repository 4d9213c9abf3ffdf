use arch::{
    inst::{Inst, LABEL_PREFIX},
    mem::MEM_SIZE,
};
use indexmap::IndexMap;

use crate::{error::Error, msg::Msgs, operand::parse_number, parser::Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Data {
    pub addr: u16,
    pub value: u16,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub addr: u16,
    pub line: usize,
}

/// Symbol tables of one run. Data (`$x`) and labels (`.x`) are separate
/// namespaces.
#[derive(Debug, Default)]
pub struct Idents {
    data: IndexMap<String, Data>,
    labels: IndexMap<String, Label>,
}

impl Idents {
    pub fn new() -> Self {
        Idents::default()
    }

    /// Pass 1: record the address of every data word and label.
    pub fn collect(program: &Program) -> (Idents, Msgs) {
        let mut idents = Idents::new();
        let mut msgs = Msgs::new();

        for (pc, stmt) in program.slots() {
            match stmt.kind {
                Inst::DATA => match parse_data(&stmt.arg) {
                    Ok((name, value)) => {
                        if value > u16::MAX as u32 {
                            msgs.warn(
                                Error::Truncated(stmt.arg.clone(), 16, value as u16),
                                Some(stmt.line),
                            );
                        }
                        let data = Data {
                            addr: pc,
                            value: value as u16,
                            line: stmt.line,
                        };
                        idents.insert_data(name, data, &mut msgs);
                    }
                    Err(err) => msgs.error(err, Some(stmt.line)),
                },
                Inst::LABEL => match parse_label(&stmt.arg) {
                    Ok(name) => {
                        let label = Label {
                            addr: pc,
                            line: stmt.line,
                        };
                        idents.insert_label(name, label, &mut msgs);
                    }
                    Err(err) => msgs.error(err, Some(stmt.line)),
                },
                _ => {}
            }
        }

        if program.len() > MEM_SIZE {
            msgs.warn(Error::ProgramTooLarge(program.len(), MEM_SIZE), None);
        }
        (idents, msgs)
    }

    fn insert_data(&mut self, name: String, data: Data, msgs: &mut Msgs) {
        if let Some(prev) = self.data.get(&name) {
            msgs.error(Error::RedefinedData(name.clone()), Some(data.line));
            msgs.note(Error::DefinedHere(name), Some(prev.line));
            return;
        }
        log::debug!("data {} @ 0x{:04x} = 0x{:04x}", name, data.addr, data.value);
        self.data.insert(name, data);
    }

    fn insert_label(&mut self, name: String, label: Label, msgs: &mut Msgs) {
        if let Some(prev) = self.labels.get(&name) {
            msgs.error(Error::RedefinedLabel(name.clone()), Some(label.line));
            msgs.note(Error::DefinedHere(name), Some(prev.line));
            return;
        }
        log::debug!("label {} @ 0x{:04x}", name, label.addr);
        self.labels.insert(name, label);
    }

    pub fn data(&self, name: &str) -> Option<&Data> {
        self.data.get(name)
    }

    pub fn label(&self, name: &str) -> Option<u16> {
        self.labels.get(name).map(|label| label.addr)
    }

    /// The data word that lives at `addr`.
    pub fn data_at(&self, addr: u16) -> Option<(&str, &Data)> {
        self.data
            .iter()
            .find(|(_, data)| data.addr == addr)
            .map(|(name, data)| (name.as_str(), data))
    }

    /// Labels that point at `addr`, in declaration order.
    pub fn labels_at(&self, addr: u16) -> impl Iterator<Item = &str> + '_ {
        self.labels
            .iter()
            .filter(move |(_, label)| label.addr == addr)
            .map(|(name, _)| name.as_str())
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn labels_len(&self) -> usize {
        self.labels.len()
    }
}

/// `name=value`
fn parse_data(arg: &str) -> Result<(String, u32), Error> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| Error::DataFormat(arg.to_string()))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() {
        return Err(Error::DataNameEmpty(arg.to_string()));
    }
    if value.is_empty() {
        return Err(Error::DataValueEmpty(arg.to_string()));
    }
    Ok((name.to_string(), parse_number(value)?))
}

/// `name:`, the label prefix already stripped.
fn parse_label(decl: &str) -> Result<String, Error> {
    let name = decl
        .strip_suffix(':')
        .ok_or_else(|| Error::LabelColon(format!("{}{}", LABEL_PREFIX, decl)))?
        .trim();
    if name.is_empty() {
        return Err(Error::LabelEmpty(format!("{}{}", LABEL_PREFIX, decl)));
    }
    Ok(name.to_string())
}
