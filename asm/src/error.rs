use strum::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // ------------------------------------------------------------------------
    // Syntax
    #[error("Unknown instruction: `{0}`")]
    UnknownInstruction(String),

    #[error("Argument expected for `{0}`")]
    MissingArgument(String),

    #[error("Argument `{arg}` supplied to `{inst}` which does not expect an argument")]
    UnexpectedArgument { inst: String, arg: String },

    #[error("Label declaration `{0}` expects `:` at the end")]
    LabelColon(String),

    #[error("Label declaration `{0}` has an empty name")]
    LabelEmpty(String),

    #[error("Invalid format for data `{0}`, must be of format `name=N`")]
    DataFormat(String),

    #[error("In argument `{0}` to data: name cannot be empty")]
    DataNameEmpty(String),

    #[error("In argument `{0}` to data: right hand side cannot be empty")]
    DataValueEmpty(String),

    #[error("Re-defined data: `{0}`")]
    RedefinedData(String),

    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String),

    // ------------------------------------------------------------------------
    // Number format
    #[error("Argument `{0}` starts with `0x` like a hex number, but isn't valid hex")]
    InvalidHex(String),

    #[error("Argument `{0}` starts with a digit like a decimal number, but isn't a valid decimal number")]
    InvalidDecimal(String),

    #[error("Binary number format is not implemented: `{0}`")]
    BinaryUnsupported(String),

    #[error("Number `{0}` is out of range")]
    NumberOverflow(String),

    #[error("Right hand side `{0}` of data has to be a number")]
    NotANumber(String),

    // ------------------------------------------------------------------------
    // Symbol resolution
    #[error("Usage of name `{0}` requires prefix `$` or `.`")]
    MissingPrefix(String),

    #[error("Undefined data: `{0}`")]
    UndefinedData(String),

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    // ------------------------------------------------------------------------
    // Internal
    #[error("Could not find address 0x{0:04x} in data map (internal error)")]
    DataSlotMissing(u16),

    #[error("No encoder for `{0}` (internal error)")]
    NoEncoder(String),

    // ------------------------------------------------------------------------
    // Warnings
    #[error("Value `{0}` does not fit in {1} bits and is truncated to 0x{2:x}")]
    Truncated(String, u32, u16),

    #[error("Nested call to `{0}` inside subroutine `{1}` overwrites the return address of the outer call")]
    NestedCall(String, String),

    #[error("`{0}` already defined here")]
    DefinedHere(String),

    #[error("Program has {0} words, more than the {1} addressable")]
    ProgramTooLarge(usize, usize),

    // ------------------------------------------------------------------------
    // IO
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Category {
    #[strum(serialize = "io")]
    Io,
    #[strum(serialize = "syntax")]
    Syntax,
    #[strum(serialize = "number format")]
    NumberFormat,
    #[strum(serialize = "symbol resolution")]
    SymbolResolution,
    #[strum(serialize = "internal")]
    Internal,
    #[strum(serialize = "lint")]
    Lint,
}

impl Error {
    pub fn category(&self) -> Category {
        use Error::*;
        match self {
            UnknownInstruction(_)
            | MissingArgument(_)
            | UnexpectedArgument { .. }
            | LabelColon(_)
            | LabelEmpty(_)
            | DataFormat(_)
            | DataNameEmpty(_)
            | DataValueEmpty(_)
            | RedefinedData(_)
            | RedefinedLabel(_) => Category::Syntax,
            InvalidHex(_)
            | InvalidDecimal(_)
            | BinaryUnsupported(_)
            | NumberOverflow(_)
            | NotANumber(_) => Category::NumberFormat,
            MissingPrefix(_) | UndefinedData(_) | UndefinedLabel(_) => Category::SymbolResolution,
            DataSlotMissing(_) | NoEncoder(_) => Category::Internal,
            Truncated(..) | NestedCall(..) | DefinedHere(_) | ProgramTooLarge(..) => Category::Lint,
            FileOpen(..) | FileRead(..) | FileCreate(..) | FileWrite(..) => Category::Io,
        }
    }
}
