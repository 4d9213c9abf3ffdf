use arch::inst::{DATA_PREFIX, LABEL_PREFIX};

use crate::{error::Error, ident::Idents};

// ----------------------------------------------------------------------------
// Operand

/// An operand token, classified by its shape alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    Literal(u32),
    Data(&'a str),
    Label(&'a str),
}

impl<'a> Operand<'a> {
    pub fn parse(s: &'a str) -> Result<Operand<'a>, Error> {
        if is_numeric(s) {
            return parse_number(s).map(Operand::Literal);
        }
        if let Some(name) = s.strip_prefix(DATA_PREFIX) {
            return Ok(Operand::Data(name));
        }
        if let Some(name) = s.strip_prefix(LABEL_PREFIX) {
            return Ok(Operand::Label(name));
        }
        Err(Error::MissingPrefix(s.to_string()))
    }

    /// Data references resolve to the address of the data word, not its value.
    pub fn resolve(&self, idents: &Idents) -> Result<u32, Error> {
        match self {
            Operand::Literal(v) => Ok(*v),
            Operand::Data(name) => idents
                .data(name)
                .map(|data| data.addr as u32)
                .ok_or_else(|| Error::UndefinedData(format!("{}{}", DATA_PREFIX, name))),
            Operand::Label(name) => idents
                .label(name)
                .map(|addr| addr as u32)
                .ok_or_else(|| Error::UndefinedLabel(format!("{}{}", LABEL_PREFIX, name))),
        }
    }
}

/// Parse and resolve in one go.
pub fn resolve(s: &str, idents: &Idents) -> Result<u32, Error> {
    Operand::parse(s)?.resolve(idents)
}

// ----------------------------------------------------------------------------
// Number

fn is_numeric(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

/// `0xNNN` or `NNN`. `0bNNN` is recognized but not supported.
pub fn parse_number(s: &str) -> Result<u32, Error> {
    if let Some(digits) = s.strip_prefix("0x") {
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(s.to_string()));
        }
        return u32::from_str_radix(digits, 16).map_err(|_| Error::NumberOverflow(s.to_string()));
    }
    if s.starts_with("0b") {
        return Err(Error::BinaryUnsupported(s.to_string()));
    }
    if is_numeric(s) {
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidDecimal(s.to_string()));
        }
        return s
            .parse::<u32>()
            .map_err(|_| Error::NumberOverflow(s.to_string()));
    }
    Err(Error::NotANumber(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Program;

    macro_rules! test_number {
        ($($name:ident: $text:expr => $pat:pat,)*) => {
            $(
                #[test]
                fn $name() {
                    let result = parse_number($text);
                    assert!(matches!(result, $pat), "{:?}", result);
                }
            )*
        }
    }

    test_number! {
        test_hex: "0x7" => Ok(7),
        test_hex_upper_digits: "0xFfE" => Ok(0xFFE),
        test_hex_max: "0xfff" => Ok(0xFFF),
        test_dec: "42" => Ok(42),
        test_dec_zero: "0" => Ok(0),
        test_dec_leading_zero: "007" => Ok(7),
        test_hex_empty: "0x" => Err(Error::InvalidHex(_)),
        test_hex_bad_digit: "0x12g" => Err(Error::InvalidHex(_)),
        test_dec_bad_digit: "12a" => Err(Error::InvalidDecimal(_)),
        test_binary: "0b101" => Err(Error::BinaryUnsupported(_)),
        test_overflow: "0x1ffffffff" => Err(Error::NumberOverflow(_)),
        test_not_number: "abc" => Err(Error::NotANumber(_)),
    }

    #[test]
    fn test_classify() {
        assert_eq!(Operand::parse("0x10").unwrap(), Operand::Literal(16));
        assert_eq!(Operand::parse("10").unwrap(), Operand::Literal(10));
        assert_eq!(Operand::parse("$x").unwrap(), Operand::Data("x"));
        assert_eq!(Operand::parse(".loop").unwrap(), Operand::Label("loop"));
        assert!(matches!(Operand::parse("x"), Err(Error::MissingPrefix(_))));
        assert!(matches!(Operand::parse("0xzz"), Err(Error::InvalidHex(_))));
    }

    #[test]
    fn test_resolve_symbols() {
        let (program, _) = Program::parse(["d x=0x7", "lda $x", ".end:", "jmp .end"]);
        let (idents, msgs) = Idents::collect(&program);
        assert!(!msgs.has_error());

        // address of the data word, not its value
        assert_eq!(resolve("$x", &idents).unwrap(), 0);
        assert_eq!(resolve(".end", &idents).unwrap(), 2);
        assert!(matches!(
            resolve("$missing", &idents),
            Err(Error::UndefinedData(name)) if name == "$missing"
        ));
        assert!(matches!(
            resolve(".missing", &idents),
            Err(Error::UndefinedLabel(_))
        ));
        // namespaces are separate
        assert!(matches!(resolve("$end", &idents), Err(Error::UndefinedData(_))));
        assert!(matches!(resolve(".x", &idents), Err(Error::UndefinedLabel(_))));
    }
}
