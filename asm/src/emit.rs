use std::io::{self, Write};

use arch::{
    inst::{Inst, LABEL_PREFIX},
    mem::Cell,
};
use color_print::cformat;

use crate::{ident::Idents, parser::Program};

/// Column the `# PC:` comment of a listing line is padded to.
const LISTING_COLUMN: usize = 40;

const RULE: &str = "+------+--------+--------+------------------------------------+";

/// Raw little-endian words, no header.
pub fn to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

pub fn write_bin<W: Write>(writer: &mut W, words: &[u16]) -> io::Result<()> {
    writer.write_all(&to_bytes(words))?;
    writer.flush()
}

/// Human-readable listing of the lowered program. Not meant to be fed back
/// into the assembler.
pub fn listing(program: &Program, idents: &Idents) -> String {
    let mut out = String::new();
    push_labels(&mut out, idents, 0);

    for (pc, stmt) in program.slots() {
        if !stmt.kind.occupies_slot() {
            continue;
        }
        let arg = Cell::alias(&stmt.arg).unwrap_or(stmt.arg.as_str());
        let line = if stmt.kind == Inst::STP {
            format!("  {}", stmt.kind.mnemonic())
        } else {
            format!("  {} {}", stmt.kind.mnemonic(), arg)
        };
        let width = LISTING_COLUMN.saturating_sub(line.len());
        out.push_str(&format!("{}{:>width$}{:04x}\n", line, " # PC: 0x", pc, width = width));
        push_labels(&mut out, idents, pc.wrapping_add(1));
    }
    out
}

fn push_labels(out: &mut String, idents: &Idents, addr: u16) {
    for name in idents.labels_at(addr) {
        out.push_str(&format!("{}{}:\n", LABEL_PREFIX, name));
    }
}

/// Colored table of every statement with its address and word.
pub fn dump(program: &Program, idents: &Idents, words: &[u16]) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "| {:>4} | {:<6} | {:<6} | {:<34} |\n",
        "line", "pc", "word", "statement"
    ));
    out.push_str(RULE);
    out.push('\n');

    let mut last_line = 0;
    for (pc, stmt) in program.slots() {
        let line = if stmt.line != last_line {
            format!("{:>4}", stmt.line)
        } else {
            " ".repeat(4)
        };
        last_line = stmt.line;

        let (addr, word) = match stmt.kind {
            Inst::LABEL => (" ".repeat(6), " ".repeat(6)),
            _ => {
                let word = match words.get(pc as usize) {
                    Some(word) => cformat!("<yellow>0x{:04X}</>", word),
                    None => cformat!("<r,s>??????</>"),
                };
                (format!("0x{:04X}", pc), word)
            }
        };

        let body = match (stmt.kind, idents.data_at(pc)) {
            (Inst::DATA, Some((name, data))) => {
                cformat!("<cyan>{:<5}{} = 0x{:04X}</>", stmt.kind.mnemonic(), name, data.value)
            }
            _ => stmt.cformat(),
        };
        out.push_str(&format!("| {} | {} | {} | {}\n", line, addr, word, body));
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(src: &[&str]) -> (Program, Idents) {
        let (program, _) = Program::parse(src);
        let (idents, _) = Idents::collect(&program);
        (program, idents)
    }

    #[test]
    fn test_little_endian() {
        assert_eq!(to_bytes(&[0x0005, 0x7000, 0x1FFE]), vec![0x05, 0x00, 0x00, 0x70, 0xFE, 0x1F]);
        assert!(to_bytes(&[]).is_empty());

        let mut buf = vec![];
        write_bin(&mut buf, &[0xABCD]).unwrap();
        assert_eq!(buf, vec![0xCD, 0xAB]);
    }

    #[test]
    fn test_listing() {
        let (program, idents) = build(&[".start:", "d x=0x5", "lda $x", ".end:", "stp"]);
        let text = listing(&program, &idents);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                ".start:",
                "  d x=0x5                       # PC: 0x0000",
                "  lda $x                        # PC: 0x0001",
                ".end:",
                "  stp                           # PC: 0x0002",
            ]
        );
        assert!(lines[1..].iter().filter(|l| l.starts_with("  ")).all(|l| l.len() == 44));
    }

    #[test]
    fn test_listing_aliases() {
        let (program, idents) = build(&["call .f", "stp", ".f:", "ret"]);
        let text = listing(&program, &idents);
        assert!(text.contains("  sto $SUBR_ACC_LOC "));
        assert!(text.contains("  lda $SUBR_ACC_LOC "));
        assert!(text.contains("  sto $SUBR_PC_LOC "));
        assert!(text.contains("  jmp $SUBR_PC_LOC "));
        assert!(text.contains("  d __pc__0x7=0x4007 "));
        assert!(text.contains("# PC: 0x0007\n.f:\n  jmp $SUBR_PC_LOC"));
        assert_eq!(text.lines().filter(|l| l.contains("# PC:")).count(), program.len());
    }

    #[test]
    fn test_listing_long_line() {
        let long = format!("d {}=1", "n".repeat(40));
        let (program, idents) = build(&[long.as_str()]);
        let text = listing(&program, &idents);
        assert_eq!(text, format!("  {} # PC: 0x0000\n", long));
    }

    #[test]
    fn test_dump() {
        let (program, idents) = build(&["d x=0x5", ".go:", "lda $x", "stp"]);
        let words = [0x0005, 0x0000, 0x7000];
        let text = dump(&program, &idents, &words);
        assert!(text.contains("0x0001"));
        assert!(text.contains("0x7000"));
        assert!(!text.contains("??????"));
        // header rule, header, rule, 4 statements, rule
        assert_eq!(text.lines().count(), 8);

        let text = dump(&program, &idents, &words[..1]);
        assert!(text.contains("??????"));
    }
}
