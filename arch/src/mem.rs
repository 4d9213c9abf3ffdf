/// Number of addressable words; operands are 12 bits wide.
pub const MEM_SIZE: usize = 0x1000;

/// Memory-mapped scratch cells used by the `call`/`ret` lowering.
pub struct Cell;

impl Cell {
    /// Holds the caller's accumulator while the return jump is being stored.
    pub const ACC_SAVE: u16 = 0xFFE;
    /// Holds a `jmp <return address>` word; `ret` jumps here.
    pub const RET_ADDR: u16 = 0xFFF;

    /// Operand text the expander writes for each cell.
    pub const ACC_SAVE_ARG: &'static str = "0xffe";
    pub const RET_ADDR_ARG: &'static str = "0xfff";

    /// Listing aliases.
    pub const ACC_SAVE_ALIAS: &'static str = "$SUBR_ACC_LOC";
    pub const RET_ADDR_ALIAS: &'static str = "$SUBR_PC_LOC";

    pub fn alias(arg: &str) -> Option<&'static str> {
        match arg {
            Cell::ACC_SAVE_ARG => Some(Cell::ACC_SAVE_ALIAS),
            Cell::RET_ADDR_ARG => Some(Cell::RET_ADDR_ALIAS),
            _ => None,
        }
    }
}

#[test]
fn test() {
    assert_eq!(Cell::alias("0xffe"), Some("$SUBR_ACC_LOC"));
    assert_eq!(Cell::alias("0xfff"), Some("$SUBR_PC_LOC"));
    assert_eq!(Cell::alias("0xffd"), None);
    assert!((Cell::RET_ADDR as usize) < MEM_SIZE);
}
