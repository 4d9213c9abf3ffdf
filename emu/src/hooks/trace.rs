use arch::op::Op;
use color_print::cformat;

use crate::model::State;

use super::Hook;

/// Prints every executed instruction.
#[derive(Debug, Default)]
pub struct Trace {
    quiet: bool,
}

impl Trace {
    pub fn new(quiet: bool) -> Self {
        Trace { quiet }
    }

    pub fn format(time: u64, addr: u16, code: u16, state: &State) -> String {
        let op = match Op::from_bin(code) {
            Ok(op) => op.cformat(),
            Err(_) => cformat!("<r,s>????</>"),
        };
        format!(
            "[{:0>4}] 0x{:03X}: {:04X} {:<20} acc: {:04X}",
            time,
            addr,
            code,
            op,
            state.acc()
        )
    }
}

impl Hook for Trace {
    fn init(&mut self, state: State) -> State {
        if !self.quiet {
            println!(" * Trace");
        }
        state
    }

    fn exec(&mut self, time: u64, addr: u16, code: u16, state: State) -> State {
        if !self.quiet {
            println!("{}", Trace::format(time, addr, code, &state));
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let mut state = State::new();
        state.load(&[0x0002, 0x7000, 0x00AB]).unwrap();
        state.exec().unwrap();
        let line = Trace::format(0, 0, 0x0002, &state);
        assert!(line.starts_with("[0000] 0x000: 0002 "));
        assert!(line.ends_with("acc: 00AB"));
    }

    #[test]
    fn test_hook_passes_state_through() {
        let mut state = State::new();
        state.set(7, 42);
        let state = Trace::new(true).exec(0, 0, 0x7000, state);
        assert_eq!(state.get(7), 42);
    }
}
