pub mod dump;
pub mod trace;

use crate::model::State;

/// Side effects run around the main loop. `exec` sees the address and word
/// of the instruction that was just executed.
pub trait Hook {
    fn init(&mut self, state: State) -> State;
    fn exec(&mut self, time: u64, addr: u16, code: u16, state: State) -> State;
}
