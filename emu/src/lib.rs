//! Reference emulator for the A16 accumulator machine.

pub mod hooks;
pub mod model;

pub use model::{Error, State};
