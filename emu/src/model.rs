use std::fs::File;
use std::io::Read;

use arch::alu::{alu, taken};
use arch::mem::MEM_SIZE;
use arch::op::{Op, Opcode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("ROM has an odd number of bytes ({0})")]
    OddLength(usize),

    #[error("ROM has {0} words, more than the {} addressable", MEM_SIZE)]
    RomTooLarge(usize),

    #[error("Undefined opcode in word 0x{word:04X} at 0x{pc:04X}")]
    UndefinedOpcode { pc: u16, word: u16 },

    #[error("Failed to read dump config: {0}")]
    DumpConfig(String, #[source] serde_yaml::Error),
}

/// Machine state: one flat word memory holding code and data, the
/// accumulator and the program counter.
#[derive(Debug, Clone)]
pub struct State {
    mem: Vec<u16>,
    acc: u16,
    pc: u16,
    halted: bool,
}

impl Default for State {
    fn default() -> Self {
        State::new()
    }
}

// Memory access
impl State {
    pub fn get(&self, addr: u16) -> u16 {
        self.mem[addr as usize % MEM_SIZE]
    }

    pub fn set(&mut self, addr: u16, val: u16) {
        self.mem[addr as usize % MEM_SIZE] = val;
    }

    pub fn acc(&self) -> u16 {
        self.acc
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    fn inc_pc(&mut self) {
        self.pc = ((self.pc as usize + 1) % MEM_SIZE) as u16;
    }
}

impl State {
    pub fn new() -> Self {
        State {
            mem: vec![0; MEM_SIZE],
            acc: 0,
            pc: 0,
            halted: false,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.halted
    }

    /// Place `words` at address 0.
    pub fn load(&mut self, words: &[u16]) -> Result<(), Error> {
        if words.len() > MEM_SIZE {
            return Err(Error::RomTooLarge(words.len()));
        }
        self.mem[..words.len()].copy_from_slice(words);
        Ok(())
    }

    /// Little-endian 16-bit words, as the assembler writes them.
    pub fn load_rom_file(&mut self, fname: &str) -> Result<usize, Error> {
        let mut buf = vec![];
        File::open(fname)
            .and_then(|mut file| file.read_to_end(&mut buf))
            .map_err(|e| Error::FileOpen(fname.to_string(), e))?;
        if buf.len() % 2 != 0 {
            return Err(Error::OddLength(buf.len()));
        }
        let words: Vec<u16> = buf
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect();
        self.load(&words)?;
        log::debug!("loaded {} words from {}", words.len(), fname);
        Ok(words.len())
    }

    /// Execute one instruction. Returns the address and the word executed.
    pub fn exec(&mut self) -> Result<(u16, u16), Error> {
        let pc = self.pc;
        let word = self.get(pc);
        let op = Op::from_bin(word).map_err(|_| Error::UndefinedOpcode { pc, word })?;

        match op.opcode {
            Opcode::LDA => {
                self.acc = self.get(op.operand);
                self.inc_pc();
            }
            Opcode::STO => {
                self.set(op.operand, self.acc);
                self.inc_pc();
            }
            Opcode::ADD | Opcode::SUB => {
                let val = self.get(op.operand);
                self.acc = alu(op.opcode, self.acc, val).unwrap_or(self.acc);
                self.inc_pc();
            }
            Opcode::JMP | Opcode::JGE | Opcode::JNE => {
                if taken(op.opcode, self.acc) {
                    self.pc = op.operand;
                } else {
                    self.inc_pc();
                }
            }
            Opcode::STP => self.halted = true,
        }
        log::trace!("0x{:04X}: {:04X} acc={:04X}", pc, word, self.acc);
        Ok((pc, word))
    }

    /// Step until halt or `limit` steps. Returns the number of steps taken.
    pub fn run(&mut self, limit: u64) -> Result<u64, Error> {
        let mut time = 0;
        while time < limit && !self.halted {
            self.exec()?;
            time += 1;
        }
        Ok(time)
    }
}
