use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

use crate::model::{Error, State};

use super::Hook;

/// Prints registers and memory cells when execution reaches configured
/// addresses.
///
/// ```yaml
/// 8:              # after executing the word at 0x008
///   mem: [14, 4095]
/// ```
#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct List(HashMap<u16, Config>);

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    mem: Vec<u16>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, Error> {
        match file {
            Some(fname) => {
                let yaml = fs::read_to_string(&fname)
                    .map_err(|e| Error::FileOpen(fname.clone(), e))?;
                let list = Dump::parse(&yaml, &fname)?;
                Ok(Self {
                    file: Some(fname),
                    list,
                    all,
                })
            }
            None => Ok(Self {
                file,
                list: List::default(),
                all,
            }),
        }
    }

    fn parse(yaml: &str, fname: &str) -> Result<List, Error> {
        serde_yaml::from_str(yaml).map_err(|e| Error::DumpConfig(fname.to_string(), e))
    }

    pub fn get(&self, pc: u16) -> Option<&Config> {
        self.list.0.get(&pc)
    }
}

impl Hook for Dump {
    fn init(&mut self, state: State) -> State {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.0.len(), fname);
        }
        state
    }

    fn exec(&mut self, _time: u64, addr: u16, _code: u16, cpu: State) -> State {
        if let Some(cfg) = self.get(addr) {
            print!("{}", Dump::format_reg(&cpu));
            print!("{}", Dump::format_mem(&cpu, &cfg.mem));
        } else if self.all {
            print!("{}", Dump::format_reg(&cpu));
        }
        cpu
    }
}

impl Dump {
    fn format_reg(cpu: &State) -> String {
        format!(
            " +------------+----------+\n | acc:  {:0>4X} | pc: {:0>3X}  |\n +------------+----------+\n",
            cpu.acc(),
            cpu.pc()
        )
    }

    fn format_mem(cpu: &State, addrs: &[u16]) -> String {
        let mut out = String::new();
        for addr in addrs {
            out.push_str(&format!(" | {:0>3X} : {:0>4X}          |\n", addr, cpu.get(*addr)));
        }
        if !addrs.is_empty() {
            out.push_str(" +-----------------------+\n");
        }
        out
    }
}
