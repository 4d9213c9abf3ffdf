use std::process::ExitCode;

use a16emu::hooks::{dump::Dump, trace::Trace, Hook};
use a16emu::State;
use clap::Parser;
use color_print::cprintln;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Emulator for the A16 accumulator machine")]
struct Args {
    /// Maximum number of steps
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    /// YAML file listing addresses to dump at
    #[arg(short, long)]
    dump_cfg: Option<String>,

    /// Dump registers after every step
    #[arg(short = 'a', long)]
    dump_all: bool,

    /// Do not trace executed instructions
    #[arg(short, long)]
    quiet: bool,

    #[arg(default_value = "a.out")]
    input_file: String,
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().filter_or("A16_LOG", "warn");
    env_logger::init_from_env(env);

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cprintln!("<red,bold>error</>: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    println!("A16 Emulator");

    println!("+-----------------------------------------------+");
    println!("| Emulate: {:<36} |", args.input_file);
    if let Some(fname) = &args.dump_cfg {
        println!("|  - Dump: {:<36} |", fname);
    }
    if args.dump_all {
        println!("|  - Dump: {:<36} |", "All");
    }
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Initialize state machine model
    let mut state = State::new();
    let words = state.load_rom_file(&args.input_file)?;
    println!("[LOAD] {} words", words);

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let mut hooks: Vec<Box<dyn Hook>> = vec![
        Box::new(Trace::new(args.quiet)),
        Box::new(Dump::arg(args.dump_cfg, args.dump_all)?),
    ];
    state = hooks.iter_mut().fold(state, |state, hook| hook.init(state));

    // ------------------------------------------------------------------------
    // Main loop
    let mut steps = 0;
    for time in 0..args.tmax.unwrap_or(u64::MAX) {
        let (addr, code) = state.exec()?;
        state = hooks
            .iter_mut()
            .fold(state, |state, hook| hook.exec(time, addr, code, state));
        steps = time + 1;
        if state.is_terminated() {
            break;
        }
    }

    println!("=================================================");
    if state.is_terminated() {
        println!("Halted at 0x{:03X} after {} steps, acc: 0x{:04X}", state.pc(), steps, state.acc());
    } else {
        cprintln!("<yellow,bold>Step limit</> reached at 0x{:03X}, acc: 0x{:04X}", state.pc(), state.acc());
    }
    Ok(())
}
