use std::{
    fs::{self, File},
    io::BufWriter,
    process::ExitCode,
};

use a16asm::{emit, Error};
use clap::Parser;
use color_print::{cformat, cprintln};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    input: String,

    /// Output file
    #[clap(short, long, default_value = "a.out")]
    output: String,

    /// Write a listing of the lowered program
    #[clap(short, long)]
    listing: Option<String>,

    /// Dump assembly code
    #[clap(short, long)]
    dump: bool,
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().filter_or("A16_LOG", "warn");
    env_logger::init_from_env(env);

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            cprintln!("<red,bold>error</>: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` when the source has errors.
fn run(args: &Args) -> anyhow::Result<bool> {
    println!("A16 Assembler");

    println!("1. Read File");
    println!("  < {}", args.input);
    let src = a16asm::read_source(&args.input)?;

    println!("2. Parse, Collect Symbols & Generate Binary");
    let asm = match a16asm::assemble(&src) {
        Ok(asm) => asm,
        Err(msgs) => {
            msgs.dump(&args.input, &src);
            cprintln!(
                "<red,bold>Failed</>: {} error(s)",
                msgs.errors().count()
            );
            return Ok(false);
        }
    };
    asm.msgs.dump(&args.input, &src);
    println!(
        "  - {} words, {} data, {} labels",
        asm.words.len(),
        asm.idents.data_len(),
        asm.idents.labels_len()
    );

    println!("3. Write Binary");
    println!("  > {}", args.output);
    let file = File::create(&args.output).map_err(|e| Error::FileCreate(args.output.clone(), e))?;
    emit::write_bin(&mut BufWriter::new(file), &asm.words)
        .map_err(|e| Error::FileWrite(args.output.clone(), e))?;

    if let Some(path) = &args.listing {
        println!("  > {}", path);
        fs::write(path, asm.listing()).map_err(|e| Error::FileWrite(path.clone(), e))?;
    }

    if args.dump {
        print!("{}", asm.dump());
    }

    println!("{}", cformat!("<green,bold>Done</>"));
    Ok(true)
}
