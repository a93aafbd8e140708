#[macro_use]
extern crate clap;

use clap::Arg;
use std::io;
use std::path::PathBuf;
use std::process;

use chadvm::{ExitCode, InstructionLayout, Machine, RuntimeError};

#[derive(Debug)]
enum Error {
    Io(io::Error, PathBuf),
    Runtime(RuntimeError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, path) => {
                writeln!(f, "Reading image \"{}\" failed: {}", path.display(), err)
            }
            Error::Runtime(err) => writeln!(f, "Runtime Error: {}", err),
        }
    }
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("IMAGE")
                .help("Sets the assembled image file to execute")
                .required(true)
                .index(1),
        )
        .get_matches();

    let image = matches.value_of("IMAGE").unwrap();

    match chadvm_run(image) {
        Ok(_) => {}
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    }
}

fn chadvm_run(image: &str) -> Result<ExitCode, Error> {
    let program =
        chexfile::read_file(image).map_err(|err| Error::Io(err, PathBuf::from(image)))?;

    let layout = InstructionLayout {
        operation_bits: program.operation_bits(),
        mode_bits: program.mode_bits(),
        operand_bits: program.operand_bits(),
        word_bits: program.word_bits(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut machine = Machine::new(
        layout,
        i64::from(program.registers()),
        u64::from(program.clock()),
        stdin.lock(),
        stdout.lock(),
    );

    machine.load(program.cells()).map_err(Error::Runtime)?;
    machine.run().map_err(Error::Runtime)
}
