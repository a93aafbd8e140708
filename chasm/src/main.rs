#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug)]
enum IOErrorContext {
    ReadInput,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Compile(chasm::ErrorReport),
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => writeln!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
            Error::Compile(report) => write!(f, "{}", report),
        }
    }
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the Chadsembly source file to assemble")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OPTION")
                .help("Configuration options as OPTION=VALUE pairs")
                .multiple(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Sets the image file to write to"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("output");
    let options: Vec<String> = matches
        .values_of("OPTION")
        .map(|values| values.map(str::to_string).collect())
        .unwrap_or_default();

    if let Err(err) = chasm_main(input, output, &options) {
        eprint!("{}", err);
        process::exit(1);
    }
}

fn chasm_main(input: &str, output: Option<&str>, options: &[String]) -> Result<(), Error> {
    let input_path = Path::new(input);

    let input_file = File::open(input_path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, input_path.to_owned()))?;
    let mut reader = BufReader::new(input_file);
    let mut source = String::new();

    reader
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, input_path.to_owned()))?;

    let program = chasm::assemble(&source, options).map_err(Error::Compile)?;

    let output_path: PathBuf = output
        .map(PathBuf::from)
        .unwrap_or_else(|| input_path.with_extension("chex"));

    chexfile::write_file(&output_path, &program)
        .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, output_path))?;

    Ok(())
}
