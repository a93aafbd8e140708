//! Assembler for the [chadvm](../chadvm/index.html) virtual machine.
//!
//! The main function provided by this crate is
//! [`assemble`](fn.assemble.html), which takes Chadsembly source text plus
//! any command-line configuration options and produces the executable
//! image as a [`Program`](../chexfile/struct.Program.html) from the
//! [chexfile](../chexfile/index.html) crate.
//!
//! Compilation is a fixed pipeline. Configuration options are gathered
//! from defaults, the caller's arguments and in-source `!OPTION=VALUE`
//! directives; the lexer turns the stripped source into a typed token
//! stream; the parser checks statement syntax, splits the stream into one
//! instruction pool per procedure and classifies the labels; the semantic
//! analyzer fills in implicit operands and enforces the per-instruction
//! operand rules; the code generator lays everything out in one address
//! space and emits fixed-width binary cells.
//!
//! Each stage accumulates every error it can find and the pipeline stops
//! at the first stage that recorded any, returning them as one
//! [`ErrorReport`](struct.ErrorReport.html).

mod codegen;
mod config;
mod defaults;
mod error;
mod lexer;
mod parser;
mod pool;
mod position;
mod preprocess;
mod semantics;
mod token;

pub use crate::config::{Config, ConfigSource};
pub use crate::error::{ErrorReport, Locus, SourceError};
pub use crate::position::Position;

use chexfile::Program;

pub fn assemble(source: &str, arguments: &[String]) -> Result<Program, ErrorReport> {
    let mut config = Config::default();
    config::process_arguments(&mut config, arguments)?;

    let (source, directives) = preprocess::strip_directives(source);
    config::process_directives(&mut config, &directives)?;

    let tokens = lexer::lex(&source)?;
    log::debug!("lexed {} tokens", tokens.len());

    let (procedures, global) = parser::parse(tokens)?;
    log::debug!("split source into {} procedure pool(s)", procedures.len());

    let (mut procedures, mut global) = semantics::analyse(procedures, global)?;

    let (cells, layout) = codegen::generate(&mut procedures, &mut global, &config);
    log::debug!("emitted {} cells of {} bits each", cells.len(), layout.word_bits);

    Ok(Program::from(
        layout.operation_bits,
        layout.mode_bits,
        layout.operand_bits,
        layout.word_bits,
        config.registers() as u32,
        config.clock() as u32,
        cells,
    ))
}
