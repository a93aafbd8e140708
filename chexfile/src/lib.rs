//! The `.chex` executable image container.
//!
//! An image is a sequence of fixed-width binary-string cells together with
//! the field widths a consumer needs to decode them, the general purpose
//! register count the image was assembled against, and the configured
//! clock delay. Cell 0 is the program entry point.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub type Endian = LittleEndian;

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    operation_bits: u32,
    mode_bits: u32,
    operand_bits: u32,
    word_bits: u32,
    registers: u32,
    clock: u32,
    cells: Vec<String>,
}

impl Program {
    pub fn from(
        operation_bits: u32,
        mode_bits: u32,
        operand_bits: u32,
        word_bits: u32,
        registers: u32,
        clock: u32,
        cells: Vec<String>,
    ) -> Program {
        Program {
            operation_bits,
            mode_bits,
            operand_bits,
            word_bits,
            registers,
            clock,
            cells,
        }
    }

    pub fn operation_bits(&self) -> u32 {
        self.operation_bits
    }

    pub fn mode_bits(&self) -> u32 {
        self.mode_bits
    }

    pub fn operand_bits(&self) -> u32 {
        self.operand_bits
    }

    pub fn word_bits(&self) -> u32 {
        self.word_bits
    }

    pub fn registers(&self) -> u32 {
        self.registers
    }

    pub fn clock(&self) -> u32 {
        self.clock
    }

    pub fn cells(&self) -> &[String] {
        &self.cells[..]
    }
}

pub fn read<R: Read>(reader: &mut R) -> io::Result<Program> {
    let operation_bits = reader.read_u32::<Endian>()?;
    let mode_bits = reader.read_u32::<Endian>()?;
    let operand_bits = reader.read_u32::<Endian>()?;
    let word_bits = reader.read_u32::<Endian>()?;
    let registers = reader.read_u32::<Endian>()?;
    let clock = reader.read_u32::<Endian>()?;
    let cell_count = reader.read_u32::<Endian>()?;

    let mut cells = Vec::with_capacity(cell_count as usize);

    for _ in 0..cell_count {
        let mut raw = vec![0u8; word_bits as usize];
        reader.read_exact(&mut raw)?;

        if raw.iter().any(|byte| *byte != b'0' && *byte != b'1') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "image cell contains a non-binary character",
            ));
        }

        cells.push(String::from_utf8(raw).expect("validated as ASCII"));
    }

    Ok(Program::from(
        operation_bits,
        mode_bits,
        operand_bits,
        word_bits,
        registers,
        clock,
        cells,
    ))
}

pub fn write<W: Write>(writer: &mut W, program: &Program) -> io::Result<()> {
    writer.write_u32::<Endian>(program.operation_bits)?;
    writer.write_u32::<Endian>(program.mode_bits)?;
    writer.write_u32::<Endian>(program.operand_bits)?;
    writer.write_u32::<Endian>(program.word_bits)?;
    writer.write_u32::<Endian>(program.registers)?;
    writer.write_u32::<Endian>(program.clock)?;
    writer.write_u32::<Endian>(program.cells.len() as u32)?;

    for cell in &program.cells {
        writer.write_all(cell.as_bytes())?;
    }

    Ok(())
}

pub trait ReadChexExt: Read + Sized {
    fn read_chex(&mut self) -> io::Result<Program> {
        read(self)
    }
}

impl<R: Read + Sized> ReadChexExt for R {}

pub trait WriteChexExt: Write + Sized {
    fn write_chex(&mut self, program: &Program) -> io::Result<()> {
        write(self, program)
    }
}

impl<W: Write + Sized> WriteChexExt for W {}

pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Program> {
    BufReader::new(File::open(path)?).read_chex()
}

pub fn write_file<P: AsRef<Path>>(path: P, program: &Program) -> io::Result<()> {
    BufWriter::new(File::create(path)?).write_chex(program)
}

#[cfg(test)]
mod test;
