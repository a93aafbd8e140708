use std::convert::TryFrom;
use std::io::{BufRead, Write};

use crate::bits;
use crate::enums::{Opcode, SpecialRegister};
use crate::layout::InstructionLayout;
use crate::machine::{ExitCode, RuntimeError};
use crate::memory::MemoryPool;

pub enum TickResult {
    Next,
    Stop(ExitCode),
}

/// Dispatches one decoded instruction. The source operand arrives fully
/// resolved (a value or an address depending on the opcode class), the
/// destination is already a pool key.
pub fn execute<R: BufRead, W: Write>(
    opcode: Opcode,
    pool: &mut MemoryPool,
    layout: &InstructionLayout,
    registers: i64,
    source: i64,
    destination: i64,
    input: &mut R,
    output: &mut W,
) -> Result<TickResult, RuntimeError> {
    match opcode {
        Opcode::HLT => return Ok(TickResult::Stop(ExitCode::Halted)),

        Opcode::NOP => {}

        Opcode::ADD => accumulate(pool, layout, destination, |value| value + source)?,

        Opcode::SUB => accumulate(pool, layout, destination, |value| value - source)?,

        Opcode::STA => {
            let raw = cell(pool, destination)?.to_string();
            store(pool, source, raw)?;
        }

        Opcode::LDA => store(pool, destination, bits::signed(source, layout.word_bits))?,

        Opcode::BRA => branch(pool, layout, registers, source)?,

        Opcode::BRZ => {
            if bits::read_signed(cell(pool, destination)?) == 0 {
                branch(pool, layout, registers, source)?;
            }
        }

        Opcode::BRP => {
            if bits::read_signed(cell(pool, destination)?) >= 0 {
                branch(pool, layout, registers, source)?;
            }
        }

        Opcode::INP => inp(pool, layout, source, input)?,

        Opcode::OUT => writeln!(output, "{}", source).map_err(RuntimeError::Io)?,

        Opcode::OUTC => outc(output, source)?,

        // OUTB operates on the raw bit string and is resolved and written
        // before dispatch ever reaches this table.
        Opcode::OUTB => unreachable!("OUTB is handled by the fetch loop"),

        Opcode::AND => accumulate(pool, layout, destination, |value| value & source)?,

        Opcode::OR => accumulate(pool, layout, destination, |value| value | source)?,

        Opcode::XOR => accumulate(pool, layout, destination, |value| value ^ source)?,

        // Unlike the other bitwise operations NOT ignores the destination
        // value and stores the raw inverted pattern.
        Opcode::NOT => store(pool, destination, bits::unsigned(!source, layout.word_bits))?,

        Opcode::LSL => shift_with_flags(
            pool,
            layout,
            registers,
            source,
            destination,
            bits::logical_shift_left,
        )?,

        Opcode::LSR => shift_with_flags(
            pool,
            layout,
            registers,
            source,
            destination,
            bits::logical_shift_right,
        )?,

        Opcode::ASL => shift_with_flags(
            pool,
            layout,
            registers,
            source,
            destination,
            bits::arithmetic_shift_left,
        )?,

        Opcode::ASR => shift_with_flags(
            pool,
            layout,
            registers,
            source,
            destination,
            bits::arithmetic_shift_right,
        )?,

        Opcode::CSL => circular(pool, source, destination, bits::circular_shift_left)?,

        Opcode::CSR => circular(pool, source, destination, bits::circular_shift_right)?,

        Opcode::CSLC => shift_through_carry(
            pool,
            layout,
            registers,
            source,
            destination,
            bits::circular_shift_left_with_carry,
        )?,

        Opcode::CSRC => shift_through_carry(
            pool,
            layout,
            registers,
            source,
            destination,
            bits::circular_shift_right_with_carry,
        )?,

        Opcode::CALL => {
            let pc_key = SpecialRegister::PC.key(registers);
            let return_address = cell(pool, pc_key)?.to_string();
            store(pool, SpecialRegister::RR.key(registers), return_address)?;
            store(pool, pc_key, bits::signed(source, layout.word_bits))?;
        }

        Opcode::RET => {
            let return_address = cell(pool, SpecialRegister::RR.key(registers))?.to_string();
            store(pool, SpecialRegister::PC.key(registers), return_address)?;
        }
    }

    Ok(TickResult::Next)
}

pub fn outb<W: Write>(output: &mut W, raw: &str) -> Result<(), RuntimeError> {
    writeln!(output, "{}", raw).map_err(RuntimeError::Io)
}

fn cell(pool: &MemoryPool, key: i64) -> Result<&str, RuntimeError> {
    pool.get(key).ok_or(RuntimeError::OutOfRangeAccess(key))
}

fn store(pool: &mut MemoryPool, key: i64, value: String) -> Result<(), RuntimeError> {
    if pool.set(key, value) {
        Ok(())
    } else {
        Err(RuntimeError::OutOfRangeAccess(key))
    }
}

fn accumulate<F>(
    pool: &mut MemoryPool,
    layout: &InstructionLayout,
    destination: i64,
    operation: F,
) -> Result<(), RuntimeError>
where
    F: FnOnce(i64) -> i64,
{
    let value = operation(bits::read_signed(cell(pool, destination)?));
    store(pool, destination, bits::signed(value, layout.word_bits))
}

fn branch(
    pool: &mut MemoryPool,
    layout: &InstructionLayout,
    registers: i64,
    target: i64,
) -> Result<(), RuntimeError> {
    store(
        pool,
        SpecialRegister::PC.key(registers),
        bits::signed(target, layout.word_bits),
    )
}

// The resolved source operand names the cell input lands in.
fn inp<R: BufRead>(
    pool: &mut MemoryPool,
    layout: &InstructionLayout,
    target: i64,
    input: &mut R,
) -> Result<(), RuntimeError> {
    let mut line = String::new();
    input.read_line(&mut line).map_err(RuntimeError::Io)?;

    let value: i64 = line
        .trim()
        .parse()
        .map_err(|_| RuntimeError::InvalidInput(line.trim().to_string()))?;

    store(pool, target, bits::signed(value, layout.word_bits))
}

fn outc<W: Write>(output: &mut W, value: i64) -> Result<(), RuntimeError> {
    let character = u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .ok_or(RuntimeError::InvalidCharacter(value))?;

    write!(output, "{}", character).map_err(RuntimeError::Io)
}

fn last_bit(raw: &str) -> char {
    raw.as_bytes()[raw.len() - 1] as char
}

// The flags cell keeps the full instruction width; the carry sits in its
// least significant bit.
fn carry_cell(carry: char, word_bits: u32) -> String {
    let mut cell = "0".repeat(word_bits as usize - 1);
    cell.push(carry);
    cell
}

fn shift_with_flags(
    pool: &mut MemoryPool,
    layout: &InstructionLayout,
    registers: i64,
    count: i64,
    destination: i64,
    shift: fn(&str) -> (char, String),
) -> Result<(), RuntimeError> {
    let flags_key = SpecialRegister::FR.key(registers);
    let mut carry = last_bit(cell(pool, flags_key)?);
    let mut value = cell(pool, destination)?.to_string();

    for _ in 0..count.max(0) {
        let (shifted_out, shifted) = shift(&value);
        carry = shifted_out;
        value = shifted;
    }

    store(pool, flags_key, carry_cell(carry, layout.word_bits))?;
    store(pool, destination, value)
}

fn shift_through_carry(
    pool: &mut MemoryPool,
    layout: &InstructionLayout,
    registers: i64,
    count: i64,
    destination: i64,
    shift: fn(&str, char) -> (char, String),
) -> Result<(), RuntimeError> {
    let flags_key = SpecialRegister::FR.key(registers);
    let mut carry = last_bit(cell(pool, flags_key)?);
    let mut value = cell(pool, destination)?.to_string();

    for _ in 0..count.max(0) {
        let (shifted_out, shifted) = shift(&value, carry);
        carry = shifted_out;
        value = shifted;
    }

    store(pool, flags_key, carry_cell(carry, layout.word_bits))?;
    store(pool, destination, value)
}

fn circular(
    pool: &mut MemoryPool,
    count: i64,
    destination: i64,
    shift: fn(&str) -> String,
) -> Result<(), RuntimeError> {
    let mut value = cell(pool, destination)?.to_string();

    for _ in 0..count.max(0) {
        value = shift(&value);
    }

    store(pool, destination, value)
}
