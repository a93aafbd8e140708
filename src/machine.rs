use std::error::Error as StdError;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use num_traits::FromPrimitive;

use crate::bits;
use crate::enums::{AddressingMode, Opcode, SpecialRegister};
use crate::layout::InstructionLayout;
use crate::memory::MemoryPool;
use crate::operations::{self, TickResult};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExitCode {
    Halted,            // HLT instruction was executed (normal shutdown)
    OutOfInstructions, // Program counter walked off the end of memory
}

#[derive(Debug)]
pub enum RuntimeError {
    /// The assembled image does not fit into the memory pool.
    ProgramTooLarge { cells: usize, available: i64 },
    /// The decoded operation field is not in the instruction set.
    IllegalOpcode(i64),
    /// The decoded addressing mode field is not an addressing mode.
    IllegalAddressingMode(i64),
    /// A resolved address has no cell behind it.
    OutOfRangeAccess(i64),
    /// INP read something that is not a decimal integer.
    InvalidInput(String),
    /// OUTC was asked to print a value that is not a code point.
    InvalidCharacter(i64),
    Io(io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::ProgramTooLarge { cells, available } => write!(
                f,
                "cannot load all instructions and variables into memory - \
                 {} cells do not fit into a pool of {} locations",
                cells, available
            ),
            RuntimeError::IllegalOpcode(operation) => write!(
                f,
                "the opcode {} does not map to any machine operation - \
                 the program counter pointed to a non-instruction?",
                operation
            ),
            RuntimeError::IllegalAddressingMode(mode) => {
                write!(f, "the addressing mode opcode {} does not exist", mode)
            }
            RuntimeError::OutOfRangeAccess(key) => {
                write!(f, "access to address {} is outside the memory pool", key)
            }
            RuntimeError::InvalidInput(line) => {
                write!(f, "non-integer value passed in as input: `{}`", line)
            }
            RuntimeError::InvalidCharacter(value) => {
                write!(f, "the value {} is not a printable code point", value)
            }
            RuntimeError::Io(err) => write!(f, "stream error: {}", err),
        }
    }
}

impl StdError for RuntimeError {}

/// The virtual machine: a memory pool, the instruction layout it was
/// assembled against, and the two streams the program performs I/O on.
pub struct Machine<R, W> {
    layout: InstructionLayout,
    registers: i64,
    clock: u64,
    pool: MemoryPool,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Machine<R, W> {
    pub fn new(
        layout: InstructionLayout,
        registers: i64,
        clock: u64,
        input: R,
        output: W,
    ) -> Machine<R, W> {
        Machine {
            pool: MemoryPool::new(&layout, registers),
            layout,
            registers,
            clock,
            input,
            output,
        }
    }

    pub fn pool(&self) -> &MemoryPool {
        &self.pool
    }

    /// Takes the memory pool out of the machine, e.g. to inspect the final
    /// state after a run.
    pub fn into_pool(self) -> MemoryPool {
        self.pool
    }

    /// Copies the image into the memory pool, cell `i` of the image landing
    /// at address `i`.
    pub fn load(&mut self, cells: &[String]) -> Result<(), RuntimeError> {
        if cells.len() as i64 > self.pool.cell_count() {
            return Err(RuntimeError::ProgramTooLarge {
                cells: cells.len(),
                available: self.pool.cell_count(),
            });
        }

        for (address, cell) in cells.iter().enumerate() {
            self.write(address as i64, cell.clone())?;
        }

        log::debug!(
            "loaded {} cells into a pool of {} locations",
            cells.len(),
            self.pool.cell_count()
        );

        Ok(())
    }

    /// The fetch-decode-execute loop. Runs until a HLT, until the program
    /// counter leaves the memory pool, or until a runtime error.
    pub fn run(&mut self) -> Result<ExitCode, RuntimeError> {
        let pc_key = SpecialRegister::PC.key(self.registers);

        loop {
            let pc = bits::read_unsigned(self.read(pc_key)?);

            if pc >= self.pool.cell_count() {
                return Ok(ExitCode::OutOfInstructions);
            }

            if self.clock > 0 {
                thread::sleep(Duration::from_millis(self.clock));
            }

            match self.step(pc)? {
                TickResult::Next => {}
                TickResult::Stop(exit_code) => return Ok(exit_code),
            }
        }
    }

    /// Executes the instruction at `pc`. The program counter is advanced
    /// before any side effect, so a branch overwrites the incremented value
    /// rather than fighting with it.
    fn step(&mut self, pc: i64) -> Result<TickResult, RuntimeError> {
        let pc_key = SpecialRegister::PC.key(self.registers);
        let next = bits::read_signed(self.read(pc_key)?) + 1;
        self.write(pc_key, bits::signed(next, self.layout.word_bits))?;

        let cell = self.read(pc)?.to_string();

        // Slice the instruction left to right: operation, addressing mode,
        // source operand, destination operand.
        let operation_end = self.layout.operation_bits as usize;
        let mode_end = operation_end + self.layout.mode_bits as usize;
        let source_end = mode_end + self.layout.operand_bits as usize;
        let destination_end = source_end + self.layout.operand_bits as usize;

        let operation = bits::read_unsigned(&cell[..operation_end]);
        let mode = bits::read_unsigned(&cell[operation_end..mode_end]);
        let source = bits::read_signed(&cell[mode_end..source_end]);
        let destination = bits::read_signed(&cell[source_end..destination_end]);

        let opcode =
            Opcode::from_i64(operation).ok_or(RuntimeError::IllegalOpcode(operation))?;
        let mode =
            AddressingMode::from_i64(mode).ok_or(RuntimeError::IllegalAddressingMode(mode))?;

        if opcode == Opcode::OUTB {
            let raw = self.resolve_for_binary(mode, source)?;
            operations::outb(&mut self.output, &raw)?;
            return Ok(TickResult::Next);
        }

        let source = self.resolve_source(opcode, mode, source)?;
        let destination = -destination;

        operations::execute(
            opcode,
            &mut self.pool,
            &self.layout,
            self.registers,
            source,
            destination,
            &mut self.input,
            &mut self.output,
        )
    }

    /// Instructions that treat their source as an address resolve it one
    /// way, everything else resolves down to the stored value.
    fn resolve_source(
        &self,
        opcode: Opcode,
        mode: AddressingMode,
        operand: i64,
    ) -> Result<i64, RuntimeError> {
        if opcode.is_data_flow() || opcode.is_branch() || opcode.is_call() {
            self.resolve_for_address(mode, operand)
        } else {
            self.resolve_for_value(mode, operand)
        }
    }

    fn resolve_for_address(
        &self,
        mode: AddressingMode,
        operand: i64,
    ) -> Result<i64, RuntimeError> {
        Ok(match mode {
            AddressingMode::INDIRECT => bits::read_signed(self.read(operand)?),
            AddressingMode::REGISTER => -operand,
            // An immediate source on a data transfer instruction is rejected
            // during analysis; decoding one anyway behaves like direct mode.
            AddressingMode::DIRECT | AddressingMode::IMMEDIATE => operand,
        })
    }

    fn resolve_for_value(&self, mode: AddressingMode, operand: i64) -> Result<i64, RuntimeError> {
        Ok(match mode {
            AddressingMode::DIRECT => bits::read_signed(self.read(operand)?),
            AddressingMode::INDIRECT => {
                bits::read_signed(self.read(bits::read_signed(self.read(operand)?))?)
            }
            AddressingMode::REGISTER => bits::read_signed(self.read(-operand)?),
            AddressingMode::IMMEDIATE => operand,
        })
    }

    fn resolve_for_binary(
        &self,
        mode: AddressingMode,
        operand: i64,
    ) -> Result<String, RuntimeError> {
        Ok(match mode {
            AddressingMode::DIRECT => self.read(operand)?.to_string(),
            AddressingMode::INDIRECT => self
                .read(bits::read_signed(self.read(operand)?))?
                .to_string(),
            AddressingMode::REGISTER => self.read(-operand)?.to_string(),
            AddressingMode::IMMEDIATE => bits::signed(operand, self.layout.word_bits),
        })
    }

    fn read(&self, key: i64) -> Result<&str, RuntimeError> {
        self.pool.get(key).ok_or(RuntimeError::OutOfRangeAccess(key))
    }

    fn write(&mut self, key: i64, value: String) -> Result<(), RuntimeError> {
        if self.pool.set(key, value) {
            Ok(())
        } else {
            Err(RuntimeError::OutOfRangeAccess(key))
        }
    }
}
