//! Virtual machine for the Chadsembly instruction set.
//!
//! The machine executes images produced by the [chasm](../chasm/index.html)
//! assembler: a sequence of fixed-width binary strings whose field widths
//! are computed from the machine configuration (see
//! [`InstructionLayout`](struct.InstructionLayout.html)). Memory cells and
//! registers share one pool keyed by integers, registers sitting at the
//! negative keys, so an operand resolves to either with the same machinery.
//!
//! A [`Machine`](struct.Machine.html) is built from a layout, a register
//! count, a clock delay and the two streams the guest program performs I/O
//! on; [`Machine::load`](struct.Machine.html#method.load) places an image
//! at address zero and [`Machine::run`](struct.Machine.html#method.run)
//! drives the fetch-decode-execute loop until the program halts, walks off
//! the end of memory, or trips a runtime error.

pub mod bits;
pub mod constants;

mod enums;
mod layout;
mod machine;
mod memory;
mod operations;

pub use crate::enums::{AddressingMode, Opcode, SpecialRegister};
pub use crate::layout::InstructionLayout;
pub use crate::machine::{ExitCode, Machine, RuntimeError};
pub use crate::memory::MemoryPool;
