use num_derive::{FromPrimitive, ToPrimitive};

// Instruction Format
//
//          +-----------+-----------------+----------+---------------+
//          | M bits    | A bits          | O bits   | O bits        |
//          +-----------+-----------------+----------+---------------+
//          | operation | addressing mode | source   | destination   |
//          +-----------+-----------------+----------+---------------+
//
// The widths M, A and O are computed from the machine configuration, see
// `InstructionLayout`. Both operand fields are signed; the addressing mode
// describes the source operand only, destinations are always registers.

#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum Opcode {
    //   Mnemonic | Operands | Effect
    //------------+----------+---------------------------------------------------
    HLT,  //      | 0        | Suspend execution of the program
    ADD,  //      | 2        | dst = dst + src
    SUB,  //      | 2        | dst = dst - src
    STA,  //      | 2        | MEM[src] = dst (raw bit copy)
    NOP,  //      | 0        | Exhaust one clock cycle
    LDA,  //      | 2        | dst = src
    BRA,  //      | 2        | PC = src
    BRZ,  //      | 2        | PC = src if dst == 0
    BRP,  //      | 2        | PC = src if dst >= 0
    INP,  //      | 1        | src = integer read from the input stream
    OUT,  //      | 1        | Write src as a decimal integer
    OUTC, //      | 1        | Write src as a character
    OUTB, //      | 1        | Write the raw bit string of src
    AND,  //      | 2        | dst = dst & src
    OR,   //      | 2        | dst = dst | src
    NOT,  //      | 2        | dst = ~src
    XOR,  //      | 2        | dst = dst ^ src
    LSL,  //      | 2        | Logical shift left dst, src times
    LSR,  //      | 2        | Logical shift right dst, src times
    ASL,  //      | 2        | Arithmetic shift left dst, src times
    ASR,  //      | 2        | Arithmetic shift right dst, src times
    CSL,  //      | 2        | Circular shift left dst, src times
    CSR,  //      | 2        | Circular shift right dst, src times
    CSLC, //      | 2        | Circular shift left through the carry, src times
    CSRC, //      | 2        | Circular shift right through the carry, src times
    CALL, //      | 1        | RR = PC; PC = src
    RET,  //      | 0        | PC = RR
}

impl Opcode {
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        use self::Opcode::*;

        Some(match mnemonic {
            "HLT" => HLT,
            "ADD" => ADD,
            "SUB" => SUB,
            "STA" => STA,
            "NOP" => NOP,
            "LDA" => LDA,
            "BRA" => BRA,
            "BRZ" => BRZ,
            "BRP" => BRP,
            "INP" => INP,
            "OUT" => OUT,
            "OUTC" => OUTC,
            "OUTB" => OUTB,
            "AND" => AND,
            "OR" => OR,
            "NOT" => NOT,
            "XOR" => XOR,
            "LSL" => LSL,
            "LSR" => LSR,
            "ASL" => ASL,
            "ASR" => ASR,
            "CSL" => CSL,
            "CSR" => CSR,
            "CSLC" => CSLC,
            "CSRC" => CSRC,
            "CALL" => CALL,
            "RET" => RET,
            _ => return None,
        })
    }

    pub fn mnemonic(self) -> &'static str {
        use self::Opcode::*;

        match self {
            HLT => "HLT",
            ADD => "ADD",
            SUB => "SUB",
            STA => "STA",
            NOP => "NOP",
            LDA => "LDA",
            BRA => "BRA",
            BRZ => "BRZ",
            BRP => "BRP",
            INP => "INP",
            OUT => "OUT",
            OUTC => "OUTC",
            OUTB => "OUTB",
            AND => "AND",
            OR => "OR",
            NOT => "NOT",
            XOR => "XOR",
            LSL => "LSL",
            LSR => "LSR",
            ASL => "ASL",
            ASR => "ASR",
            CSL => "CSL",
            CSR => "CSR",
            CSLC => "CSLC",
            CSRC => "CSRC",
            CALL => "CALL",
            RET => "RET",
        }
    }

    /// The number of operands the instruction accepts at most. Missing
    /// operands are filled in with the accumulator during analysis.
    pub fn operand_count(self) -> usize {
        use self::Opcode::*;

        match self {
            HLT | NOP | RET => 0,
            INP | OUT | OUTC | OUTB | CALL => 1,
            _ => 2,
        }
    }

    /// Data transfer instructions. Their source operand names an address,
    /// so it may not be in immediate mode.
    pub fn is_data_flow(self) -> bool {
        matches!(self, Opcode::STA | Opcode::INP)
    }

    /// Program-counter manipulating instructions branching to a label.
    pub fn is_branch(self) -> bool {
        matches!(self, Opcode::BRA | Opcode::BRZ | Opcode::BRP)
    }

    pub fn is_call(self) -> bool {
        matches!(self, Opcode::CALL)
    }

    /// Single-operand instructions whose operand must be written out; all
    /// other single-operand instructions default to the accumulator.
    pub fn requires_explicit_operand(self) -> bool {
        matches!(self, Opcode::CALL)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum AddressingMode {
    REGISTER,  // %  The operand names a register
    INDIRECT,  // >  The operand is an address holding the address of the value
    DIRECT,    // @  The operand is the address of the value
    IMMEDIATE, // #  The operand is the value itself
}

impl AddressingMode {
    pub fn symbol(self) -> char {
        match self {
            AddressingMode::REGISTER => '%',
            AddressingMode::INDIRECT => '>',
            AddressingMode::DIRECT => '@',
            AddressingMode::IMMEDIATE => '#',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<AddressingMode> {
        Some(match symbol {
            '%' => AddressingMode::REGISTER,
            '>' => AddressingMode::INDIRECT,
            '@' => AddressingMode::DIRECT,
            '#' => AddressingMode::IMMEDIATE,
            _ => return None,
        })
    }

    /// Resolves both the keyword aliases and the single-character symbols.
    pub fn from_keyword(keyword: &str) -> Option<AddressingMode> {
        match keyword {
            "REGISTER" => Some(AddressingMode::REGISTER),
            "INDIRECT" => Some(AddressingMode::INDIRECT),
            "DIRECT" => Some(AddressingMode::DIRECT),
            "IMMEDIATE" => Some(AddressingMode::IMMEDIATE),
            _ => {
                let mut symbols = keyword.chars();
                match (symbols.next(), symbols.next()) {
                    (Some(symbol), None) => AddressingMode::from_symbol(symbol),
                    _ => None,
                }
            }
        }
    }
}

/// Special purpose registers live behind the general purpose bank: with G
/// general registers, special register `offset` is pool key `-(G + offset)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpecialRegister {
    ACC, // Accumulator, the default operand register
    PC,  // Program counter
    RR,  // Return register, holds the address CALL should return to
    FR,  // Flags register, holds the carry bit of shift instructions
}

impl SpecialRegister {
    /// Offset behind the general purpose bank, starting from 1 so no
    /// special register overlaps a general purpose one.
    pub fn offset(self) -> i64 {
        match self {
            SpecialRegister::ACC => 1,
            SpecialRegister::PC => 2,
            SpecialRegister::RR => 3,
            SpecialRegister::FR => 4,
        }
    }

    /// The pool key of the register on a machine with `registers` general
    /// purpose registers.
    pub fn key(self, registers: i64) -> i64 {
        -(registers + self.offset())
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialRegister::ACC => "ACC",
            SpecialRegister::PC => "PC",
            SpecialRegister::RR => "RR",
            SpecialRegister::FR => "FR",
        }
    }

    /// Resolves both the short names and the long-form aliases.
    pub fn from_name(name: &str) -> Option<SpecialRegister> {
        Some(match name {
            "ACC" | "ACCUMULATOR" => SpecialRegister::ACC,
            "PC" | "PROGRAMCOUNTER" => SpecialRegister::PC,
            "RR" | "RETURNREGISTER" => SpecialRegister::RR,
            "FR" | "FLAGSREGISTER" => SpecialRegister::FR,
            _ => return None,
        })
    }
}

macro_rules! impl_enum_display {
    ($e:ty) => {
        impl std::fmt::Display for $e {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                std::fmt::Debug::fmt(self, f)
            }
        }
    };
}

impl_enum_display!(Opcode);
impl_enum_display!(AddressingMode);
impl_enum_display!(SpecialRegister);
