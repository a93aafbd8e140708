use std::collections::BTreeMap;

use matches::debug_assert_matches;
use num_traits::ToPrimitive;

use chadvm::{bits, AddressingMode, InstructionLayout, Opcode, SpecialRegister};

use crate::config::Config;
use crate::pool::{InstructionPool, SymbolKind, SymbolTable};
use crate::position::Position;
use crate::token::{Operand, Token, TokenKind};

/// Lays out every pool in one linear address space and emits the binary
/// image.
///
/// Layout runs in two passes over a fixed pool order (global first, then
/// the procedures in declaration order): pass A assigns every procedure
/// and branch label its absolute instruction index, pass B assigns every
/// variable its cell and records a promise to initialize it. Emission then
/// walks the same order, and the promises overwrite the variable cells at
/// the end.
pub fn generate(
    procedures: &mut [InstructionPool],
    global: &mut InstructionPool,
    config: &Config,
) -> (Vec<String>, InstructionLayout) {
    let layout = InstructionLayout::new(config.memory(), config.registers());
    let registers = config.registers();
    let mut promises: BTreeMap<i64, i64> = BTreeMap::new();

    // Pass A: absolute addresses for procedures and their branch labels.
    let mut offset = count_instructions(global) + count_variables(global);

    for pool in procedures.iter_mut() {
        for entry in pool.symbols.entries_mut() {
            if entry.kind == SymbolKind::Branch {
                entry.value += offset;
            }
        }

        global
            .symbols
            .get_mut(&pool.identifier)
            .expect("every procedure has a global entry")
            .value = offset;

        offset += count_instructions(pool) + count_variables(pool);
    }

    // Pass B: cells for the variables, promises for their initializers.
    let mut offset = place_variables(global, 0, &mut promises);
    for pool in procedures.iter_mut() {
        offset = place_variables(pool, offset, &mut promises);
    }

    // Emission over the same fixed pool order.
    let mut code = Vec::new();
    emit_pool(global, &global.symbols, &layout, registers, &mut code);
    for pool in procedures.iter() {
        emit_pool(pool, &global.symbols, &layout, registers, &mut code);
    }

    for (&cell, &initializer) in &promises {
        code[cell as usize] = bits::signed(initializer, layout.word_bits);
    }

    (code, layout)
}

fn count_instructions(pool: &InstructionPool) -> i64 {
    pool.tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Instruction)
        .count() as i64
}

fn count_variables(pool: &InstructionPool) -> i64 {
    pool.symbols
        .entries()
        .filter(|entry| entry.kind == SymbolKind::Variable)
        .count() as i64
}

/// Rewrites each variable symbol of `pool` to its absolute cell, records
/// its promise, and returns the offset the next pool continues from. The
/// pool's variables live directly behind its instructions.
fn place_variables(
    pool: &mut InstructionPool,
    offset: i64,
    promises: &mut BTreeMap<i64, i64>,
) -> i64 {
    let mut offset = offset + count_instructions(pool);

    for entry in pool.symbols.entries_mut() {
        if entry.kind == SymbolKind::Variable {
            promises.insert(offset, entry.value);
            entry.value = offset;
            offset += 1;
        }
    }

    offset
}

fn emit_pool(
    pool: &InstructionPool,
    global_symbols: &SymbolTable,
    layout: &InstructionLayout,
    registers: i64,
    code: &mut Vec<String>,
) {
    for (index, token) in pool.tokens.iter().enumerate() {
        if token.kind != TokenKind::Instruction {
            continue;
        }

        let opcode = match Opcode::from_mnemonic(&token.lexeme) {
            Some(opcode) => opcode,
            None => continue,
        };

        // The analyzer normalized every operand site, so the operands sit
        // at fixed offsets behind the instruction.
        let (source, destination) = match opcode.operand_count() {
            0 => (default_operand(), default_operand()),
            1 => (operand_at(&pool.tokens, index + 1), default_operand()),
            _ => (
                operand_at(&pool.tokens, index + 1),
                operand_at(&pool.tokens, index + 4),
            ),
        };

        code.push(encode_instruction(
            opcode,
            &source,
            &destination,
            &pool.symbols,
            global_symbols,
            layout,
            registers,
        ));
    }

    // One zero-filled cell per variable; the promises fill them in later.
    for _ in 0..count_variables(pool) {
        code.push("0".repeat(layout.word_bits as usize));
    }
}

fn operand_at(tokens: &[Token], index: usize) -> Operand {
    debug_assert_matches!(tokens[index].kind, TokenKind::AddressingMode);

    Operand {
        mode: tokens[index].clone(),
        value: tokens[index + 1].clone(),
    }
}

/// The placeholder filling unused operand slots: register mode (opcode 0)
/// around the value 0, an all-zero field pair.
fn default_operand() -> Operand {
    let position = Position::new(0, 0);

    Operand {
        mode: Token::new(TokenKind::AddressingMode, "%", position),
        value: Token::new(TokenKind::Value, "0", position),
    }
}

fn encode_instruction(
    opcode: Opcode,
    source: &Operand,
    destination: &Operand,
    symbols: &SymbolTable,
    global_symbols: &SymbolTable,
    layout: &InstructionLayout,
    registers: i64,
) -> String {
    let mode = source
        .mode
        .lexeme
        .chars()
        .next()
        .and_then(AddressingMode::from_symbol)
        .expect("normalized addressing mode");

    let mut encoded = bits::unsigned(
        opcode.to_i64().expect("opcode fits an i64"),
        layout.operation_bits,
    );
    encoded.push_str(&bits::unsigned(
        mode.to_i64().expect("mode fits an i64"),
        layout.mode_bits,
    ));
    encoded.push_str(&bits::signed(
        resolve_operand(&source.value, symbols, global_symbols, registers),
        layout.operand_bits,
    ));
    encoded.push_str(&bits::signed(
        resolve_operand(&destination.value, symbols, global_symbols, registers),
        layout.operand_bits,
    ));

    encoded
}

fn resolve_operand(
    value: &Token,
    symbols: &SymbolTable,
    global_symbols: &SymbolTable,
    registers: i64,
) -> i64 {
    match value.kind {
        TokenKind::Label => {
            symbols
                .get(&value.lexeme)
                .or_else(|| global_symbols.get(&value.lexeme))
                .expect("labels are resolved during analysis")
                .value
        }
        TokenKind::Register => resolve_register(value, registers),
        _ => parse_value(&value.lexeme),
    }
}

fn resolve_register(token: &Token, registers: i64) -> i64 {
    if let Some(special) = SpecialRegister::from_name(&token.lexeme) {
        return registers + special.offset();
    }

    wrap_register(parse_value(&token.lexeme), registers)
}

/// Register numbers beyond the bank wrap back into `[1, registers]`.
fn wrap_register(value: i64, registers: i64) -> i64 {
    if value > registers {
        1 + (value - 1) % registers
    } else {
        value
    }
}

// Literals beyond the native range saturate; the encoding width wraps
// them modulo the operand field anyway.
fn parse_value(lexeme: &str) -> i64 {
    lexeme.parse().unwrap_or_else(|_| {
        if lexeme.starts_with('-') {
            i64::min_value()
        } else {
            i64::max_value()
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn register_numbers_wrap_into_the_bank() {
        assert_eq!(wrap_register(1, 10), 1);
        assert_eq!(wrap_register(10, 10), 10);
        assert_eq!(wrap_register(11, 10), 1);
        assert_eq!(wrap_register(25, 10), 5);
    }
}
