use chadvm::{Opcode, SpecialRegister};

use crate::defaults;
use crate::error::{ErrorReport, Locus, SourceError};
use crate::pool::{InstructionPool, SymbolEntry, SymbolKind, SymbolTable};
use crate::token::{Operand, Token, TokenKind};

/// Enforces the per-opcode operand rules and inserts the implicit tokens,
/// so that after this pass every operand site has the normalized shape
/// `ADDRESSING_MODE value` the code generator reads at fixed offsets.
pub fn analyse(
    mut procedures: Vec<InstructionPool>,
    mut global: InstructionPool,
) -> Result<(Vec<InstructionPool>, InstructionPool), ErrorReport> {
    let mut errors = Vec::new();

    {
        let InstructionPool {
            tokens, symbols, ..
        } = &mut global;
        let symbols = &*symbols;
        analyse_pool(tokens, symbols, symbols, &mut errors);
    }

    for pool in &mut procedures {
        let InstructionPool {
            tokens, symbols, ..
        } = pool;
        analyse_pool(tokens, symbols, &global.symbols, &mut errors);
    }

    ErrorReport::guard("Semantic Analysis Errors", errors, (procedures, global))
}

fn record(
    errors: &mut Vec<SourceError>,
    kind: &'static str,
    token: &Token,
    message: impl Into<String>,
) {
    errors.push(SourceError::new(kind, Locus::Line, token.position, message));
}

/// Local scope first, then the global scope.
fn lookup<'a>(
    local: &'a SymbolTable,
    global: &'a SymbolTable,
    identifier: &str,
) -> Option<&'a SymbolEntry> {
    local.get(identifier).or_else(|| global.get(identifier))
}

fn analyse_pool(
    tokens: &mut Vec<Token>,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    // Token insertion grows the stream underneath the walk, so the length
    // is re-read every iteration.
    let mut index = 0;

    while index < tokens.len() {
        if tokens[index].kind == TokenKind::Instruction {
            analyse_instruction(tokens, index, local, global, errors);
        }

        index += 1;
    }
}

fn analyse_instruction(
    tokens: &mut Vec<Token>,
    index: usize,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    let instruction = tokens[index].clone();
    let opcode = match Opcode::from_mnemonic(&instruction.lexeme) {
        Some(opcode) => opcode,
        None => return,
    };

    let count = count_operands(tokens, index + 1);
    let maximum = opcode.operand_count();

    if count > maximum {
        record(
            errors,
            "Invalid Operands Error",
            &instruction,
            format!(
                "{} operands given for instruction that accepts, at most, {} operands",
                count, maximum
            ),
        );
        return;
    }

    match maximum {
        0 => {}
        1 => analyse_single_operand(tokens, &instruction, opcode, index + 1, local, global, errors),
        _ => analyse_double_operand(tokens, &instruction, opcode, index + 1, local, global, errors),
    }
}

fn count_operands(tokens: &[Token], mut index: usize) -> usize {
    let mut count = 0;

    while index < tokens.len() && tokens[index].kind != TokenKind::End {
        if matches!(
            tokens[index].kind,
            TokenKind::Value | TokenKind::Register | TokenKind::Label
        ) {
            count += 1;
        }
        index += 1;
    }

    count
}

/// Returns the operand at `index`, inserting the implicit tokens first: a
/// missing addressing mode becomes `%` for registers and `@` for anything
/// else, and a missing operand becomes the accumulator in register mode.
fn get_operand(tokens: &mut Vec<Token>, index: usize) -> Operand {
    match tokens[index].kind {
        TokenKind::Separator => get_operand(tokens, index + 1),

        TokenKind::End => {
            let position = tokens[index].position;

            tokens.insert(
                index,
                Token::new(TokenKind::Register, SpecialRegister::ACC.name(), position),
            );
            tokens.insert(
                index,
                Token::new(TokenKind::AddressingMode, "%", position),
            );

            // A value token just before means this is an inferred second
            // operand, which still needs its separator.
            if index > 0
                && matches!(
                    tokens[index - 1].kind,
                    TokenKind::Register | TokenKind::Label | TokenKind::Value
                )
            {
                tokens.insert(
                    index,
                    Token::new(TokenKind::Separator, defaults::SEPARATOR_SYMBOL, position),
                );
                return Operand {
                    mode: tokens[index + 1].clone(),
                    value: tokens[index + 2].clone(),
                };
            }

            Operand {
                mode: tokens[index].clone(),
                value: tokens[index + 1].clone(),
            }
        }

        TokenKind::Register => {
            let position = tokens[index].position;
            tokens.insert(
                index,
                Token::new(TokenKind::AddressingMode, "%", position),
            );
            Operand {
                mode: tokens[index].clone(),
                value: tokens[index + 1].clone(),
            }
        }

        TokenKind::Label | TokenKind::Value => {
            let position = tokens[index].position;
            tokens.insert(
                index,
                Token::new(TokenKind::AddressingMode, "@", position),
            );
            Operand {
                mode: tokens[index].clone(),
                value: tokens[index + 1].clone(),
            }
        }

        _ => Operand {
            mode: tokens[index].clone(),
            value: tokens[index + 1].clone(),
        },
    }
}

fn analyse_single_operand(
    tokens: &mut Vec<Token>,
    instruction: &Token,
    opcode: Opcode,
    index: usize,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    if tokens[index].kind == TokenKind::End && opcode.requires_explicit_operand() {
        record(
            errors,
            "Invalid Operands Error",
            instruction,
            format!(
                "Operand must explicitly be present for a {} instruction",
                instruction.lexeme
            ),
        );
        return;
    }

    let operand = get_operand(tokens, index);
    analyse_addressing_mode(&operand, errors);

    match opcode {
        Opcode::OUT | Opcode::OUTC | Opcode::OUTB => {
            analyse_output_operand(&operand, local, global, errors)
        }
        Opcode::CALL => analyse_call_operand(&operand, local, global, errors),
        Opcode::INP => analyse_input_operand(&operand, errors),
        _ => {}
    }
}

fn analyse_double_operand(
    tokens: &mut Vec<Token>,
    instruction: &Token,
    opcode: Opcode,
    index: usize,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    if tokens[index].kind == TokenKind::End {
        record(
            errors,
            "Invalid Operands Error",
            instruction,
            "The SOURCE operand for any double operand instruction must be explicitly stated",
        );
        return;
    }

    let source = get_operand(tokens, index);
    let destination = get_operand(tokens, index + 2);

    if opcode.is_branch() {
        analyse_branch_operand(&source, local, global, errors);
    } else {
        if opcode.is_data_flow() && source.mode.lexeme == "#" {
            record(
                errors,
                "Invalid Addressing Mode Error",
                &source.mode,
                "Cannot address a data flow instruction in immediate mode",
            );
        }

        analyse_operand(&source, 1, local, global, errors);
    }

    analyse_operand(&destination, 2, local, global, errors);
}

fn analyse_operand(
    operand: &Operand,
    number: usize,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    analyse_addressing_mode(operand, errors);

    if number == 2 {
        if operand.value.kind == TokenKind::Register {
            analyse_register_operand(operand, errors);
        } else {
            record(
                errors,
                "Invalid Operand Error",
                &operand.value,
                "Second operand must be a register",
            );
        }
        return;
    }

    match operand.value.kind {
        TokenKind::Label => analyse_variable_operand(operand, local, global, errors),
        TokenKind::Register => analyse_register_operand(operand, errors),
        _ => {}
    }
}

fn analyse_addressing_mode(operand: &Operand, errors: &mut Vec<SourceError>) {
    if operand.mode.lexeme == "%" && operand.value.kind != TokenKind::Register {
        record(
            errors,
            "Invalid Operand Error",
            &operand.value,
            "Non-register paired with register addressing mode",
        );
    }
}

fn analyse_register_operand(operand: &Operand, errors: &mut Vec<SourceError>) {
    if operand.mode.lexeme != "%" {
        record(
            errors,
            "Invalid Addressing Mode Error",
            &operand.mode,
            "Non-register addressing mode paired with a register",
        );
    }

    // General purpose register numbers start at 1.
    if operand.value.lexeme.parse() == Ok(0i64) {
        record(
            errors,
            "Invalid Register Error",
            &operand.value,
            "Cannot access general purpose register 0",
        );
    }
}

fn analyse_variable_operand(
    operand: &Operand,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    match lookup(local, global, &operand.value.lexeme) {
        None => record(
            errors,
            "Invalid Label Error",
            &operand.value,
            "Attempting to use an undeclared label as a variable",
        ),
        Some(entry) => match entry.kind {
            SymbolKind::Branch => record(
                errors,
                "Invalid Label Error",
                &operand.value,
                "Attempting to use a branch label as an instruction operand",
            ),
            SymbolKind::Procedure => record(
                errors,
                "Invalid Label Error",
                &operand.value,
                "Attempting to use a procedure label as an instruction operand",
            ),
            SymbolKind::Variable => {}
        },
    }
}

/// Branch sources must be a label in direct mode resolving to a branch or
/// procedure label.
fn analyse_branch_operand(
    operand: &Operand,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    if operand.mode.lexeme == "@" && operand.value.kind == TokenKind::Label {
        match lookup(local, global, &operand.value.lexeme) {
            None => record(
                errors,
                "Invalid Branch Error",
                &operand.value,
                "Attempting to branch to non-existent location",
            ),
            Some(entry) if entry.kind == SymbolKind::Variable => record(
                errors,
                "Invalid Label Error",
                &operand.value,
                "Attempting to branch to a variable label",
            ),
            Some(_) => {}
        }
        return;
    }

    if operand.mode.lexeme != "@" {
        record(
            errors,
            "Invalid Addressing Mode Error",
            &operand.value,
            "Source operand in branch instruction must be addressed in DIRECT mode",
        );
    }

    if operand.value.kind != TokenKind::Label {
        record(
            errors,
            "Invalid Operand Error",
            &operand.value,
            "Source operand in branch instruction must be a branch label",
        );
    }
}

fn analyse_output_operand(
    operand: &Operand,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    match operand.value.kind {
        TokenKind::Label => analyse_variable_operand(operand, local, global, errors),
        TokenKind::Register => analyse_register_operand(operand, errors),
        _ => {}
    }
}

fn analyse_call_operand(
    operand: &Operand,
    local: &SymbolTable,
    global: &SymbolTable,
    errors: &mut Vec<SourceError>,
) {
    if operand.value.kind != TokenKind::Label {
        record(
            errors,
            "Invalid Operands Error",
            &operand.value,
            "Call instruction operand must be a label",
        );
        return;
    }

    match lookup(local, global, &operand.value.lexeme) {
        None => record(
            errors,
            "Invalid Procedure Error",
            &operand.value,
            "Attempting to call non-existent procedure",
        ),
        Some(entry) if entry.kind != SymbolKind::Procedure => record(
            errors,
            "Invalid Operands Error",
            &operand.value,
            "Call instruction operand must be a procedure label",
        ),
        Some(_) if operand.mode.lexeme != "@" => record(
            errors,
            "Invalid Addressing Mode Error",
            &operand.mode,
            "Call instruction operand must be a procedure label addressed in direct \
             addressing mode",
        ),
        Some(_) => {}
    }
}

fn analyse_input_operand(operand: &Operand, errors: &mut Vec<SourceError>) {
    if operand.mode.lexeme != "%" {
        record(
            errors,
            "Invalid Addressing Mode Error",
            &operand.mode,
            "Input instruction operand must be addressed in register addressing mode",
        );
    } else {
        analyse_register_operand(operand, errors);
    }
}
