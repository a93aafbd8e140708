use std::mem;

use crate::defaults;
use crate::error::{ErrorReport, Locus, SourceError};
use crate::pool::{InstructionPool, SymbolEntry, SymbolKind, SymbolTable};
use crate::position::Position;
use crate::token::{Token, TokenKind};

/// Validates statement-level syntax, splits the stream into one pool per
/// procedure plus the global pool, and classifies every declared label.
///
/// Pre-parsing aborts on its own errors before the split runs, so the
/// later passes can assume a well-formed token succession.
pub fn parse(tokens: Vec<Token>) -> Result<(Vec<InstructionPool>, InstructionPool), ErrorReport> {
    let mut parser = Parser::new(tokens);

    parser.preparse();
    if !parser.errors.is_empty() {
        return Err(ErrorReport::new("Parsing Errors", parser.errors));
    }

    parser.split_pools();
    parser.classify();

    ErrorReport::guard(
        "Parsing Errors",
        parser.errors,
        (parser.procedures, parser.global),
    )
}

/// The token kinds allowed to follow `kind` within a statement.
fn permitted_after(kind: TokenKind) -> &'static [TokenKind] {
    use crate::token::TokenKind::*;

    match kind {
        End => &[End, Instruction, Label, RightBrace, LeftBrace],
        Instruction => &[End, AddressingMode, Value, Register, Label, RightBrace],
        AddressingMode => &[Value, Register, Label],
        Value | Register => &[End, Separator, RightBrace, LeftBrace],
        Label => &[
            End,
            Separator,
            Instruction,
            RightBrace,
            LeftBrace,
            AssemblyDirective,
        ],
        Separator => &[AddressingMode, Value, Register, Label],
        LeftBrace | RightBrace => &[End],
        AssemblyDirective => &[End, Value],
    }
}

struct Parser {
    tokens: Vec<Token>,
    procedures: Vec<InstructionPool>,
    global: InstructionPool,
    open_scope: Option<Token>,
    errors: Vec<SourceError>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Parser {
        Parser {
            tokens,
            procedures: Vec::new(),
            global: InstructionPool::new(defaults::GLOBAL_POOL_IDENTIFIER),
            open_scope: None,
            errors: Vec::new(),
        }
    }

    fn record(&mut self, position: Position, message: String) {
        self.errors.push(SourceError::new(
            "Invalid Syntax Error",
            Locus::Line,
            position,
            message,
        ));
    }

    fn preparse(&mut self) {
        // An END stands in for the previous token at the start, so the
        // first real token is checked as the beginning of a statement.
        let mut previous = Token::new(
            TokenKind::End,
            defaults::LINE_BREAK_SYMBOL,
            Position::new(0, 0),
        );

        for index in 0..self.tokens.len() {
            let current = self.tokens[index].clone();

            self.validate_scope(&current);

            if !permitted_after(previous.kind).contains(&current.kind) {
                self.record_succession_error(&previous, &current);
            }

            previous = current;
        }

        if let Some(open) = self.open_scope.take() {
            self.record(
                open.position,
                "Block scope was opened but never closed".to_string(),
            );
        }
    }

    fn record_succession_error(&mut self, previous: &Token, current: &Token) {
        let context = if previous.kind == TokenKind::End {
            format!("Statement cannot begin with {}", current.kind)
        } else {
            format!(
                "{} - `{}` was found after {} - `{}`",
                current.kind, current.lexeme, previous.kind, previous.lexeme
            )
        };

        self.record(current.position, format!("Unexpected token: {}", context));
    }

    fn validate_scope(&mut self, current: &Token) {
        match current.kind {
            TokenKind::LeftBrace => {
                if self.open_scope.is_none() {
                    self.open_scope = Some(current.clone());
                } else {
                    // no nested procedures
                    self.record(
                        current.position,
                        "Cannot open a new block scope until the previous one was closed"
                            .to_string(),
                    );
                }
            }
            TokenKind::RightBrace => {
                if self.open_scope.is_none() {
                    self.record(
                        current.position,
                        "Attempting to close a block scope when no block scope was opened \
                         to begin with"
                            .to_string(),
                    );
                } else {
                    self.open_scope = None;
                }
            }
            _ => {}
        }
    }

    /// Walks the validated stream, moving each procedure body into its own
    /// pool. The procedure's label token is the most recent non-END token
    /// of the global pool when its opening brace appears.
    fn split_pools(&mut self) {
        let tokens = mem::take(&mut self.tokens);
        let mut index = 0;

        while index < tokens.len() {
            if tokens[index].kind == TokenKind::LeftBrace {
                let mut label = self.global.tokens.pop();
                if label
                    .as_ref()
                    .map_or(false, |token| token.kind == TokenKind::End)
                {
                    label = self.global.tokens.pop();
                }

                match label {
                    Some(label) if label.kind == TokenKind::Label => {
                        // Step past the brace and the END after it, then
                        // collect the body up to the closing brace.
                        index += 2;
                        let mut body = Vec::new();

                        while index < tokens.len() && tokens[index].kind != TokenKind::RightBrace {
                            body.push(tokens[index].clone());
                            index += 1;
                        }

                        // Drop the END after the closing brace as well.
                        index += 1;
                        self.insert_procedure(&label.lexeme, body);
                    }
                    _ => {
                        self.record(
                            tokens[index].position,
                            "Block scope is not preceded by a procedure label".to_string(),
                        );

                        while index < tokens.len() && tokens[index].kind != TokenKind::RightBrace {
                            index += 1;
                        }
                        index += 1;
                    }
                }
            } else {
                self.global.tokens.push(tokens[index].clone());
            }

            index += 1;
        }
    }

    fn insert_procedure(&mut self, identifier: &str, body: Vec<Token>) {
        // A redefined procedure replaces the earlier body in place.
        if let Some(existing) = self
            .procedures
            .iter_mut()
            .find(|pool| pool.identifier == identifier)
        {
            existing.tokens = body;
            existing.symbols = SymbolTable::new();
        } else {
            let mut pool = InstructionPool::new(identifier);
            pool.tokens = body;
            self.procedures.push(pool);
        }
    }

    fn classify(&mut self) {
        // Every procedure goes into the global table first, so labels in
        // any pool can be checked against the procedure names.
        for pool in &self.procedures {
            self.global
                .symbols
                .insert(&pool.identifier, -1, SymbolKind::Procedure);
        }

        Self::classify_pool(&mut self.global, &mut self.errors);

        for pool in &mut self.procedures {
            Self::classify_pool(pool, &mut self.errors);
        }
    }

    fn classify_pool(pool: &mut InstructionPool, errors: &mut Vec<SourceError>) {
        let mut instruction_index: i64 = 0;
        let mut index = 0;

        while index < pool.tokens.len() {
            match pool.tokens[index].kind {
                TokenKind::Label => {
                    Self::classify_label(pool, index, instruction_index, errors);
                }
                TokenKind::End => instruction_index += 1,
                _ => {}
            }

            index += 1;
        }
    }

    fn classify_label(
        pool: &mut InstructionPool,
        index: usize,
        instruction_index: i64,
        errors: &mut Vec<SourceError>,
    ) {
        let label = pool.tokens[index].clone();
        let following = match pool.tokens.get(index + 1) {
            Some(token) => token.kind,
            None => return,
        };

        match following {
            TokenKind::AssemblyDirective => {
                Self::check_redeclaration(pool.symbols.get(&label.lexeme), following, &label, errors);

                let value = match pool.tokens.get(index + 2) {
                    Some(token) if token.kind == TokenKind::Value => token
                        .lexeme
                        .parse()
                        .unwrap_or(defaults::DEFAULT_VARIABLE_VALUE),
                    _ => defaults::DEFAULT_VARIABLE_VALUE,
                };

                pool.symbols.insert(&label.lexeme, value, SymbolKind::Variable);

                // Remove the declaration but keep its END, so the
                // statement count stays aligned for later labels.
                let mut end = index;
                while end < pool.tokens.len() && pool.tokens[end].kind != TokenKind::End {
                    end += 1;
                }
                pool.tokens.drain(index..end);
            }
            TokenKind::Instruction => {
                Self::check_redeclaration(pool.symbols.get(&label.lexeme), following, &label, errors);
                pool.symbols
                    .insert(&label.lexeme, instruction_index, SymbolKind::Branch);
            }
            _ => {}
        }
    }

    fn check_redeclaration(
        existing: Option<&SymbolEntry>,
        context: TokenKind,
        label: &Token,
        errors: &mut Vec<SourceError>,
    ) {
        let entry = match existing {
            Some(entry) => entry,
            None => return,
        };

        let (kind, message) = match (context, entry.kind) {
            (TokenKind::Instruction, SymbolKind::Branch) => {
                ("Branch Label Error", "Duplicate branch label found")
            }
            (TokenKind::Instruction, SymbolKind::Variable) => (
                "Branch Label Error",
                "Attempting to redeclare a variable label to a branch label",
            ),
            (TokenKind::Instruction, SymbolKind::Procedure) => (
                "Branch Label Error",
                "Attempting to redeclare a procedure label to a branch label",
            ),
            (TokenKind::AssemblyDirective, SymbolKind::Branch) => (
                "Variable Label Error",
                "Attempting to redeclare a branch label to a variable label",
            ),
            (TokenKind::AssemblyDirective, SymbolKind::Procedure) => (
                "Variable Label Error",
                "Attempting to redeclare a procedure label to a variable label",
            ),
            // A variable may be redeclared; the new initializer wins.
            _ => return,
        };

        errors.push(SourceError::new(kind, Locus::Line, label.position, message));
    }
}
