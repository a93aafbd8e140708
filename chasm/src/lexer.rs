use chadvm::{AddressingMode, Opcode, SpecialRegister};

use crate::defaults::{self, to_system_case};
use crate::error::{ErrorReport, Locus, SourceError};
use crate::position::Position;
use crate::token::{Token, TokenKind};

/// Tokenises preprocessed source text. All lexical errors found in one
/// scan are reported together; on success the stream is guaranteed to end
/// with exactly one END token.
pub fn lex(source: &str) -> Result<Vec<Token>, ErrorReport> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenise();
    ErrorReport::guard("Lexing Errors", lexer.errors, tokens)
}

struct Lexer {
    characters: Vec<char>,
    position: Position,
    errors: Vec<SourceError>,
}

impl Lexer {
    fn new(source: &str) -> Lexer {
        Lexer {
            characters: source.chars().collect(),
            position: Position::start(),
            errors: Vec::new(),
        }
    }

    fn record(&mut self, kind: &'static str, position: Position, message: String) {
        self.errors
            .push(SourceError::new(kind, Locus::Line, position, message));
    }

    fn tokenise(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut index = 0;

        while index < self.characters.len() {
            let character = self.characters[index];

            if character == defaults::COMMENT_PREFIX {
                while index < self.characters.len()
                    && !defaults::is_line_break(self.characters[index])
                {
                    index += 1;
                    self.position.column += 1;
                }
            } else if defaults::is_inline_space(character) {
                index += 1;
                self.position.column += 1;
            } else if defaults::is_line_break(character) {
                // A single END stands for any run of line breaks, so blank
                // lines never produce empty statements.
                if tokens
                    .last()
                    .map_or(false, |token: &Token| token.kind != TokenKind::End)
                {
                    tokens.push(Token::new(
                        TokenKind::End,
                        defaults::LINE_BREAK_SYMBOL,
                        self.position,
                    ));
                }
                index += 1;
                self.position.row += 1;
                self.position.column = 1;
            } else if character == '{' {
                tokens.push(Token::new(TokenKind::LeftBrace, "{", self.position));
                index += 1;
                self.position.column += 1;
            } else if character == '}' {
                tokens.push(Token::new(TokenKind::RightBrace, "}", self.position));
                index += 1;
                self.position.column += 1;
            } else if character == ',' {
                tokens.push(Token::new(
                    TokenKind::Separator,
                    defaults::SEPARATOR_SYMBOL,
                    self.position,
                ));
                index += 1;
                self.position.column += 1;
            } else if let Some(mode) = AddressingMode::from_symbol(character) {
                tokens.push(Token::new(
                    TokenKind::AddressingMode,
                    mode.symbol().to_string(),
                    self.position,
                ));
                index += 1;
                self.position.column += 1;
            } else {
                let substring = self.gather(index);
                let length = substring.chars().count();
                self.classify(&to_system_case(&substring), &mut tokens);
                index += length;
                self.position.column += length;
            }
        }

        if let Some(last) = tokens.last() {
            if last.kind != TokenKind::End {
                tokens.push(Token::new(
                    TokenKind::End,
                    defaults::LINE_BREAK_SYMBOL,
                    self.position,
                ));
            }
        }

        tokens
    }

    /// The maximal substring starting at `from`, bounded by whitespace,
    /// separators, braces, addressing-mode symbols or a comment.
    fn gather(&self, from: usize) -> String {
        let mut substring = String::new();
        let mut index = from;

        while index < self.characters.len() && !is_token_boundary(self.characters[index]) {
            substring.push(self.characters[index]);
            index += 1;
        }

        substring
    }

    fn classify(&mut self, substring: &str, tokens: &mut Vec<Token>) {
        let start = self.position;
        let head = substring.chars().next().expect("non-empty substring");

        if head.is_ascii_digit() || head == '+' || head == '-' {
            let token = self.value_token(substring, start);
            tokens.push(token);
        } else if let Some(number) = general_register_suffix(substring) {
            // REGISTER/REG/R followed by digits is a general purpose
            // register; the bare keyword is an addressing mode below.
            tokens.push(Token::new(TokenKind::Register, number, start));
        } else if Opcode::from_mnemonic(substring).is_some() {
            tokens.push(Token::new(TokenKind::Instruction, substring, start));
        } else if let Some(register) = SpecialRegister::from_name(substring) {
            tokens.push(Token::new(TokenKind::Register, register.name(), start));
        } else if let Some(mode) = AddressingMode::from_keyword(substring) {
            tokens.push(Token::new(
                TokenKind::AddressingMode,
                mode.symbol().to_string(),
                start,
            ));
        } else if substring == "DAT" {
            tokens.push(Token::new(TokenKind::AssemblyDirective, substring, start));
        } else {
            let token = self.label_token(substring, start);
            tokens.push(token);
        }
    }

    fn value_token(&mut self, substring: &str, start: Position) -> Token {
        let mut sign = '+';
        let mut digits = substring;
        let mut column = start.column;

        if let Some(head) = substring.chars().next() {
            if head == '+' || head == '-' {
                sign = head;
                digits = &substring[1..];
                column += 1;
            }
        }

        if digits.is_empty() {
            self.record(
                "Invalid Value Error",
                start,
                "Empty value found, only the sign was specified".to_string(),
            );
        }

        for character in digits.chars() {
            if !character.is_ascii_digit() {
                self.record(
                    "Invalid Value Error",
                    Position::new(start.row, column),
                    format!("Non-value character found `{}`", character),
                );
            }
            column += 1;
        }

        // The sign is kept in the lexeme so later stages can parse the
        // value without re-deriving it.
        let mut lexeme = String::with_capacity(substring.len() + 1);
        lexeme.push(sign);
        lexeme.push_str(digits);

        Token::new(TokenKind::Value, lexeme, start)
    }

    fn label_token(&mut self, substring: &str, start: Position) -> Token {
        let head = substring.chars().next().expect("non-empty substring");

        if !(head.is_ascii_alphabetic() || head == '_') {
            self.record(
                "Invalid Label Error",
                start,
                format!("Non-label character found `{}`", head),
            );
        }

        let mut column = start.column;
        for character in substring.chars() {
            if !(character.is_ascii_alphanumeric() || character == '_') {
                self.record(
                    "Invalid Label Error",
                    Position::new(start.row, column),
                    format!("Non-label character found `{}`", character),
                );
            }
            column += 1;
        }

        // Still a Label token even when errors were recorded; the stream
        // keeps its shape and the errors surface once lexing finishes.
        Token::new(TokenKind::Label, substring, start)
    }
}

fn is_token_boundary(character: char) -> bool {
    defaults::is_inline_space(character)
        || defaults::is_line_break(character)
        || character == ','
        || character == '{'
        || character == '}'
        || character == defaults::COMMENT_PREFIX
        || AddressingMode::from_symbol(character).is_some()
}

/// Splits `REG7`-style tokens into their keyword and digit suffix. Returns
/// the suffix when the keyword is one of the general register aliases.
fn general_register_suffix(substring: &str) -> Option<String> {
    let digits = substring
        .chars()
        .rev()
        .take_while(|character| character.is_ascii_digit())
        .count();

    if digits == 0 {
        return None;
    }

    let (keyword, number) = substring.split_at(substring.len() - digits);

    match keyword {
        "REGISTER" | "REG" | "R" => Some(number.to_string()),
        _ => None,
    }
}
