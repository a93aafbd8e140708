use std::fmt;

use crate::position::Position;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    End,               // statement terminator
    Instruction,       // INP, OUT, ADD, ...
    AddressingMode,    // #, @, >, % or one of the keyword aliases
    Value,             // signed integer literal
    Register,          // REG4, ACC, PC, ...
    Label,             // any user identifier
    Separator,         // ,
    LeftBrace,         // {
    RightBrace,        // }
    AssemblyDirective, // DAT
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TokenKind::End => "End Of Statement",
            TokenKind::Instruction => "Instruction",
            TokenKind::AddressingMode => "Addressing Mode",
            TokenKind::Value => "Value",
            TokenKind::Register => "Register",
            TokenKind::Label => "Label",
            TokenKind::Separator => "Instruction Separator",
            TokenKind::LeftBrace => "Left Curly Brace",
            TokenKind::RightBrace => "Right Curly Brace",
            TokenKind::AssemblyDirective => "Assembly Directive",
        })
    }
}

/// A lexed token. Lexemes are already folded to the system case; value
/// lexemes always carry an explicit sign, register lexemes hold either the
/// general register number or the short special-register name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

/// An addressing-mode token paired with the value token it addresses.
#[derive(Clone, Debug)]
pub struct Operand {
    pub mode: Token,
    pub value: Token,
}
