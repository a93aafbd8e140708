//! System-wide defaults: single-character markers, option names, and the
//! one place that decides the letter case everything is folded to.

/// Marks the beginning of an in-source configuration directive.
pub const DIRECTIVE_PREFIX: char = '!';

/// Marks the beginning of a line comment.
pub const COMMENT_PREFIX: char = ';';

/// Separates a configuration option from its value.
pub const TOKEN_DELIMITER: char = '=';

/// Identifier of the global instruction pool. The leading `.` cannot
/// appear in a user label, so no collision is possible.
pub const GLOBAL_POOL_IDENTIFIER: &str = ".MAIN";

/// Initializer used when a variable declaration omits its value.
pub const DEFAULT_VARIABLE_VALUE: i64 = 0;

/// Lexeme carried by END tokens.
pub const LINE_BREAK_SYMBOL: &str = "/";

/// Lexeme carried by SEPARATOR tokens.
pub const SEPARATOR_SYMBOL: &str = ",";

pub const MEMORY_OPTION: &str = "MEMORY";
pub const REGISTERS_OPTION: &str = "REGISTERS";
pub const CLOCK_OPTION: &str = "CLOCK";

/// Folds an identifier into the system letter case. Case-insensitivity
/// works by normalizing everything through this one function; changing
/// the case is a matter of changing this body and nothing else.
pub fn to_system_case(text: &str) -> String {
    text.to_uppercase()
}

pub fn is_line_break(character: char) -> bool {
    matches!(character, '\n' | '\r' | '\x0c')
}

pub fn is_inline_space(character: char) -> bool {
    matches!(character, ' ' | '\t' | '\x0b')
}
