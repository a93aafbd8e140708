use crate::defaults;

/// A 1-based (row, column) pair. The row is a line number for source text
/// and an argument number for command-line options.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Position {
        Position { row, column }
    }

    pub fn start() -> Position {
        Position { row: 1, column: 1 }
    }

    /// Steps past `character`, wrapping onto the next row at line breaks.
    pub fn advance(&mut self, character: char) {
        if defaults::is_line_break(character) {
            self.row += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}
