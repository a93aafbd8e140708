use crate::defaults;
use crate::position::Position;

/// Extracts every `!OPTION=VALUE` directive from the source, returning
/// the stripped source and each directive together with the position it
/// occupied. Directives inside comments are left alone; the comment is
/// carried through for the lexer to skip.
pub fn strip_directives(source: &str) -> (String, Vec<(String, Position)>) {
    let characters: Vec<char> = source.chars().collect();
    let mut stripped = String::with_capacity(source.len());
    let mut directives = Vec::new();
    let mut position = Position::start();
    let mut index = 0;

    while index < characters.len() {
        let character = characters[index];

        if character == defaults::COMMENT_PREFIX {
            while index < characters.len() && !defaults::is_line_break(characters[index]) {
                stripped.push(characters[index]);
                position.advance(characters[index]);
                index += 1;
            }
        } else if character == defaults::DIRECTIVE_PREFIX {
            let start = position;
            let mut directive = String::from(defaults::DIRECTIVE_PREFIX);
            index += 1;

            while index < characters.len()
                && !defaults::is_line_break(characters[index])
                && characters[index] != defaults::COMMENT_PREFIX
                && characters[index] != defaults::DIRECTIVE_PREFIX
            {
                directive.push(characters[index]);
                index += 1;
            }

            directives.push((directive, start));
        } else {
            stripped.push(character);
            position.advance(character);
            index += 1;
        }
    }

    (stripped, directives)
}
