use std::collections::HashMap;

use crate::defaults::{self, to_system_case};
use crate::error::{ErrorReport, Locus, SourceError};
use crate::position::Position;

/// Runtime configuration of the machine being assembled for, merged from
/// built-in defaults, command-line options and in-source directives, in
/// that order of precedence.
#[derive(Clone, Debug)]
pub struct Config {
    options: HashMap<String, i64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            options: Config::defaults(),
        }
    }
}

impl Config {
    /// The built-in value of every recognized option.
    pub fn defaults() -> HashMap<String, i64> {
        let mut options = HashMap::new();
        options.insert(defaults::MEMORY_OPTION.to_string(), 100);
        options.insert(defaults::REGISTERS_OPTION.to_string(), 10);
        options.insert(defaults::CLOCK_OPTION.to_string(), 0);
        options
    }

    /// The floor each option may not go below.
    pub fn minimums() -> HashMap<String, i64> {
        let mut minimums = HashMap::new();
        minimums.insert(defaults::MEMORY_OPTION.to_string(), 16);
        minimums.insert(defaults::REGISTERS_OPTION.to_string(), 4);
        minimums.insert(defaults::CLOCK_OPTION.to_string(), 0);
        minimums
    }

    /// Minimum number of addressable memory cells.
    pub fn memory(&self) -> i64 {
        self.options[defaults::MEMORY_OPTION]
    }

    /// Number of general purpose registers.
    pub fn registers(&self) -> i64 {
        self.options[defaults::REGISTERS_OPTION]
    }

    /// Delay between executed instructions, in milliseconds.
    pub fn clock(&self) -> i64 {
        self.options[defaults::CLOCK_OPTION]
    }

    fn contains(&self, option: &str) -> bool {
        self.options.contains_key(option)
    }

    fn set(&mut self, option: &str, value: i64) {
        self.options.insert(option.to_string(), value);
    }
}

/// Which kind of text the options came from. The source decides the
/// coordinate wording of errors and the report header, nothing else; the
/// parsing rules are identical.
#[derive(Clone, Copy, Debug)]
pub enum ConfigSource {
    Arguments,
    Directives,
}

impl ConfigSource {
    fn locus(self) -> Locus {
        match self {
            ConfigSource::Arguments => Locus::Argument,
            ConfigSource::Directives => Locus::Line,
        }
    }

    fn stage(self) -> &'static str {
        match self {
            ConfigSource::Arguments => "Argument Processing Errors",
            ConfigSource::Directives => "Preprocessor Errors",
        }
    }
}

/// Applies command-line style `OPTION=VALUE` arguments to the
/// configuration, the argument number serving as the error row.
pub fn process_arguments(config: &mut Config, arguments: &[String]) -> Result<(), ErrorReport> {
    let mut parser = OptionParser::new(config, ConfigSource::Arguments);

    for argument in arguments {
        parser.parse(argument);
        parser.position.row += 1;
        parser.position.column = 1;
    }

    parser.finish()
}

/// Applies directives extracted from the source, each carrying the
/// position it occupied in the file.
pub fn process_directives(
    config: &mut Config,
    directives: &[(String, Position)],
) -> Result<(), ErrorReport> {
    let mut parser = OptionParser::new(config, ConfigSource::Directives);

    for (directive, position) in directives {
        parser.position = *position;
        parser.parse(directive);
    }

    parser.finish()
}

struct UntypedToken {
    text: String,
    position: Position,
}

struct OptionParser<'a> {
    config: &'a mut Config,
    source: ConfigSource,
    position: Position,
    errors: Vec<SourceError>,
}

impl<'a> OptionParser<'a> {
    fn new(config: &'a mut Config, source: ConfigSource) -> OptionParser<'a> {
        OptionParser {
            config,
            source,
            position: Position::start(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Result<(), ErrorReport> {
        ErrorReport::guard(self.source.stage(), self.errors, ())
    }

    fn record(&mut self, kind: &'static str, position: Position, message: impl Into<String>) {
        self.errors
            .push(SourceError::new(kind, self.source.locus(), position, message));
    }

    fn parse(&mut self, text: &str) {
        let tokens = self.tokenise(text);

        match tokens.len() {
            2 => {}
            0 => {
                let position = self.position;
                self.record("Syntax Error", position, "A key : value pair was not found");
                return;
            }
            1 => {
                self.record(
                    "Syntax Error",
                    tokens[0].position,
                    "A key : value pair was not found",
                );
                return;
            }
            _ => {
                self.record(
                    "Syntax Error",
                    Position::new(tokens[0].position.row, 0),
                    "Should only contain a single key : value pair",
                );
                return;
            }
        }

        let option = &tokens[0];
        let value = &tokens[1];

        if !self.check_known_option(option) {
            return;
        }
        if !self.check_no_sign(value) {
            return;
        }
        if !self.check_digits(value) {
            return;
        }

        self.update(option, value);
    }

    fn tokenise(&mut self, text: &str) -> Vec<UntypedToken> {
        let characters: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut index = 0;

        if characters.first() == Some(&defaults::DIRECTIVE_PREFIX) {
            index = 1;
            self.position.column += 1;
        }

        while index < characters.len() {
            if is_terminator(characters[index]) {
                index += 1;
                self.position.column += 1;
                continue;
            }

            let start = self.position;
            let mut substring = String::new();

            while index < characters.len() && !is_terminator(characters[index]) {
                substring.push(characters[index]);
                index += 1;
                self.position.column += 1;
            }

            tokens.push(UntypedToken {
                text: to_system_case(&substring),
                position: start,
            });
        }

        tokens
    }

    fn check_known_option(&mut self, option: &UntypedToken) -> bool {
        if self.config.contains(&option.text) {
            true
        } else {
            self.record(
                "Unknown Option Error",
                option.position,
                "Option is not recognised",
            );
            false
        }
    }

    fn check_no_sign(&mut self, value: &UntypedToken) -> bool {
        match value.text.chars().next() {
            Some('+') => {
                self.record(
                    "Invalid Value Error",
                    value.position,
                    "Do not specify the sign of a configuration value",
                );
                false
            }
            Some('-') => {
                self.record(
                    "Invalid Value Error",
                    value.position,
                    "A configuration value must be a non-negative, denary integer",
                );
                false
            }
            _ => true,
        }
    }

    fn check_digits(&mut self, value: &UntypedToken) -> bool {
        let mut valid = true;
        let mut column = value.position.column;

        for character in value.text.chars() {
            if !character.is_ascii_digit() {
                self.record(
                    "Invalid Value Error",
                    Position::new(value.position.row, column),
                    "Value must only contain integers",
                );
                valid = false;
            }
            column += 1;
        }

        valid
    }

    fn update(&mut self, option: &UntypedToken, value: &UntypedToken) {
        let parsed: i64 = match value.text.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                self.record("Invalid Value Error", value.position, "Value is too large");
                return;
            }
        };

        let minimum = Config::minimums().get(&option.text).copied().unwrap_or(0);

        if parsed < minimum {
            self.record(
                "Minimum Value Error",
                value.position,
                format!("Value is below the minimum of {}", minimum),
            );
        } else {
            self.config.set(&option.text, parsed);
        }
    }
}

fn is_terminator(character: char) -> bool {
    character == defaults::TOKEN_DELIMITER
        || defaults::is_inline_space(character)
        || defaults::is_line_break(character)
}
