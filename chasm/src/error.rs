use std::error::Error as StdError;
use std::fmt;

use crate::position::Position;

/// Where an error's coordinates point: a line of source text or one of
/// the command-line arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Locus {
    Line,
    Argument,
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Locus::Line => "line",
            Locus::Argument => "argument",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceError {
    pub kind: &'static str,
    pub locus: Locus,
    pub position: Position,
    pub message: String,
}

impl SourceError {
    pub fn new(
        kind: &'static str,
        locus: Locus,
        position: Position,
        message: impl Into<String>,
    ) -> SourceError {
        SourceError {
            kind,
            locus,
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} found in {} {} at position {}: {}",
            self.kind, self.locus, self.position.row, self.position.column, self.message
        )
    }
}

/// All errors one pipeline stage accumulated before aborting. Stages
/// report everything they can find in one pass rather than stopping at
/// the first defect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorReport {
    pub stage: &'static str,
    pub errors: Vec<SourceError>,
}

impl ErrorReport {
    pub fn new(stage: &'static str, errors: Vec<SourceError>) -> ErrorReport {
        ErrorReport { stage, errors }
    }

    /// Wraps accumulated errors, or passes `value` through when the stage
    /// recorded none.
    pub fn guard<T>(stage: &'static str, errors: Vec<SourceError>, value: T) -> Result<T, ErrorReport> {
        if errors.is_empty() {
            Ok(value)
        } else {
            Err(ErrorReport::new(stage, errors))
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}:", self.stage)?;

        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}

impl StdError for ErrorReport {}
