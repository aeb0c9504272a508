use std::{error::Error as StdError, fmt};

/// A mnemonic did not match any entry of the `comp`, `dest`, or `jump`
/// table, or an `@symbol` line referenced something that isn't a number,
/// a label, or a variable. Carries the 1-based source line for diagnostics.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    UnknownComp { line: usize, mnemonic: String },
    UnknownDest { line: usize, mnemonic: String },
    UnknownJump { line: usize, mnemonic: String },
    MalformedAddress { line: usize, text: String },
    MalformedInstruction { line: usize, text: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownComp { line, mnemonic } => {
                write!(f, "line {}: unknown comp mnemonic \"{}\"", line, mnemonic)
            }
            Error::UnknownDest { line, mnemonic } => {
                write!(f, "line {}: unknown dest mnemonic \"{}\"", line, mnemonic)
            }
            Error::UnknownJump { line, mnemonic } => {
                write!(f, "line {}: unknown jump mnemonic \"{}\"", line, mnemonic)
            }
            Error::MalformedAddress { line, text } => {
                write!(f, "line {}: malformed address \"{}\"", line, text)
            }
            Error::MalformedInstruction { line, text } => {
                write!(f, "line {}: malformed instruction \"{}\"", line, text)
            }
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;
