use std::{error::Error as StdError, fmt};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A `.hack` line wasn't exactly 16 `'0'`/`'1'` characters.
    MalformedInstruction { line: usize, text: String },
    /// `.asm` input failed to assemble before it could be loaded.
    Assemble(hasm::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedInstruction { line, text } => {
                write!(f, "line {}: not a 16-bit binary instruction \"{}\"", line, text)
            }
            Error::Assemble(e) => write!(f, "assembly failed: {}", e),
        }
    }
}

impl StdError for Error {}

impl From<hasm::Error> for Error {
    fn from(e: hasm::Error) -> Self {
        Error::Assemble(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
