use std::{error::Error as StdError, fmt};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    UnknownCommand { file: String, line: usize, text: String },
    UnknownSegment { file: String, line: usize, segment: String },
    MalformedIndex { file: String, line: usize, text: String },
    WrongArity { file: String, line: usize, text: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownCommand { file, line, text } => {
                write!(f, "{}:{}: unknown vm command \"{}\"", file, line, text)
            }
            Error::UnknownSegment { file, line, segment } => {
                write!(f, "{}:{}: unknown segment \"{}\"", file, line, segment)
            }
            Error::MalformedIndex { file, line, text } => {
                write!(f, "{}:{}: expected a non-negative index, got \"{}\"", file, line, text)
            }
            Error::WrongArity { file, line, text } => {
                write!(f, "{}:{}: wrong number of arguments in \"{}\"", file, line, text)
            }
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;
