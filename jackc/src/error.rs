use crate::token::Token;
use std::{error::Error as StdError, fmt};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    UnexpectedChar { ch: char },
    UnterminatedString { text: String },
    MalformedInt { text: String },
    UnexpectedToken { expected: &'static str, found: Option<Token> },
    UndeclaredVariable { name: String },
    UnexpectedEof,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnexpectedChar { ch } => write!(f, "unexpected character '{}'", ch),
            Error::UnterminatedString { text } => {
                write!(f, "unterminated string constant starting at \"{}\"", text)
            }
            Error::MalformedInt { text } => write!(f, "malformed integer constant \"{}\"", text),
            Error::UnexpectedToken { expected, found } => write!(
                f,
                "expected {}, found {}",
                expected,
                found
                    .as_ref()
                    .map(|t| format!("{:?}", t))
                    .unwrap_or_else(|| "end of input".to_string())
            ),
            Error::UndeclaredVariable { name } => {
                write!(f, "reference to undeclared variable \"{}\"", name)
            }
            Error::UnexpectedEof => write!(f, "unexpected end of input"),
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;
