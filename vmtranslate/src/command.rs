//! Parses a line of VM source into a [`Command`].

use crate::error::{Error, Result};

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
}

impl Segment {
    fn parse(file: &str, line: usize, text: &str) -> Result<Segment> {
        match text {
            "constant" => Ok(Segment::Constant),
            "local" => Ok(Segment::Local),
            "argument" => Ok(Segment::Argument),
            "this" => Ok(Segment::This),
            "that" => Ok(Segment::That),
            "temp" => Ok(Segment::Temp),
            "pointer" => Ok(Segment::Pointer),
            "static" => Ok(Segment::Static),
            other => Err(Error::UnknownSegment {
                file: file.to_string(),
                line,
                segment: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Command {
    Push(Segment, u16),
    Pop(Segment, u16),
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

/// Parses one already-trimmed, comment-stripped VM source line.
/// `file` and `line` are carried only for error messages.
pub fn parse(file: &str, line: usize, text: &str) -> Result<Command> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let parse_index = |w: &str| -> Result<u16> {
        w.parse::<u16>().map_err(|_| Error::MalformedIndex {
            file: file.to_string(),
            line,
            text: text.to_string(),
        })
    };
    let arity_err = || Error::WrongArity {
        file: file.to_string(),
        line,
        text: text.to_string(),
    };

    match words.as_slice() {
        ["push", segment, idx] => {
            Ok(Command::Push(Segment::parse(file, line, segment)?, parse_index(idx)?))
        }
        ["pop", segment, idx] => {
            Ok(Command::Pop(Segment::parse(file, line, segment)?, parse_index(idx)?))
        }
        ["add"] => Ok(Command::Add),
        ["sub"] => Ok(Command::Sub),
        ["neg"] => Ok(Command::Neg),
        ["eq"] => Ok(Command::Eq),
        ["gt"] => Ok(Command::Gt),
        ["lt"] => Ok(Command::Lt),
        ["and"] => Ok(Command::And),
        ["or"] => Ok(Command::Or),
        ["not"] => Ok(Command::Not),
        ["label", name] => Ok(Command::Label((*name).to_string())),
        ["goto", name] => Ok(Command::Goto((*name).to_string())),
        ["if-goto", name] => Ok(Command::IfGoto((*name).to_string())),
        ["function", name, n] => Ok(Command::Function((*name).to_string(), parse_index(n)?)),
        ["call", name, n] => Ok(Command::Call((*name).to_string(), parse_index(n)?)),
        ["return"] => Ok(Command::Return),
        ["push", ..] | ["pop", ..] | ["function", ..] | ["call", ..] => Err(arity_err()),
        [cmd, ..] => Err(Error::UnknownCommand {
            file: file.to_string(),
            line,
            text: (*cmd).to_string(),
        }),
        [] => Err(arity_err()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_push_and_pop() {
        assert_eq!(
            parse("T", 1, "push constant 7").unwrap(),
            Command::Push(Segment::Constant, 7)
        );
        assert_eq!(
            parse("T", 1, "pop local 2").unwrap(),
            Command::Pop(Segment::Local, 2)
        );
    }

    #[test]
    fn parses_control_flow() {
        assert_eq!(parse("T", 1, "label LOOP").unwrap(), Command::Label("LOOP".into()));
        assert_eq!(parse("T", 1, "if-goto LOOP").unwrap(), Command::IfGoto("LOOP".into()));
        assert_eq!(
            parse("T", 1, "call Math.multiply 2").unwrap(),
            Command::Call("Math.multiply".into(), 2)
        );
    }

    #[test]
    fn rejects_unknown_segment() {
        assert!(matches!(
            parse("T", 1, "push frobnicator 1"),
            Err(Error::UnknownSegment { .. })
        ));
    }
}
