//! Expands one [`Command`] into its Hack assembly. Each snippet is emitted
//! as one assembly instruction per `String`, not joined into one line, so
//! the output composes cleanly with whatever the caller does next (write
//! to a file, pipe straight into [`hasm::assemble`]).

use crate::command::{Command, Segment};

/// Tracks the per-run state the expansion needs: a unique index for every
/// comparison and every call, and the static-segment namespace for the
/// file currently being translated. Both indices are fields here, not
/// module statics, so translating two independent programs in the same
/// process never bleeds labels from one into the other.
pub struct CodeGen {
    compare_index: u32,
    call_index: u32,
}

impl CodeGen {
    pub fn new() -> Self {
        CodeGen {
            compare_index: 0,
            call_index: 0,
        }
    }

    fn segment_pointer(segment: Segment) -> &'static str {
        match segment {
            Segment::Local => "LCL",
            Segment::Argument => "ARG",
            Segment::This => "THIS",
            Segment::That => "THAT",
            _ => unreachable!("segment_pointer only called for indirect segments"),
        }
    }

    fn push_end() -> Vec<String> {
        vec!["@SP".into(), "A=M".into(), "M=D".into(), "@SP".into(), "M=M+1".into()]
    }

    pub fn push(&mut self, segment: Segment, index: u16, static_ns: &str) -> Vec<String> {
        let mut out = vec![format!("// push {:?} {}", segment, index)];
        match segment {
            Segment::Constant => {
                out.push(format!("@{}", index));
                out.push("D=A".into());
            }
            Segment::Static => {
                out.push(format!("@{}.{}", static_ns, index));
                out.push("D=M".into());
            }
            Segment::Temp => {
                out.push(format!("@{}", index));
                out.push("D=A".into());
                out.push("@5".into());
                out.push("A=A+D".into());
                out.push("D=M".into());
            }
            Segment::Pointer => {
                out.push(format!("@{}", index));
                out.push("D=A".into());
                out.push("@3".into());
                out.push("A=A+D".into());
                out.push("D=M".into());
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                out.push(format!("@{}", index));
                out.push("D=A".into());
                out.push(format!("@{}", Self::segment_pointer(segment)));
                out.push("A=M+D".into());
                out.push("D=M".into());
            }
        }
        out.extend(Self::push_end());
        out
    }

    pub fn pop(&mut self, segment: Segment, index: u16, static_ns: &str) -> Vec<String> {
        let mut out = vec![format!("// pop {:?} {}", segment, index)];
        match segment {
            Segment::Static => {
                out.push("@SP".into());
                out.push("M=M-1".into());
                out.push("A=M".into());
                out.push("D=M".into());
                out.push(format!("@{}.{}", static_ns, index));
                out.push("M=D".into());
            }
            Segment::Temp => {
                out.push(format!("@{}", index));
                out.push("D=A".into());
                out.push("@5".into());
                out.extend(Self::pop_tail());
            }
            Segment::Pointer => {
                out.push(format!("@{}", index));
                out.push("D=A".into());
                out.push("@3".into());
                out.extend(Self::pop_tail());
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                out.push(format!("@{}", index));
                out.push("D=A".into());
                out.push(format!("@{}", Self::segment_pointer(segment)));
                out.push("A=M".into());
                out.extend(Self::pop_tail());
            }
            Segment::Constant => unreachable!("pop constant is not a legal vm instruction"),
        }
        out
    }

    fn pop_tail() -> Vec<String> {
        vec![
            "D=D+A".into(),
            "@R13".into(),
            "M=D".into(),
            "@SP".into(),
            "M=M-1".into(),
            "A=M".into(),
            "D=M".into(),
            "@R13".into(),
            "A=M".into(),
            "M=D".into(),
        ]
    }

    pub fn arithmetic(&mut self, op: &str) -> Vec<String> {
        let mut out = vec![format!("// {}", op)];
        match op {
            "neg" => out.extend(["@SP".into(), "A=M-1".into(), "M=-M".into()]),
            "not" => out.extend(["@SP".into(), "A=M-1".into(), "M=!M".into()]),
            "add" => out.extend(
                ["@SP", "M=M-1", "A=M", "D=M", "A=A-1", "M=M+D"].iter().map(|s| s.to_string()),
            ),
            "sub" => out.extend(
                ["@SP", "M=M-1", "A=M", "D=M", "A=A-1", "M=M-D"].iter().map(|s| s.to_string()),
            ),
            "and" => out.extend(
                ["@SP", "M=M-1", "A=M", "D=M", "A=A-1", "M=M&D"].iter().map(|s| s.to_string()),
            ),
            "or" => out.extend(
                ["@SP", "M=M-1", "A=M", "D=M", "A=A-1", "M=M|D"].iter().map(|s| s.to_string()),
            ),
            "eq" => out.extend(self.comparison("EQUALS", "JEQ")),
            "lt" => out.extend(self.comparison("LESS", "JLT")),
            "gt" => out.extend(self.comparison("GREATER", "JGT")),
            _ => unreachable!("unknown arithmetic op {}", op),
        }
        out
    }

    fn comparison(&mut self, taken_label: &str, jump: &str) -> Vec<String> {
        self.compare_index += 1;
        let n = self.compare_index;
        vec![
            "@SP".into(),
            "M=M-1".into(),
            "A=M".into(),
            "D=M".into(),
            "A=A-1".into(),
            "D=M-D".into(),
            format!("@{}{}", taken_label, n),
            format!("D;{}", jump),
            "@SP".into(),
            "A=M-1".into(),
            "M=0".into(),
            format!("@END{}", n),
            "0;JMP".into(),
            format!("({}{})", taken_label, n),
            "@SP".into(),
            "A=M-1".into(),
            "M=-1".into(),
            format!("(END{})", n),
        ]
    }

    pub fn label(&self, name: &str) -> Vec<String> {
        vec![format!("// label {}", name), format!("({})", name)]
    }

    pub fn goto(&self, name: &str) -> Vec<String> {
        vec![format!("// goto {}", name), format!("@{}", name), "0;JMP".into()]
    }

    pub fn if_goto(&self, name: &str) -> Vec<String> {
        vec![
            format!("// if-goto {}", name),
            "@SP".into(),
            "M=M-1".into(),
            "A=M".into(),
            "D=M".into(),
            format!("@{}", name),
            "D;JNE".into(),
        ]
    }

    pub fn function(&self, name: &str, n_locals: u16) -> Vec<String> {
        let mut out = vec![format!("// function {} {}", name, n_locals), format!("({})", name)];
        for _ in 0..n_locals {
            out.push("@SP".into());
            out.push("A=M".into());
            out.push("M=0".into());
            out.push("@SP".into());
            out.push("M=M+1".into());
        }
        out
    }

    pub fn call(&mut self, name: &str, n_args: u16) -> Vec<String> {
        self.call_index += 1;
        let ret = format!("CALL_LABEL{}", self.call_index);
        let mut out = vec![format!("// call {} {}", name, n_args)];
        out.push(format!("@{}", ret));
        out.push("D=A".into());
        out.extend(Self::push_end());
        for reg in ["LCL", "ARG", "THIS", "THAT"] {
            out.push(format!("@{}", reg));
            out.push("D=M".into());
            out.extend(Self::push_end());
        }
        out.push("@SP".into());
        out.push("D=M".into());
        out.push("@5".into());
        out.push("D=D-A".into());
        out.push(format!("@{}", n_args));
        out.push("D=D-A".into());
        out.push("@ARG".into());
        out.push("M=D".into());
        out.push("@SP".into());
        out.push("D=M".into());
        out.push("@LCL".into());
        out.push("M=D".into());
        out.push(format!("@{}", name));
        out.push("0;JMP".into());
        out.push(format!("({})", ret));
        out
    }

    pub fn ret(&self) -> Vec<String> {
        let mut out = vec!["// return".to_string()];
        out.push("@LCL".into());
        out.push("D=M".into());
        out.push("@R13".into());
        out.push("M=D".into());
        out.push("@5".into());
        out.push("D=A".into());
        out.push("@R13".into());
        out.push("D=M-D".into());
        out.push("A=D".into());
        out.push("D=M".into());
        out.push("@R14".into());
        out.push("M=D".into());
        out.push("@SP".into());
        out.push("A=M-1".into());
        out.push("D=M".into());
        out.push("@ARG".into());
        out.push("A=M".into());
        out.push("M=D".into());
        out.push("@ARG".into());
        out.push("D=M".into());
        out.push("@SP".into());
        out.push("M=D+1".into());
        for reg in ["THAT", "THIS", "ARG", "LCL"] {
            out.push("@R13".into());
            out.push("M=M-1".into());
            out.push("A=M".into());
            out.push("D=M".into());
            out.push(format!("@{}", reg));
            out.push("M=D".into());
        }
        out.push("@R14".into());
        out.push("A=M".into());
        out.push("0;JMP".into());
        out
    }

    /// `compare_index`/`call_index` at the start of a fresh translation.
    #[cfg(test)]
    pub(crate) fn counters(&self) -> (u32, u32) {
        (self.compare_index, self.call_index)
    }
}

pub fn dispatch(gen: &mut CodeGen, cmd: &Command, static_ns: &str) -> Vec<String> {
    match cmd {
        Command::Push(s, i) => gen.push(*s, *i, static_ns),
        Command::Pop(s, i) => gen.pop(*s, *i, static_ns),
        Command::Add => gen.arithmetic("add"),
        Command::Sub => gen.arithmetic("sub"),
        Command::Neg => gen.arithmetic("neg"),
        Command::Eq => gen.arithmetic("eq"),
        Command::Gt => gen.arithmetic("gt"),
        Command::Lt => gen.arithmetic("lt"),
        Command::And => gen.arithmetic("and"),
        Command::Or => gen.arithmetic("or"),
        Command::Not => gen.arithmetic("not"),
        Command::Label(name) => gen.label(name),
        Command::Goto(name) => gen.goto(name),
        Command::IfGoto(name) => gen.if_goto(name),
        Command::Function(name, n) => gen.function(name, *n),
        Command::Call(name, n) => gen.call(name, *n),
        Command::Return => gen.ret(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Segment;

    #[test]
    fn fresh_codegen_starts_counters_at_zero() {
        assert_eq!(CodeGen::new().counters(), (0, 0));
    }

    #[test]
    fn push_constant_loads_literal() {
        let mut g = CodeGen::new();
        let lines = g.push(Segment::Constant, 7, "Foo");
        assert!(lines.contains(&"@7".to_string()));
        assert!(lines.contains(&"D=A".to_string()));
    }

    #[test]
    fn comparison_labels_increment_and_are_unique() {
        let mut g = CodeGen::new();
        let first = g.arithmetic("eq");
        let second = g.arithmetic("eq");
        assert!(first.contains(&"(EQUALS1)".to_string()));
        assert!(second.contains(&"(EQUALS2)".to_string()));
    }

    #[test]
    fn call_labels_are_unique_per_call_site() {
        let mut g = CodeGen::new();
        let first = g.call("Foo.bar", 2);
        let second = g.call("Foo.bar", 2);
        assert!(first.contains(&"(CALL_LABEL1)".to_string()));
        assert!(second.contains(&"(CALL_LABEL2)".to_string()));
    }
}
