//! Translates stack-machine VM instructions into Hack assembly.
//!
//! [`Translator`] owns the two counters (`compare_index`, `call_index`)
//! that must stay unique across an entire directory-mode translation but
//! reset for each independent run; they're fields here, never module-level
//! statics, so two translations never share state even in the same
//! process.
//!
//! The core never touches the filesystem: [`Translator::translate_file`]
//! takes an already-read iterator of lines, and [`Translator::translate_program`]
//! takes a list of `(file_stem, lines)` pairs, tagging static variables with
//! the caller-supplied base name rather than splitting a path itself.

mod codegen;
mod command;
mod error;

pub use command::{Command, Segment};
pub use error::{Error, Result};

use codegen::CodeGen;

pub struct Translator {
    gen: CodeGen,
}

impl Translator {
    pub fn new() -> Self {
        Translator { gen: CodeGen::new() }
    }

    /// Translates one file's worth of VM source. `file_stem` namespaces
    /// that file's `static` segment.
    pub fn translate_file<I, S>(&mut self, file_stem: &str, lines: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for (line_no, text) in preprocess(lines) {
            let cmd = command::parse(file_stem, line_no, &text)?;
            out.extend(codegen::dispatch(&mut self.gen, &cmd, file_stem));
        }
        Ok(out)
    }

    /// Translates a whole directory's worth of files as one program: emits
    /// the SP-initialisation bootstrap and a call to `Sys.init`, then each
    /// file in order, sharing this translator's counters throughout.
    pub fn translate_program<I, S>(&mut self, files: Vec<(&str, I)>) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = vec![
            "@256".to_string(),
            "D=A".to_string(),
            "@SP".to_string(),
            "M=D".to_string(),
        ];
        out.extend(self.gen.call("Sys.init", 0));
        for (stem, lines) in files {
            out.extend(self.translate_file(stem, lines)?);
        }
        Ok(out)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

fn preprocess<I, S>(lines: I) -> Vec<(usize, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let raw = raw.as_ref();
            let without_comment = match raw.find("//") {
                Some(idx) => &raw[..idx],
                None => raw,
            };
            let trimmed = without_comment.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some((i + 1, trimmed.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scenario S3: `push constant 7 / push constant 8 / add` should emit
    /// two literal pushes and one `add` expansion, nothing else.
    #[test]
    fn translates_simple_add() {
        let mut t = Translator::new();
        let asm = t
            .translate_file("SimpleAdd", ["push constant 7", "push constant 8", "add"])
            .unwrap();
        assert!(asm.contains(&"@7".to_string()));
        assert!(asm.contains(&"@8".to_string()));
        assert!(asm.iter().any(|l| l == "M=M+D"));
    }

    #[test]
    fn fresh_translator_starts_unique_counters_at_one() {
        let mut t = Translator::new();
        let asm = t.translate_file("T", ["eq"]).unwrap();
        assert!(asm.contains(&"(EQUALS1)".to_string()));
    }

    #[test]
    fn static_segment_is_namespaced_by_file() {
        let mut t = Translator::new();
        let asm = t.translate_file("Foo", ["push static 3"]).unwrap();
        assert!(asm.contains(&"@Foo.3".to_string()));
    }

    #[test]
    fn unknown_command_is_reported_with_location() {
        let mut t = Translator::new();
        let err = t.translate_file("T", ["frobnicate"]).unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { line: 1, .. }));
    }
}
