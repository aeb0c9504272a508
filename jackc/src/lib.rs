//! Compiles one Jack class into stack-machine VM instructions.
//!
//! [`compile`] takes an iterator of source lines belonging to a single
//! `class` declaration and returns one VM instruction per line of output.
//! There is no semantic validation beyond what the grammar itself forces:
//! no type checking, no "declared before use" diagnostics outside of
//! symbol-table lookup failure. A fresh [`compiler::CompilationEngine`] (and
//! so a fresh symbol table) is built per call, matching [`hasm::assemble`]'s
//! and [`vmtranslate::Translator`]'s per-run ownership of their own state.

mod compiler;
mod error;
mod symbol_table;
mod token;
mod vm_writer;

pub use error::{Error, Result};
pub use token::Token;

use compiler::CompilationEngine;

/// Tokenises and compiles one Jack class, returning its VM instructions in
/// the order `n2t` should write them to the output file.
pub fn compile<I, S>(lines: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens = token::tokenize(lines)?;
    CompilationEngine::new(tokens).compile_class()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scenario S5: a `main` that returns constant 0.
    #[test]
    fn compiles_hello_world_main() {
        let vm = compile([
            "class Main {",
            "    function void main() {",
            "        return 0;",
            "    }",
            "}",
        ])
        .unwrap();
        assert_eq!(vm, vec!["function Main.main 0", "push constant 0", "return"]);
    }

    #[test]
    fn lexical_errors_abort_the_whole_class() {
        let err = compile(["class Main { $ }"]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedChar { ch: '$' }));
    }
}
