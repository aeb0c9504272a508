//! Recursive-descent parser and VM code generator for one Jack class.
//!
//! Mirrors the grammar's shape directly: one `compile_*` method per
//! production, each advancing the shared token cursor `i` and returning the
//! VM lines it emitted. There is no separate AST — parsing and code
//! generation happen in the same pass, as the VM output has no further use
//! for parse-tree structure once a production is done with it.

use crate::error::{Error, Result};
use crate::symbol_table::{SymbolTable, VarKind};
use crate::token::{Keyword, Token};
use crate::vm_writer as vm;

const EXPR_OPS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

pub struct CompilationEngine {
    tokens: Vec<Token>,
    i: usize,
    symbol_table: SymbolTable,
    class_name: String,
    counter: u32,
}

impl CompilationEngine {
    pub fn new(tokens: Vec<Token>) -> Self {
        CompilationEngine {
            tokens,
            i: 0,
            symbol_table: SymbolTable::new(),
            class_name: String::new(),
            counter: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.i)
    }

    fn advance(&mut self) -> Result<Token> {
        let tok = self.tokens.get(self.i).cloned().ok_or(Error::UnexpectedEof)?;
        self.i += 1;
        Ok(tok)
    }

    fn expect_symbol(&mut self, sym: char) -> Result<()> {
        match self.advance()? {
            Token::Symbol(c) if c == sym => Ok(()),
            other => Err(Error::UnexpectedToken {
                expected: "symbol",
                found: Some(other),
            }),
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<()> {
        match self.advance()? {
            Token::Keyword(k) if k == kw => Ok(()),
            other => Err(Error::UnexpectedToken {
                expected: "keyword",
                found: Some(other),
            }),
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.advance()? {
            Token::Identifier(name) => Ok(name),
            other => Err(Error::UnexpectedToken {
                expected: "identifier",
                found: Some(other),
            }),
        }
    }

    fn peek_is_symbol(&self, sym: char) -> bool {
        matches!(self.peek(), Some(Token::Symbol(c)) if *c == sym)
    }

    fn peek_is_keyword(&self, kw: Keyword) -> bool {
        matches!(self.peek(), Some(Token::Keyword(k)) if *k == kw)
    }

    fn unique_label(&mut self, prefix: &str) -> String {
        let n = self.counter;
        self.counter += 1;
        format!("{}{}", prefix, n)
    }

    /// `class := 'class' Id '{' classVarDec* subroutineDec* '}'`
    pub fn compile_class(&mut self) -> Result<Vec<String>> {
        self.expect_keyword(Keyword::class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.peek_is_keyword(Keyword::r#static) || self.peek_is_keyword(Keyword::field) {
            self.compile_class_var_dec()?;
        }

        let mut out = Vec::new();
        while self.peek_is_keyword(Keyword::constructor)
            || self.peek_is_keyword(Keyword::function)
            || self.peek_is_keyword(Keyword::method)
        {
            out.extend(self.compile_subroutine()?);
        }

        self.expect_symbol('}')?;
        Ok(out)
    }

    /// `classVarDec := ('static'|'field') type Id (',' Id)* ';'`
    fn compile_class_var_dec(&mut self) -> Result<()> {
        let kind = match self.advance()? {
            Token::Keyword(Keyword::r#static) => VarKind::Static,
            Token::Keyword(Keyword::field) => VarKind::This,
            other => {
                return Err(Error::UnexpectedToken {
                    expected: "'static' or 'field'",
                    found: Some(other),
                })
            }
        };
        let var_type = self.compile_type()?;
        loop {
            let name = self.expect_identifier()?;
            self.symbol_table.define(&name, &var_type, kind);
            if self.peek_is_symbol(',') {
                self.advance()?;
                continue;
            }
            break;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    /// `type := 'int' | 'char' | 'boolean' | Id`
    fn compile_type(&mut self) -> Result<String> {
        match self.advance()? {
            Token::Keyword(Keyword::int) => Ok("int".to_string()),
            Token::Keyword(Keyword::char) => Ok("char".to_string()),
            Token::Keyword(Keyword::boolean) => Ok("boolean".to_string()),
            Token::Identifier(name) => Ok(name),
            other => Err(Error::UnexpectedToken {
                expected: "type",
                found: Some(other),
            }),
        }
    }

    /// `subroutineDec := ('constructor'|'function'|'method') (type|'void')
    /// Id '(' paramList ')' body`
    fn compile_subroutine(&mut self) -> Result<Vec<String>> {
        self.symbol_table.start_subroutine();
        let kind = match self.advance()? {
            Token::Keyword(k @ (Keyword::constructor | Keyword::function | Keyword::method)) => k,
            other => {
                return Err(Error::UnexpectedToken {
                    expected: "subroutine kind",
                    found: Some(other),
                })
            }
        };
        if kind == Keyword::method {
            self.symbol_table.define("this", &self.class_name.clone(), VarKind::Argument);
        }

        // return type: 'void' or a type; either way it's not needed for codegen.
        if self.peek_is_keyword(Keyword::void) {
            self.advance()?;
        } else {
            self.compile_type()?;
        }

        let name = self.expect_identifier()?;
        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        let mut n_locals = 0u16;
        while self.peek_is_keyword(Keyword::var) {
            n_locals += self.compile_var_dec()?;
        }

        let mut out = vec![vm::function(&format!("{}.{}", self.class_name, name), n_locals)];
        match kind {
            Keyword::method => {
                out.push(vm::push("argument", 0));
                out.push(vm::pop("pointer", 0));
            }
            Keyword::constructor => {
                out.push(vm::push("constant", self.symbol_table.var_count(VarKind::This)));
                out.push(vm::call("Memory.alloc", 1));
                out.push(vm::pop("pointer", 0));
            }
            _ => {}
        }
        out.extend(self.compile_statements()?);
        self.expect_symbol('}')?;
        Ok(out)
    }

    /// `paramList := (type Id (',' type Id)*)?`
    fn compile_parameter_list(&mut self) -> Result<()> {
        if self.peek_is_symbol(')') {
            return Ok(());
        }
        loop {
            let var_type = self.compile_type()?;
            let name = self.expect_identifier()?;
            self.symbol_table.define(&name, &var_type, VarKind::Argument);
            if self.peek_is_symbol(',') {
                self.advance()?;
                continue;
            }
            break;
        }
        Ok(())
    }

    /// `varDec := 'var' type Id (',' Id)* ';'`, returns the count defined.
    fn compile_var_dec(&mut self) -> Result<u16> {
        self.expect_keyword(Keyword::var)?;
        let var_type = self.compile_type()?;
        let mut count = 0u16;
        loop {
            let name = self.expect_identifier()?;
            self.symbol_table.define(&name, &var_type, VarKind::Local);
            count += 1;
            if self.peek_is_symbol(',') {
                self.advance()?;
                continue;
            }
            break;
        }
        self.expect_symbol(';')?;
        Ok(count)
    }

    /// `statements := (letStmt | ifStmt | whileStmt | doStmt | returnStmt)*`
    fn compile_statements(&mut self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Keyword(Keyword::r#let)) => out.extend(self.compile_let()?),
                Some(Token::Keyword(Keyword::r#if)) => out.extend(self.compile_if()?),
                Some(Token::Keyword(Keyword::r#while)) => out.extend(self.compile_while()?),
                Some(Token::Keyword(Keyword::r#do)) => out.extend(self.compile_do()?),
                Some(Token::Keyword(Keyword::r#return)) => out.extend(self.compile_return()?),
                _ => break,
            }
        }
        Ok(out)
    }

    fn lookup(&self, name: &str) -> Result<(&'static str, u16)> {
        let kind = self
            .symbol_table
            .kind_of(name)
            .ok_or_else(|| Error::UndeclaredVariable { name: name.to_string() })?;
        let index = self.symbol_table.index_of(name).unwrap();
        Ok((kind.segment(), index))
    }

    /// `letStmt := 'let' Id ('[' expression ']')? '=' expression ';'`
    fn compile_let(&mut self) -> Result<Vec<String>> {
        self.expect_keyword(Keyword::r#let)?;
        let name = self.expect_identifier()?;
        let mut out = Vec::new();

        if self.peek_is_symbol('[') {
            self.advance()?;
            let (seg, idx) = self.lookup(&name)?;
            out.push(vm::push(seg, idx));
            out.extend(self.compile_expression()?);
            out.push(vm::arithmetic("add"));
            self.expect_symbol(']')?;
            self.expect_symbol('=')?;
            out.extend(self.compile_expression()?);
            // RHS is evaluated onto the stack after the target address is
            // already there; park it in temp 0 so evaluating RHS (which may
            // itself read through `that`) can't clobber the pending write.
            out.push(vm::pop("temp", 0));
            out.push(vm::pop("pointer", 1));
            out.push(vm::push("temp", 0));
            out.push(vm::pop("that", 0));
        } else {
            self.expect_symbol('=')?;
            out.extend(self.compile_expression()?);
            let (seg, idx) = self.lookup(&name)?;
            out.push(vm::pop(seg, idx));
        }

        self.expect_symbol(';')?;
        Ok(out)
    }

    /// `ifStmt := 'if' '(' expression ')' '{' statements '}' ('else' '{' statements '}')?`
    fn compile_if(&mut self) -> Result<Vec<String>> {
        self.expect_keyword(Keyword::r#if)?;
        let label_true = self.unique_label("IF_TRUE");
        let label_false = self.unique_label("IF_FALSE");

        self.expect_symbol('(')?;
        let mut out = self.compile_expression()?;
        self.expect_symbol(')')?;
        out.push(vm::arithmetic("not"));
        out.push(vm::if_goto(&label_true));

        self.expect_symbol('{')?;
        out.extend(self.compile_statements()?);
        self.expect_symbol('}')?;
        out.push(vm::goto(&label_false));
        out.push(vm::label(&label_true));

        if self.peek_is_keyword(Keyword::r#else) {
            self.advance()?;
            self.expect_symbol('{')?;
            out.extend(self.compile_statements()?);
            self.expect_symbol('}')?;
        }
        out.push(vm::label(&label_false));
        Ok(out)
    }

    /// `whileStmt := 'while' '(' expression ')' '{' statements '}'`
    fn compile_while(&mut self) -> Result<Vec<String>> {
        self.expect_keyword(Keyword::r#while)?;
        let label_top = self.unique_label("WHILE_EXP");
        let label_end = self.unique_label("WHILE_END");

        let mut out = vec![vm::label(&label_top)];
        self.expect_symbol('(')?;
        out.extend(self.compile_expression()?);
        self.expect_symbol(')')?;
        out.push(vm::arithmetic("not"));
        out.push(vm::if_goto(&label_end));

        self.expect_symbol('{')?;
        out.extend(self.compile_statements()?);
        self.expect_symbol('}')?;
        out.push(vm::goto(&label_top));
        out.push(vm::label(&label_end));
        Ok(out)
    }

    /// `doStmt := 'do' subroutineCall ';'`
    fn compile_do(&mut self) -> Result<Vec<String>> {
        self.expect_keyword(Keyword::r#do)?;
        let mut out = self.compile_subroutine_call()?;
        self.expect_symbol(';')?;
        out.push(vm::pop("temp", 0));
        Ok(out)
    }

    /// `returnStmt := 'return' expression? ';'`
    fn compile_return(&mut self) -> Result<Vec<String>> {
        self.expect_keyword(Keyword::r#return)?;
        let mut out = if self.peek_is_symbol(';') {
            vec![vm::push("constant", 0)]
        } else {
            self.compile_expression()?
        };
        self.expect_symbol(';')?;
        out.push(vm::ret());
        Ok(out)
    }

    /// `subroutineCall := Id '(' expressionList ')' | (Id '.')? Id '(' expressionList ')'`
    ///
    /// Disambiguated by whether the call target's name resolves in scope: a
    /// known variable dispatches through its declared type (a method call);
    /// an unknown name is a class name (a static/constructor call); no `.`
    /// at all means an implicit-`this` call within the current class.
    fn compile_subroutine_call(&mut self) -> Result<Vec<String>> {
        let name = self.expect_identifier()?;
        let mut out = Vec::new();
        let mut args_num = 1u16;
        let subroutine_name;

        if self.peek_is_symbol('.') {
            self.advance()?;
            let member = self.expect_identifier()?;
            if self.symbol_table.contains(&name) {
                let (seg, idx) = self.lookup(&name)?;
                out.push(vm::push(seg, idx));
                let class_name = self.symbol_table.type_of(&name).unwrap().to_string();
                subroutine_name = format!("{}.{}", class_name, member);
            } else {
                args_num = 0;
                subroutine_name = format!("{}.{}", name, member);
            }
        } else {
            out.push(vm::push("pointer", 0));
            subroutine_name = format!("{}.{}", self.class_name, name);
        }

        self.expect_symbol('(')?;
        let (arg_code, n) = self.compile_expression_list()?;
        self.expect_symbol(')')?;
        out.extend(arg_code);
        args_num += n;
        out.push(vm::call(&subroutine_name, args_num));
        Ok(out)
    }

    /// `expressionList := (expression (',' expression)*)?`
    fn compile_expression_list(&mut self) -> Result<(Vec<String>, u16)> {
        let mut out = Vec::new();
        let mut count = 0u16;
        if self.peek_is_symbol(')') {
            return Ok((out, 0));
        }
        loop {
            out.extend(self.compile_expression()?);
            count += 1;
            if self.peek_is_symbol(',') {
                self.advance()?;
                continue;
            }
            break;
        }
        Ok((out, count))
    }

    /// `expression := term (op term)*` — strictly left-to-right, no
    /// operator precedence.
    fn compile_expression(&mut self) -> Result<Vec<String>> {
        let mut out = self.compile_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Symbol(c)) if EXPR_OPS.contains(c) => *c,
                _ => break,
            };
            self.advance()?;
            out.extend(self.compile_term()?);
            match op {
                '+' => out.push(vm::arithmetic("add")),
                '-' => out.push(vm::arithmetic("sub")),
                '&' => out.push(vm::arithmetic("and")),
                '|' => out.push(vm::arithmetic("or")),
                '<' => out.push(vm::arithmetic("lt")),
                '>' => out.push(vm::arithmetic("gt")),
                '=' => out.push(vm::arithmetic("eq")),
                '*' => out.push(vm::call("Math.multiply", 2)),
                '/' => out.push(vm::call("Math.divide", 2)),
                _ => unreachable!(),
            }
        }
        Ok(out)
    }

    /// ```text
    /// term := intConst | strConst | keywordConst
    ///       | Id | Id '[' expression ']'
    ///       | subroutineCall
    ///       | '(' expression ')'
    ///       | ('-'|'~') term
    /// ```
    fn compile_term(&mut self) -> Result<Vec<String>> {
        match self.peek().cloned().ok_or(Error::UnexpectedEof)? {
            Token::Symbol('(') => {
                self.advance()?;
                let out = self.compile_expression()?;
                self.expect_symbol(')')?;
                Ok(out)
            }
            Token::Symbol(c @ ('-' | '~')) => {
                self.advance()?;
                let mut out = self.compile_term()?;
                out.push(vm::arithmetic(if c == '-' { "neg" } else { "not" }));
                Ok(out)
            }
            Token::IntConst(n) => {
                self.advance()?;
                Ok(vec![vm::push("constant", n)])
            }
            Token::StringConst(s) => {
                self.advance()?;
                let mut out = vec![vm::push("constant", s.chars().count() as u16), vm::call("String.new", 1)];
                for ch in s.chars() {
                    out.push(vm::push("constant", ch as u16));
                    out.push(vm::call("String.appendChar", 2));
                }
                Ok(out)
            }
            Token::Keyword(Keyword::this) => {
                self.advance()?;
                Ok(vec![vm::push("pointer", 0)])
            }
            Token::Keyword(Keyword::r#true) => {
                self.advance()?;
                Ok(vec![vm::push("constant", 0), vm::arithmetic("not")])
            }
            Token::Keyword(Keyword::r#false) | Token::Keyword(Keyword::null) => {
                self.advance()?;
                Ok(vec![vm::push("constant", 0)])
            }
            Token::Identifier(name) => self.compile_term_identifier(&name),
            other => Err(Error::UnexpectedToken {
                expected: "term",
                found: Some(other),
            }),
        }
    }

    /// Handles the three identifier-led term shapes: a bare variable, an
    /// array read `Id[e]`, or a subroutine call `Id(...)` / `Id.Id(...)`.
    fn compile_term_identifier(&mut self, name: &str) -> Result<Vec<String>> {
        self.advance()?; // consume the leading identifier
        match self.peek() {
            Some(Token::Symbol('[')) => {
                self.advance()?;
                let (seg, idx) = self.lookup(name)?;
                let mut out = vec![vm::push(seg, idx)];
                out.extend(self.compile_expression()?);
                self.expect_symbol(']')?;
                out.push(vm::arithmetic("add"));
                out.push(vm::pop("pointer", 1));
                out.push(vm::push("that", 0));
                Ok(out)
            }
            Some(Token::Symbol('(')) | Some(Token::Symbol('.')) => {
                self.i -= 1;
                self.compile_subroutine_call()
            }
            _ => {
                let (seg, idx) = self.lookup(name)?;
                Ok(vec![vm::push(seg, idx)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn compile(lines: &[&str]) -> Vec<String> {
        let tokens = tokenize(lines.iter().copied()).unwrap();
        CompilationEngine::new(tokens).compile_class().unwrap()
    }

    /// Scenario S5: a trivial `main` returning constant 0.
    #[test]
    fn hello_world_main() {
        let vm = compile(&["class Main {", "function void main() {", "return 0;", "}", "}"]);
        assert_eq!(vm, vec!["function Main.main 0", "push constant 0", "return"]);
    }

    #[test]
    fn expression_is_left_to_right_no_precedence() {
        // 1 + 2 * 3 must evaluate as (1+2)*3, not 1+(2*3).
        let vm = compile(&[
            "class Main {",
            "function void main() {",
            "do Output.printInt(1 + 2 * 3);",
            "return;",
            "}",
            "}",
        ]);
        let add_pos = vm.iter().position(|l| l == "add").unwrap();
        let mul_pos = vm.iter().position(|l| l == "call Math.multiply 2").unwrap();
        assert!(add_pos < mul_pos);
    }

    /// Scenario S6: `let a[i] = a[j]` reads `a[j]` before overwriting
    /// `that`, using `temp 0` as the spill slot.
    #[test]
    fn array_let_spills_through_temp_zero() {
        let vm = compile(&[
            "class Main {",
            "function void main() {",
            "var Array a;",
            "var int i, j;",
            "let a[i] = a[j];",
            "return;",
            "}",
            "}",
        ]);
        assert!(vm.contains(&"pop temp 0".to_string()));
        let pop_temp = vm.iter().rposition(|l| l == "pop temp 0").unwrap();
        // The first "pop pointer 1" belongs to reading a[j] on the RHS; the
        // spill must land before the *target* address is restored, i.e. the
        // last "pop pointer 1" in the stream.
        let pop_pointer1 = vm.iter().rposition(|l| l == "pop pointer 1").unwrap();
        assert!(pop_temp < pop_pointer1);
    }

    #[test]
    fn constructor_allocates_before_body() {
        let vm = compile(&[
            "class Point {",
            "field int x, y;",
            "constructor Point new(int ax, int ay) {",
            "let x = ax;",
            "return this;",
            "}",
            "}",
        ]);
        assert_eq!(vm[0], "function Point.new 0");
        assert_eq!(vm[1], "push constant 2");
        assert_eq!(vm[2], "call Memory.alloc 1");
        assert_eq!(vm[3], "pop pointer 0");
    }

    #[test]
    fn method_binds_this_from_argument_zero() {
        let vm = compile(&[
            "class Point {",
            "field int x;",
            "method int getX() {",
            "return x;",
            "}",
            "}",
        ]);
        assert_eq!(vm[0], "function Point.getX 0");
        assert_eq!(vm[1], "push argument 0");
        assert_eq!(vm[2], "pop pointer 0");
    }

    #[test]
    fn string_constant_builds_char_by_char() {
        let vm = compile(&[
            "class Main {",
            "function void main() {",
            "do Output.printString(\"hi\");",
            "return;",
            "}",
            "}",
        ]);
        assert!(vm.contains(&"call String.new 1".to_string()));
        assert!(vm.contains(&"call String.appendChar 2".to_string()));
    }

    #[test]
    fn undeclared_variable_is_an_error() {
        let tokens = tokenize([
            "class Main {",
            "function void main() {",
            "let x = 1;",
            "return;",
            "}",
            "}",
        ])
        .unwrap();
        let err = CompilationEngine::new(tokens).compile_class().unwrap_err();
        assert!(matches!(err, Error::UndeclaredVariable { .. }));
    }
}
