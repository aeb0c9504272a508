//! Two-scope Jack symbol table: class scope (`static`/`field`) and
//! subroutine scope (`argument`/`local`), each with its own running index
//! per kind. Subroutine scope shadows class scope on lookup.

use std::collections::HashMap;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum VarKind {
    Static,
    /// Jack's `field` declarations live in the VM's `this` segment.
    This,
    Argument,
    Local,
}

impl VarKind {
    pub fn segment(self) -> &'static str {
        match self {
            VarKind::Static => "static",
            VarKind::This => "this",
            VarKind::Argument => "argument",
            VarKind::Local => "local",
        }
    }
}

#[derive(Clone, Debug)]
struct Entry {
    var_type: String,
    kind: VarKind,
    index: u16,
}

#[derive(Default)]
pub struct SymbolTable {
    class_table: HashMap<String, Entry>,
    subroutine_table: HashMap<String, Entry>,
    next_static: u16,
    next_this: u16,
    next_argument: u16,
    next_local: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Clears the subroutine scope and resets its counters; class scope
    /// and its counters are untouched.
    pub fn start_subroutine(&mut self) {
        self.subroutine_table.clear();
        self.next_argument = 0;
        self.next_local = 0;
    }

    pub fn define(&mut self, name: &str, var_type: &str, kind: VarKind) {
        let index = match kind {
            VarKind::Static => {
                let i = self.next_static;
                self.next_static += 1;
                i
            }
            VarKind::This => {
                let i = self.next_this;
                self.next_this += 1;
                i
            }
            VarKind::Argument => {
                let i = self.next_argument;
                self.next_argument += 1;
                i
            }
            VarKind::Local => {
                let i = self.next_local;
                self.next_local += 1;
                i
            }
        };
        let entry = Entry {
            var_type: var_type.to_string(),
            kind,
            index,
        };
        match kind {
            VarKind::Static | VarKind::This => {
                self.class_table.insert(name.to_string(), entry);
            }
            VarKind::Argument | VarKind::Local => {
                self.subroutine_table.insert(name.to_string(), entry);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.subroutine_table.contains_key(name) || self.class_table.contains_key(name)
    }

    fn lookup(&self, name: &str) -> Option<&Entry> {
        self.subroutine_table.get(name).or_else(|| self.class_table.get(name))
    }

    pub fn kind_of(&self, name: &str) -> Option<VarKind> {
        self.lookup(name).map(|e| e.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|e| e.var_type.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|e| e.index)
    }

    pub fn var_count(&self, kind: VarKind) -> u16 {
        match kind {
            VarKind::Static => self.next_static,
            VarKind::This => self.next_this,
            VarKind::Argument => self.next_argument,
            VarKind::Local => self.next_local,
        }
    }
}
