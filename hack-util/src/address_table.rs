//! The Hack symbol table: predefined registers and pointers backed by a
//! compile-time perfect hash, user-defined labels and variables backed by a
//! `HashMap`.

use std::collections::HashMap;

static PREDEFINED: phf::Map<&'static str, u16> = phf::phf_map! {
    "R0" => 0, "R1" => 1, "R2" => 2, "R3" => 3, "R4" => 4, "R5" => 5,
    "R6" => 6, "R7" => 7, "R8" => 8, "R9" => 9, "R10" => 10, "R11" => 11,
    "R12" => 12, "R13" => 13, "R14" => 14, "R15" => 15,
    "SP" => 0, "LCL" => 1, "ARG" => 2, "THIS" => 3, "THAT" => 4,
    "SCREEN" => 16384, "KBD" => 24576,
};

/// Maps symbol names to 15-bit addresses. Predefined entries can never be
/// shadowed; a name is bound to its first user-supplied address and every
/// later `add_entry` for that same name is ignored.
#[derive(Debug, Default)]
pub struct AddressTable {
    user: HashMap<String, u16>,
}

impl AddressTable {
    /// A fresh table, seeded with nothing but the predefined entries (which
    /// live in `PREDEFINED` and need no per-instance storage).
    pub fn new() -> Self {
        AddressTable {
            user: HashMap::new(),
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        PREDEFINED.contains_key(symbol) || self.user.contains_key(symbol)
    }

    pub fn get_address(&self, symbol: &str) -> Option<u16> {
        PREDEFINED.get(symbol).copied().or_else(|| self.user.get(symbol).copied())
    }

    /// First-write-wins: does nothing if `symbol` is already bound, whether
    /// predefined or user-defined.
    pub fn add_entry(&mut self, symbol: &str, address: u16) {
        if self.contains(symbol) {
            return;
        }
        self.user.insert(symbol.to_string(), address);
    }

    /// Looks up `symbol`, allocating it at `*next_address` (and bumping the
    /// cursor) if it isn't already bound. The hot path for pass-2 variable
    /// allocation in the assembler.
    pub fn get_or_insert(&mut self, symbol: &str, next_address: &mut u16) -> u16 {
        if let Some(addr) = PREDEFINED.get(symbol).copied() {
            return addr;
        }
        if let Some(&addr) = self.user.get(symbol) {
            return addr;
        }
        let addr = *next_address;
        *next_address += 1;
        self.user.insert(symbol.to_string(), addr);
        addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_symbols_resolve() {
        let t = AddressTable::new();
        assert_eq!(t.get_address("SP"), Some(0));
        assert_eq!(t.get_address("SCREEN"), Some(16384));
        assert_eq!(t.get_address("R13"), Some(13));
        assert_eq!(t.get_address("UNKNOWN"), None);
    }

    #[test]
    fn first_write_wins() {
        let mut t = AddressTable::new();
        t.add_entry("LOOP", 4);
        t.add_entry("LOOP", 99);
        assert_eq!(t.get_address("LOOP"), Some(4));

        t.add_entry("SP", 1234);
        assert_eq!(t.get_address("SP"), Some(0));
    }

    #[test]
    fn get_or_insert_allocates_once() {
        let mut t = AddressTable::new();
        let mut next = 16;
        assert_eq!(t.get_or_insert("i", &mut next), 16);
        assert_eq!(next, 17);
        assert_eq!(t.get_or_insert("i", &mut next), 16);
        assert_eq!(next, 17);
        assert_eq!(t.get_or_insert("j", &mut next), 17);
        assert_eq!(next, 18);
    }

    #[test]
    fn predefined_never_allocated() {
        let mut t = AddressTable::new();
        let mut next = 16;
        assert_eq!(t.get_or_insert("SP", &mut next), 0);
        assert_eq!(next, 16);
    }
}
