//! Translates assembly mnemonics into binary machine code fields.
//!
//! The `comp` table is the only one of the three instruction fields with
//! more than eight entries, so it alone gets a perfect hash map; `dest` and
//! `jump` are small enough that `hack_util::Dest`/`Jump` already carry their
//! own `bits()` encoding.

use phf::phf_map;

static COMP_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "0" => "0101010",
    "1" => "0111111",
    "-1" => "0111010",
    "D" => "0001100",
    "A" => "0110000",
    "M" => "1110000",
    "!D" => "0001101",
    "!A" => "0110001",
    "!M" => "1110001",
    "-D" => "0001111",
    "-A" => "0110011",
    "-M" => "1110011",
    "D+1" => "0011111",
    "A+1" => "0110111",
    "M+1" => "1110111",
    "D-1" => "0001110",
    "A-1" => "0110010",
    "M-1" => "1110010",
    "D+A" => "0000010",
    "A+D" => "0000010",
    "D+M" => "1000010",
    "M+D" => "1000010",
    "D-A" => "0010011",
    "D-M" => "1010011",
    "A-D" => "0000111",
    "M-D" => "1000111",
    "D&A" => "0000000",
    "A&D" => "0000000",
    "D&M" => "1000000",
    "M&D" => "1000000",
    "D|A" => "0010101",
    "A|D" => "0010101",
    "D|M" => "1010101",
    "M|D" => "1010101",
};

pub fn comp_bits(mnemonic: &str) -> Option<&'static str> {
    COMP_MAP.get(mnemonic).copied()
}

/// Reverse lookup used by the disassembler. `comp` mnemonics are not
/// unique (several compute the same value via A vs D operand order), so
/// this returns the first entry whose bit pattern matches; ties are broken
/// by map iteration order, which is fine since the original mnemonic can't
/// be recovered uniquely anyway.
pub fn comp_mnemonic(bits: &str) -> Option<&'static str> {
    COMP_MAP.entries().find(|(_, v)| **v == bits).map(|(k, _)| *k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_comp_mnemonics_resolve() {
        assert_eq!(comp_bits("0"), Some("0101010"));
        assert_eq!(comp_bits("D+1"), Some("0011111"));
        assert_eq!(comp_bits("D&M"), Some("1000000"));
        assert_eq!(comp_bits("NOPE"), None);
    }

    #[test]
    fn comp_mnemonic_round_trips_for_canonical_forms() {
        assert_eq!(comp_mnemonic("0101010"), Some("0"));
        assert_eq!(comp_mnemonic("1000010"), Some("D+M"));
    }
}
