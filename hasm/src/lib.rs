//! Two-pass assembler for Hack machine language.
//!
//! [`assemble`] takes an iterator of source lines and returns one
//! 16-character `'0'`/`'1'` string per emitted instruction. Labels are
//! resolved in a first pass that never advances the instruction counter;
//! variables are allocated starting at RAM address 16 in a second pass that
//! also emits the binary. [`disassemble`] is the approximate inverse,
//! reconstructing `@address` / `dest=comp;jump` lines from binary input
//! (labels cannot be recovered, since they're erased by assembly).
//!
//! Every call to [`assemble`] builds a brand new symbol table — predefined
//! symbols live in a compile-time perfect hash map, so there's no shared,
//! mutable cache to reset between runs.

mod code;
mod error;
mod line;

pub use error::{Error, Result};

use hack_util::{AddressTable, Dest, EnumFromStr, Jump};
use line::Line;

pub fn assemble<I, S>(source: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<(usize, Line)> = line::preprocess(source)
        .into_iter()
        .map(|(no, text)| line::classify(no, &text).map(|l| (no, l)))
        .collect::<Result<_>>()?;

    let mut symbols = AddressTable::new();

    // Pass 1: labels only, instruction counter skips label lines entirely.
    let mut idx: u16 = 0;
    for (_, l) in &lines {
        match l {
            Line::Label(name) => symbols.add_entry(name, idx),
            _ => idx += 1,
        }
    }

    // Pass 2: resolve addresses, allocate variables from RAM[16], emit.
    let mut next_var: u16 = 16;
    let mut out = Vec::new();
    for (line_no, l) in &lines {
        match l {
            Line::Label(_) => continue,
            Line::Address(symbol) => {
                let address = if let Ok(n) = symbol.parse::<u16>() {
                    n
                } else {
                    symbols.get_or_insert(symbol, &mut next_var)
                };
                out.push(format!("0{:015b}", address));
            }
            Line::Compute { dest, comp, jump } => {
                let comp_bits =
                    code::comp_bits(comp).ok_or_else(|| Error::UnknownComp {
                        line: *line_no,
                        mnemonic: comp.clone(),
                    })?;
                let dest_bits = match dest {
                    None => Dest::null.bits(),
                    Some(m) => Dest::from_str(m)
                        .map_err(|_| Error::UnknownDest {
                            line: *line_no,
                            mnemonic: m.clone(),
                        })?
                        .bits(),
                };
                let jump_bits = match jump {
                    None => Jump::null.bits(),
                    Some(m) => Jump::from_str(m)
                        .map_err(|_| Error::UnknownJump {
                            line: *line_no,
                            mnemonic: m.clone(),
                        })?
                        .bits(),
                };
                out.push(format!(
                    "111{}{:03b}{:03b}",
                    comp_bits, dest_bits, jump_bits
                ));
            }
        }
    }

    Ok(out)
}

/// Reconstructs plausible assembly from 16-character binary lines. Labels
/// are lost in assembly, so jump targets come back out as bare `@address`
/// references rather than symbolic names.
pub fn disassemble<I, S>(hack_lines: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for (i, raw) in hack_lines.into_iter().enumerate() {
        let line_no = i + 1;
        let text = raw.as_ref();
        if text.len() != 16 || !text.chars().all(|c| c == '0' || c == '1') {
            return Err(Error::MalformedInstruction {
                line: line_no,
                text: text.to_string(),
            });
        }
        let bits = u16::from_str_radix(text, 2).unwrap();
        if bits & 0x8000 == 0 {
            out.push(format!("@{}", bits & 0x7FFF));
            continue;
        }
        let comp_field = &text[3..10];
        let dest_field = &text[10..13];
        let jump_field = &text[13..16];

        let comp = code::comp_mnemonic(comp_field).ok_or_else(|| Error::UnknownComp {
            line: line_no,
            mnemonic: comp_field.to_string(),
        })?;
        let dest = Dest::from_bits(u8::from_str_radix(dest_field, 2).unwrap());
        let jump = Jump::from_bits(u8::from_str_radix(jump_field, 2).unwrap());

        let mut rendered = String::new();
        if dest != Dest::null {
            rendered.push_str(dest.mnemonic());
            rendered.push('=');
        }
        rendered.push_str(comp);
        if jump != Jump::null {
            rendered.push(';');
            rendered.push_str(jump.mnemonic());
        }
        out.push(rendered);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scenario S1: Add.asm, two A-instructions and one C-instruction per
    /// addition, no labels.
    #[test]
    fn assembles_add() {
        let source = ["@2", "D=A", "@3", "D=D+A", "@0", "M=D"];
        let expected = [
            "0000000000000010",
            "1110110000010000",
            "0000000000000011",
            "1110000010010000",
            "0000000000000000",
            "1110001100001000",
        ];
        assert_eq!(assemble(source).unwrap(), expected);
    }

    /// Scenario S2: a forward-referenced label must resolve to the
    /// instruction index right after its own `(LABEL)` line.
    #[test]
    fn resolves_forward_label() {
        let source = ["@LOOP", "0;JMP", "(LOOP)", "@0", "M=0"];
        let out = assemble(source).unwrap();
        // @LOOP -> address 1 (the instruction after "(LOOP)")
        assert_eq!(out[0], "0000000000000001");
    }

    #[test]
    fn allocates_variables_from_sixteen() {
        let source = ["@foo", "@bar", "@foo"];
        let out = assemble(source).unwrap();
        assert_eq!(out[0], "0000000000010000");
        assert_eq!(out[1], "0000000000010001");
        assert_eq!(out[2], "0000000000010000");
    }

    #[test]
    fn predefined_symbols_are_not_reallocated() {
        let source = ["@SCREEN", "@SP"];
        let out = assemble(source).unwrap();
        assert_eq!(out[0], "0100000000000000");
        assert_eq!(out[1], "0000000000000000");
    }

    #[test]
    fn fresh_table_per_call_is_idempotent() {
        let source = ["@foo", "D=A"];
        assert_eq!(assemble(source).unwrap(), assemble(source).unwrap());
    }

    #[test]
    fn unknown_comp_is_an_error() {
        let source = ["D=FROB"];
        assert!(matches!(
            assemble(source),
            Err(Error::UnknownComp { line: 1, .. })
        ));
    }

    #[test]
    fn disassemble_reconstructs_compute_lines() {
        let asm = ["D=A", "0;JMP", "M=D"];
        let binary = assemble(
            ["@0"].iter().copied().chain(asm.iter().copied()),
        )
        .unwrap();
        let back = disassemble(&binary[1..]).unwrap();
        assert_eq!(back, vec!["D=A", "0;JMP", "M=D"]);
    }
}
