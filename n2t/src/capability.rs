//! One capability trait per core stage, each a single-method contract over
//! lines in, lines out. `main` holds a boxed collaborator per trait rather
//! than naming the stage crates directly, so dispatch stays a matter of
//! "which capability does this subcommand need" instead of reaching into
//! `hasm`/`vmtranslate`/`jackc`/`hack_emu` by name at every call site.

use std::collections::BTreeMap;

pub trait Assemble {
    fn assemble(&self, lines: &[String]) -> Result<Vec<String>, String>;
}

pub trait Translate {
    /// `directory_mode` selects between the two contracts: a single
    /// per-file translation (no bootstrap) when `false`, or a whole
    /// directory sharing one `Translator`'s counters and opening with the
    /// `SP`/`Sys.init` bootstrap when `true`.
    fn translate(&self, files: Vec<(String, Vec<String>)>, directory_mode: bool) -> Result<Vec<String>, String>;
}

pub trait Compile {
    fn compile(&self, lines: &[String]) -> Result<Vec<String>, String>;
}

pub trait Emulate {
    fn emulate(&self, lines: &[String], is_asm: bool, cycles: Option<u32>) -> Result<BTreeMap<u16, u16>, String>;
}

pub struct Hasm;

impl Assemble for Hasm {
    fn assemble(&self, lines: &[String]) -> Result<Vec<String>, String> {
        hasm::assemble(lines).map_err(|e| e.to_string())
    }
}

pub struct VmTranslate;

impl Translate for VmTranslate {
    fn translate(&self, files: Vec<(String, Vec<String>)>, directory_mode: bool) -> Result<Vec<String>, String> {
        let mut translator = vmtranslate::Translator::new();
        if directory_mode {
            let files: Vec<(&str, Vec<String>)> =
                files.iter().map(|(stem, lines)| (stem.as_str(), lines.clone())).collect();
            translator.translate_program(files).map_err(|e| e.to_string())
        } else {
            let (stem, lines) = files.into_iter().next().expect("per-file mode needs exactly one file");
            translator.translate_file(&stem, lines).map_err(|e| e.to_string())
        }
    }
}

pub struct Jackc;

impl Compile for Jackc {
    fn compile(&self, lines: &[String]) -> Result<Vec<String>, String> {
        jackc::compile(lines).map_err(|e| e.to_string())
    }
}

pub struct HackEmu;

impl Emulate for HackEmu {
    fn emulate(&self, lines: &[String], is_asm: bool, cycles: Option<u32>) -> Result<BTreeMap<u16, u16>, String> {
        if is_asm {
            hack_emu::run_asm(lines, cycles).map_err(|e| e.to_string())
        } else {
            hack_emu::run_hack(lines, cycles).map_err(|e| e.to_string())
        }
    }
}
