//! File discovery, IO, and JSON shaping for the four core stage crates.
//!
//! Everything in this crate is an "external collaborator" per the core's
//! contract: the stage crates (`hasm`, `vmtranslate`, `jackc`, `hack-emu`)
//! only ever see already-read line iterators and only ever hand back
//! already-produced line vectors. This crate is the only place that opens a
//! file, walks a directory, or shapes a `serde_json::Value`.

pub mod capability;

use capability::{Assemble, Compile, Emulate, Translate};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum IOErrorContext {
    ReadInput,
    WriteOutput,
    ListDirectory,
}

#[derive(Debug)]
pub enum Error {
    Io(io::Error, IOErrorContext, PathBuf),
    Stage(String),
    UnrecognizedExtension(PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => write!(
                f,
                "{} \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteOutput => "Writing output",
                    IOErrorContext::ListDirectory => "Listing directory",
                },
                path.display(),
                err
            ),
            Error::Stage(msg) => write!(f, "{}", msg),
            Error::UnrecognizedExtension(path) => {
                write!(f, "\"{}\" has no extension this command understands", path.display())
            }
        }
    }
}

impl std::error::Error for Error {}

fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    let text = fs::read_to_string(path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, path.to_owned()))?;
    Ok(text.lines().map(str::to_string).collect())
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), Error> {
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(path, body).map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, path.to_owned()))
}

/// Every file in `dir` with the given extension, sorted by file name so
/// directory-mode runs are deterministic regardless of the host
/// filesystem's own iteration order.
fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|err| Error::Io(err, IOErrorContext::ListDirectory, dir.to_owned()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    paths.sort();
    Ok(paths)
}

fn file_stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string()
}

/// `assemble <file.asm>` — `.asm` -> `.hack`, alongside the source.
pub fn assemble(assembler: &dyn Assemble, input: &str) -> Result<(), Error> {
    let path = Path::new(input);
    let lines = read_lines(path)?;
    let hack = assembler.assemble(&lines).map_err(Error::Stage)?;
    write_lines(&path.with_extension("hack"), &hack)
}

/// `translate_vm <file-or-dir>` — a single `.vm` file translates alongside
/// the source; a directory collects every `.vm` file and emits one
/// `<dirname>.asm`, with the `Sys.init` bootstrap per the directory-mode
/// contract.
pub fn translate_vm(translator: &dyn Translate, input: &str) -> Result<(), Error> {
    let path = Path::new(input);
    let (files, output_path, directory_mode) = if path.is_dir() {
        let vm_files = discover(path, "vm")?;
        let mut files = Vec::new();
        for vm_path in &vm_files {
            files.push((file_stem(vm_path), read_lines(vm_path)?));
        }
        let dir_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("out")
            .to_string();
        (files, path.join(format!("{}.asm", dir_name)), true)
    } else {
        let lines = read_lines(path)?;
        (vec![(file_stem(path), lines)], path.with_extension("asm"), false)
    };
    let asm = translator.translate(files, directory_mode).map_err(Error::Stage)?;
    write_lines(&output_path, &asm)
}

/// `compile <file-or-dir>` — every `.jack` file compiles to a sibling
/// `.vm` file; a directory compiles every class it contains.
pub fn compile(compiler: &dyn Compile, input: &str) -> Result<(), Error> {
    let path = Path::new(input);
    let jack_files = if path.is_dir() {
        discover(path, "jack")?
    } else {
        vec![path.to_owned()]
    };
    for jack_path in jack_files {
        let lines = read_lines(&jack_path)?;
        let vm = compiler.compile(&lines).map_err(Error::Stage)?;
        write_lines(&jack_path.with_extension("vm"), &vm)?;
    }
    Ok(())
}

/// `execute <file.hack|.asm> [--cycles N]` — assembles `.asm` input
/// internally (the emulator's only cross-stage dependency), steps for
/// `cycles` ticks (or to completion), and writes the write log as a JSON
/// trace with a single `"RAM"` key.
pub fn execute(emulator: &dyn Emulate, input: &str, cycles: Option<u32>) -> Result<(), Error> {
    let path = Path::new(input);
    let lines = read_lines(path)?;
    let is_asm = path.extension().and_then(|e| e.to_str()) == Some("asm");
    let log = emulator.emulate(&lines, is_asm, cycles).map_err(Error::Stage)?;
    write_lines(&path.with_extension("json"), &[render_trace(&log)])
}

/// `disassemble <file.hack>` — the inverse of `assemble`; reconstructs
/// plausible `.asm` text (without symbolic labels) alongside the source.
/// Not one of the four dispatch capabilities: disassembly only ever
/// belongs to `hasm`, so it's called directly rather than through a `dyn`
/// collaborator.
pub fn disassemble(input: &str) -> Result<(), Error> {
    let path = Path::new(input);
    let lines = read_lines(path)?;
    let asm = hasm::disassemble(&lines).map_err(|e| Error::Stage(e.to_string()))?;
    write_lines(&path.with_extension("asm"), &asm)
}

fn render_trace(log: &BTreeMap<u16, u16>) -> String {
    let ram: serde_json::Map<String, serde_json::Value> = log
        .iter()
        .map(|(addr, value)| (addr.to_string(), json!(value)))
        .collect();
    serde_json::to_string_pretty(&json!({ "RAM": ram })).expect("RAM trace is always valid JSON")
}
