#[macro_use]
extern crate clap;

use clap::{Arg, SubCommand};
use n2t::capability::{HackEmu, Hasm, Jackc, VmTranslate};

fn main() {
    let matches = app_from_crate!()
        .subcommand(
            SubCommand::with_name("assemble")
                .about("Translates Hack assembly into 16-bit binary machine code")
                .arg(Arg::with_name("FILE").required(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("translate_vm")
                .about("Expands VM instructions into Hack assembly")
                .arg(Arg::with_name("PATH").required(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("compile")
                .about("Compiles Jack source into VM instructions")
                .arg(Arg::with_name("PATH").required(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("execute")
                .about("Runs a Hack binary or assembly program and reports the final RAM state")
                .arg(Arg::with_name("FILE").required(true).index(1))
                .arg(
                    Arg::with_name("cycles")
                        .long("cycles")
                        .takes_value(true)
                        .value_name("N")
                        .help("Bounds execution to at most N ticks; omit to run to completion"),
                ),
        )
        .subcommand(
            SubCommand::with_name("disassemble")
                .about("Reconstructs plausible assembly from a Hack binary")
                .arg(Arg::with_name("FILE").required(true).index(1)),
        )
        .get_matches();

    let result = match matches.subcommand() {
        ("assemble", Some(sub)) => n2t::assemble(&Hasm, sub.value_of("FILE").unwrap()),
        ("translate_vm", Some(sub)) => n2t::translate_vm(&VmTranslate, sub.value_of("PATH").unwrap()),
        ("compile", Some(sub)) => n2t::compile(&Jackc, sub.value_of("PATH").unwrap()),
        ("execute", Some(sub)) => {
            let cycles = sub
                .value_of("cycles")
                .map(|s| s.parse::<u32>().expect("--cycles must be a non-negative integer"));
            n2t::execute(&HackEmu, sub.value_of("FILE").unwrap(), cycles)
        }
        ("disassemble", Some(sub)) => n2t::disassemble(sub.value_of("FILE").unwrap()),
        _ => {
            eprintln!("{}", matches.usage());
            std::process::exit(1);
        }
    };

    match result {
        Ok(()) => println!("Done!"),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
