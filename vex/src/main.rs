#[macro_use]
extern crate clap;

use std::fs;
use std::sync::atomic::AtomicBool;

use clap::Arg;

use vcpu::registers::register_by_index;

#[derive(Debug)]
enum Error {
    Io(std::io::Error, String),
    Vcpu(vcpu::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, path) => write!(f, "file \"{}\": {}", path, err),
            Error::Vcpu(err) => write!(f, "{}", err),
        }
    }
}

impl From<vcpu::Error> for Error {
    fn from(err: vcpu::Error) -> Error {
        Error::Vcpu(err)
    }
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the assembly source file to load")
                .index(1),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap_or("multiplication.s");

    if let Err(err) = run(input) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(input: &str) -> Result<(), Error> {
    let source = fs::read_to_string(input).map_err(|err| Error::Io(err, input.to_string()))?;
    println!("Loaded File: {}", input);
    println!("{}", source);

    let (instructions, labels) = vasm::parse(&source)?;
    let image = vasm::encode(&instructions, &labels)?;
    println!("Assembly Result:");
    println!("{}", image);

    let decoded = vasm::decode(&image)?;
    let disassembly = vasm::disassemble(&decoded);
    println!("Disassembly Result:");
    println!("{}", disassembly);

    let (reparsed, relabels) = vasm::parse(&disassembly)?;
    let reassembled = vasm::encode(&reparsed, &relabels)?;
    println!("Re-Assembly Result:");
    println!("{}", reassembled);

    let mut simulator = vex::Simulator::decode(&image)?;
    simulator.run(&AtomicBool::new(false))?;

    println!("Simulation Result:");
    println!("PC = {}", simulator.get_pc());
    let regs = simulator.get_regfile();
    for index in 0..regs.size() {
        let name = register_by_index(index as u32)
            .map(|id| id.to_string().to_ascii_lowercase())
            .unwrap_or_default();
        println!("  ${:<2} {:<5} = {}", index, name, regs.get(index));
    }

    Ok(())
}
