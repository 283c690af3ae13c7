#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum Error {
    Vasm(vcpu::Error),
    Io(std::io::Error, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, path) => write!(f, "file \"{}\": {}", path.display(), err),
            Error::Vasm(err) => write!(f, "{}", err),
        }
    }
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the assembly source file to assemble")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Sets the hex image file to write to"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("output");

    if let Err(err) = run(input, output) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(input: &str, output: Option<&str>) -> Result<(), Error> {
    let input_path = Path::new(input);
    log::info!("reading {}", input_path.display());
    let source = fs::read_to_string(input_path).map_err(|err| Error::Io(err, input_path.to_owned()))?;

    let image = vasm::assemble(&source).map_err(Error::Vasm)?;

    let output_path: PathBuf = output
        .map(PathBuf::from)
        .unwrap_or_else(|| input_path.with_extension("hex"));

    log::info!("writing {}", output_path.display());
    fs::write(&output_path, image).map_err(|err| Error::Io(err, output_path))
}
