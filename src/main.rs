use std::{
    fs::read_to_string,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::Parser as ClapParser;
use log::{info, LevelFilter, Log, Metadata, Record};
use monkey_front::{
    display_error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

/// Tokenize and parse a program, printing its canonical form.
#[derive(ClapParser, Debug)]
#[command(name = "monkey-front", version)]
struct Cli {
    /// Source file to parse. Standard input is read when neither a file nor
    /// --eval is given.
    file: Option<PathBuf>,

    /// Parse inline source instead of a file
    #[arg(short, long, conflicts_with = "file")]
    eval: Option<String>,

    /// Print the token stream instead of the parsed program
    #[arg(long)]
    tokens: bool,

    /// Log parser progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }

    let (source, file_name) = match read_source(&cli) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: could not read input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.tokens {
        for token in tokenize(source, Some(file_name)) {
            token.debug();
        }
        return ExitCode::SUCCESS;
    }

    let start = Instant::now();
    let (program, errors) = parse(source.clone(), Some(file_name));
    info!("Parsed in {:?}", start.elapsed());

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{}", error);
        }
        for error in &errors {
            display_error(error, &source);
        }
        return ExitCode::FAILURE;
    }

    println!("{}", program);

    ExitCode::SUCCESS
}

fn read_source(cli: &Cli) -> io::Result<(String, String)> {
    if let Some(code) = &cli.eval {
        return Ok((code.clone(), String::from("eval")));
    }

    if let Some(path) = &cli.file {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        return Ok((read_to_string(path)?, file_name));
    }

    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;
    Ok((source, String::from("stdin")))
}
