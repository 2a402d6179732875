use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::{Diagnostics, LoxError};
use rox::lox::{Lox, Outcome, EXIT_STATIC_ERROR};
use rox::parser::Parser;
use rox::scanner::{scan_tokens, Scanner};
use rox::token::Token;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    /// With no subcommand, run this script, or start the prompt if omitted
    filename: Option<PathBuf>,

    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token stream as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses a program from a file and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs a Lox program from a file, or starts the prompt if none is given
    Run { filename: Option<PathBuf> },
}

/// Reads the contents of a file as UTF‑8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let source = String::from_utf8(buf)
        .map_err(LoxError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn report(diagnostics: &Diagnostics) {
    for error in diagnostics {
        eprintln!("{}", error);
    }
}

/// Print an outcome's diagnostics and return its exit code.
fn finish<T>(outcome: &Outcome<T>) -> i32 {
    match outcome {
        Outcome::Success(_) => {}
        Outcome::StaticErrors(diagnostics) => report(diagnostics),
        Outcome::RuntimeError(e) => eprintln!("{}", e),
    }

    outcome.exit_code()
}

fn tokenize(filename: &Path, json: bool) -> Result<i32> {
    let source = read_file(filename)?;

    if json {
        let mut diagnostics = Diagnostics::new();
        let tokens: Vec<Token> = scan_tokens(&source, &mut diagnostics);

        report(&diagnostics);
        println!("{}", serde_json::to_string_pretty(&tokens)?);

        return Ok(if diagnostics.has_errors() { EXIT_STATIC_ERROR } else { 0 });
    }

    let mut tokenized = true;

    for result in Scanner::new(&source) {
        match result {
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    Ok(if tokenized { 0 } else { EXIT_STATIC_ERROR })
}

fn parse(filename: &Path) -> Result<i32> {
    let source = read_file(filename)?;

    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(&source, &mut diagnostics);
    let statements = Parser::new(tokens).parse(&mut diagnostics);

    if diagnostics.has_errors() {
        report(&diagnostics);
        return Ok(EXIT_STATIC_ERROR);
    }

    let printer = AstPrinter;
    for stmt in &statements {
        println!("{}", printer.print_stmt(stmt));
    }

    Ok(0)
}

fn evaluate(filename: &Path) -> Result<i32> {
    let source = read_file(filename)?;
    let mut lox = Lox::new();

    let outcome = lox.evaluate(&source);
    if let Outcome::Success(value) = &outcome {
        println!("{}", value);
    }

    Ok(finish(&outcome))
}

fn run_file(filename: &Path) -> Result<i32> {
    let source = read_file(filename)?;
    let mut lox = Lox::new();

    Ok(finish(&lox.run(&source)))
}

/// One persistent session; errors are reported and the prompt continues.
fn run_prompt() -> Result<i32> {
    info!("Starting interactive prompt");

    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush prompt")?;

        line.clear();
        if input.read_line(&mut line).context("Failed to read line")? == 0 {
            println!();
            break;
        }

        let code = finish(&lox.run(&line));
        debug!("Prompt line finished with status {}", code);
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let code = match (&args.commands, &args.filename) {
        (Some(Commands::Tokenize { filename, json }), _) => tokenize(filename, *json)?,
        (Some(Commands::Parse { filename }), _) => parse(filename)?,
        (Some(Commands::Evaluate { filename }), _) => evaluate(filename)?,
        (
            Some(Commands::Run {
                filename: Some(filename),
            }),
            _,
        )
        | (None, Some(filename)) => run_file(filename)?,
        (Some(Commands::Run { filename: None }), _) | (None, None) => run_prompt()?,
    };

    if code != 0 {
        debug!("Exiting with code {}", code);
        process::exit(code);
    }

    Ok(())
}
