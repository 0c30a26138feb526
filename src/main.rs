use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::{Diagnostics, LoxError};
use rox::interpreter::Interpreter;
use rox::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to rox.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print one JSON object per token
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a program and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Rox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt
    Repl,
}

const EXIT_STATIC_ERROR: i32 = 65;
const EXIT_RUNTIME_ERROR: i32 = 70;

/// Reads the contents of a file as UTF‑8 text
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    let bytes = reader
        .read_to_string(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("rox.log").context("Failed to create rox.log")?;

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

    info!("Logger initialized, writing to rox.log");
    Ok(())
}

// ─────────────────────────────── diagnostics ────────────────────────────────

/// 1‑based (line, column) of a byte offset, plus the text of that line.
fn locate(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    let line = source[..offset].matches('\n').count() + 1;
    let column = source[line_start..offset].chars().count() + 1;

    (line, column, &source[line_start..line_end])
}

fn report(source: &str, error: &LoxError, with_context: bool) {
    let kind = if error.is_runtime() { "Runtime error" } else { "Error" };

    let Some(offset) = error.offset() else {
        eprintln!("{}: {}", kind, error);
        return;
    };

    let (line, column, text) = locate(source, offset);

    eprintln!("[line {}:{}] {}: {}", line, column, kind, error.message());

    if with_context {
        let prefix = format!("    {} | ", line);
        eprintln!("{}{}", prefix, text);
        eprintln!("{}^-- Here", " ".repeat(prefix.len() + column - 1));
    }
}

fn report_all(source: &str, diagnostics: &Diagnostics, with_context: bool) {
    for error in diagnostics {
        debug!("Diagnostic: {}", error);
        report(source, error, with_context);
    }
}

fn exit_code(diagnostics: &Diagnostics) -> i32 {
    if diagnostics.iter().any(LoxError::is_runtime) {
        EXIT_RUNTIME_ERROR
    } else {
        EXIT_STATIC_ERROR
    }
}

// ──────────────────────────────── commands ──────────────────────────────────

fn tokenize(source: &str, json: bool) -> Result<i32> {
    let mut status = 0;

    for item in Scanner::new(source) {
        match item {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                status = EXIT_STATIC_ERROR;
                report(source, &e, false);
            }
        }
    }

    Ok(status)
}

fn parse(source: &str) -> i32 {
    let (tokens, mut diagnostics) = rox::scan(source);
    let (statements, syntax) = rox::parse(&tokens);
    diagnostics.extend(syntax);

    if !diagnostics.is_empty() {
        report_all(source, &diagnostics, true);
        return EXIT_STATIC_ERROR;
    }

    println!("{}", AstPrinter.print_program(&statements));
    0
}

fn evaluate(source: &str) -> i32 {
    let (tokens, diagnostics) = rox::scan(source);

    if !diagnostics.is_empty() {
        report_all(source, &diagnostics, true);
        return EXIT_STATIC_ERROR;
    }

    let Some(expr) = rox::parse_expression(&tokens) else {
        let (_, syntax) = rox::parse(&tokens);
        if syntax.is_empty() {
            eprintln!("Input is not a single expression.");
        }
        report_all(source, &syntax, true);
        return EXIT_STATIC_ERROR;
    };

    let (locals, static_errors) = rox::resolve_expression(&expr);
    if !static_errors.is_empty() {
        report_all(source, &static_errors, true);
        return EXIT_STATIC_ERROR;
    }

    let mut interpreter = Interpreter::new();
    interpreter.load_locals(locals);

    match interpreter.interpret_expression(&expr) {
        Ok(value) => {
            debug!("Evaluated to: {}", value);
            0
        }
        Err(e) => {
            report(source, &e, true);
            EXIT_RUNTIME_ERROR
        }
    }
}

fn run(source: &str) -> i32 {
    let mut interpreter = Interpreter::new();

    match rox::run(&mut interpreter, source) {
        Ok(()) => {
            info!("Program executed successfully");
            0
        }
        Err(diagnostics) => {
            report_all(source, &diagnostics, true);
            exit_code(&diagnostics)
        }
    }
}

fn repl() -> Result<i32> {
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        if line.is_empty() {
            break;
        }

        if let Err(diagnostics) = rox::run_line(&mut interpreter, &line) {
            // a runtime error in the prompt needs no caret: the line is right there
            let runtime = diagnostics.iter().any(LoxError::is_runtime);
            report_all(&line, &diagnostics, !runtime);
        }
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let status: i32 = match &args.commands {
        Commands::Tokenize { filename, json } => tokenize(&read_file(filename)?, *json)?,
        Commands::Parse { filename } => parse(&read_file(filename)?),
        Commands::Evaluate { filename } => evaluate(&read_file(filename)?),
        Commands::Run { filename } => run(&read_file(filename)?),
        Commands::Repl => repl()?,
    };

    if status != 0 {
        debug!("Exiting with code {}", status);
        std::process::exit(status);
    }

    Ok(())
}
