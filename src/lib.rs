//! Rox: a dynamically typed, lexically scoped scripting language.
//!
//! The pipeline is `scan` → `parse` → `resolve` → [`Interpreter::interpret`].
//! Each static stage returns its output together with a [`Diagnostics`]
//! collector; if any stage produced a diagnostic, nothing is executed.
//! [`run`] and [`run_line`] wire the stages together with that rule.

pub mod ast_printer;
pub mod callable;
pub mod environment;
pub mod error;
pub mod expr;
pub mod instance;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use log::{debug, info};

pub use error::{Diagnostics, LoxError, Result};
pub use interpreter::Interpreter;
pub use parser::{parse, parse_expression};
pub use resolver::{resolve, resolve_expression, Locals};
pub use scanner::scan;
pub use value::Value;

/// Run a whole program against `interpreter`.
///
/// Returns every lexical, syntax, and static diagnostic when any exist (the
/// program is then not executed), or the single runtime error that aborted
/// execution.
pub fn run(interpreter: &mut Interpreter, source: &str) -> std::result::Result<(), Diagnostics> {
    let (tokens, mut diagnostics) = scan(source);
    let (statements, syntax) = parse(&tokens);
    diagnostics.extend(syntax);

    // Resolving a broken tree would only add noise.
    if !diagnostics.is_empty() {
        info!("Skipping execution: {} diagnostic(s)", diagnostics.len());
        return Err(diagnostics);
    }

    let (locals, static_errors) = resolve(&statements);
    if !static_errors.is_empty() {
        info!("Skipping execution: {} static diagnostic(s)", static_errors.len());
        return Err(static_errors);
    }

    interpreter.load_locals(locals);
    interpreter.interpret(&statements).map_err(Diagnostics::from)
}

/// Run one line of interactive input.  A lone expression (no trailing `;`)
/// is evaluated and its value printed; anything else runs as a program.
pub fn run_line(
    interpreter: &mut Interpreter,
    source: &str,
) -> std::result::Result<(), Diagnostics> {
    let (tokens, diagnostics) = scan(source);

    if diagnostics.is_empty() {
        if let Some(expr) = parse_expression(&tokens) {
            debug!("Interactive input is a single expression");

            let (locals, static_errors) = resolve_expression(&expr);
            if !static_errors.is_empty() {
                return Err(static_errors);
            }

            interpreter.load_locals(locals);
            return interpreter
                .interpret_expression(&expr)
                .map(|_| ())
                .map_err(Diagnostics::from);
        }
    }

    run(interpreter, source)
}
