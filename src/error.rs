//! Centralised error hierarchy for the **Rox interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  Every
//! language-level variant carries an absolute byte `offset` into the source
//! text; turning that into a line/column pair is the front‑end's job.
//!
//! Static stages never stop at the first problem: they push into a
//! [`Diagnostics`] collector and hand it back to the caller, which decides
//! whether execution may proceed.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::debug;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error: unexpected character or unterminated string.
    #[error("[offset {offset}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 0‑based byte offset of the offending lexeme.
        offset: usize,
    },

    /// Syntactic (parser) error.
    #[error("[offset {offset}] Error: {message}")]
    Parse { message: String, offset: usize },

    /// Static‑analysis failure found by the resolver.
    #[error("[offset {offset}] Error: {message}")]
    Resolve { message: String, offset: usize },

    /// Runtime evaluation error.  Aborts the current `interpret` call.
    #[error("[offset {offset}] Runtime error: {message}")]
    Runtime { message: String, offset: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Lex error: offset={}, msg={}", offset, message);

        LoxError::Lex { message, offset }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Parse error: offset={}, msg={}", offset, message);

        LoxError::Parse { message, offset }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Resolve error: offset={}, msg={}", offset, message);

        LoxError::Resolve { message, offset }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Runtime error: offset={}, msg={}", offset, message);

        LoxError::Runtime { message, offset }
    }

    /// Source offset of the diagnostic, when it refers to script text.
    pub fn offset(&self) -> Option<usize> {
        match self {
            LoxError::Lex { offset, .. }
            | LoxError::Parse { offset, .. }
            | LoxError::Resolve { offset, .. }
            | LoxError::Runtime { offset, .. } => Some(*offset),
            LoxError::Io(_) => None,
        }
    }

    /// Message text without the position prefix.
    pub fn message(&self) -> String {
        match self {
            LoxError::Lex { message, .. }
            | LoxError::Parse { message, .. }
            | LoxError::Resolve { message, .. }
            | LoxError::Runtime { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, LoxError::Runtime { .. })
    }
}

/// Ordered collection of diagnostics produced by one pipeline stage.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: LoxError) {
        self.errors.push(error);
    }

    /// Append every diagnostic of `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoxError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<LoxError> {
        self.errors
    }
}

impl From<LoxError> for Diagnostics {
    fn from(error: LoxError) -> Self {
        Diagnostics {
            errors: vec![error],
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = LoxError;
    type IntoIter = std::vec::IntoIter<LoxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a LoxError;
    type IntoIter = std::slice::Iter<'a, LoxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
