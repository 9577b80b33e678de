//! Error taxonomy and process exit codes.
//!
//! Most of the pipeline propagates `anyhow::Error` with context attached at each
//! step. The few failures that change how the process exits are modelled here so
//! that `main` can pick an exit code by walking the error chain:
//!
//! - `1`: invalid arguments, I/O failures and anything unclassified
//! - `2`: the user cancelled (Ctrl-C, interrupted read or unexpected end of input)
//! - `3`: the output pipe was closed underneath us

use std::process::ExitStatus;
use thiserror::Error;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CANCELLED: u8 = 2;
pub const EXIT_BROKEN_PIPE: u8 = 3;

#[derive(Error, Debug)]
pub enum Error {
    /// The user supplied an argument we can't work with.
    #[error("Invalid argument, {0}")]
    InvalidArgument(String),

    #[error("User cancelled.")]
    Cancelled,

    #[error("Broken pipe, input/output was interrupted.")]
    BrokenPipe,

    /// The external HTML-to-PDF program ran but reported failure.
    #[error("`{program}` failed ({status}): {stderr}")]
    Renderer {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

impl Error {
    /// Build the error for a style name that isn't in `available`.
    pub fn unknown_style(name: &str, available: &[String]) -> Error {
        Error::InvalidArgument(format!(
            "Unknown style name: {name}\nExpecting:\n    {}",
            available.join("\n    ")
        ))
    }
}

/// Pick the process exit code for an error, looking through its whole chain.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<Error>() {
            return match e {
                Error::InvalidArgument(_) | Error::Renderer { .. } => EXIT_FAILURE,
                Error::Cancelled => EXIT_CANCELLED,
                Error::BrokenPipe => EXIT_BROKEN_PIPE,
            };
        }
        if let Some(e) = cause.downcast_ref::<std::io::Error>() {
            match e.kind() {
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::UnexpectedEof => {
                    return EXIT_CANCELLED
                }
                std::io::ErrorKind::BrokenPipe => return EXIT_BROKEN_PIPE,
                _ => {}
            }
        }
    }
    EXIT_FAILURE
}

/// Lift the I/O failures that decide the exit code into [`Error`]; anything
/// else passes through untouched.
pub fn classify_io(err: std::io::Error) -> anyhow::Error {
    match err.kind() {
        std::io::ErrorKind::BrokenPipe => Error::BrokenPipe.into(),
        std::io::ErrorKind::Interrupted | std::io::ErrorKind::UnexpectedEof => {
            Error::Cancelled.into()
        }
        _ => err.into(),
    }
}

/// The message shown to the user for an error.
///
/// Classified errors print on their own; everything else gets the full context
/// chain so the offending file and the OS message both show up.
pub fn user_message(err: &anyhow::Error) -> String {
    match exit_code(err) {
        EXIT_CANCELLED => format!("\n{}\n", Error::Cancelled),
        EXIT_BROKEN_PIPE => format!("\n{}\n", Error::BrokenPipe),
        _ => match err.downcast_ref::<Error>() {
            Some(e @ Error::InvalidArgument(_)) => e.to_string(),
            _ => format!("{}: {err:#}", console::style("Error").red()),
        },
    }
}
