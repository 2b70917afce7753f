//! Runtime error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the program entry.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The program file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An environment variable held an invalid value.
    #[error("invalid {variable}: {message}")]
    Config {
        /// Name of the offending variable.
        variable: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Loading or executing the program failed.
    #[error(transparent)]
    Vm(#[from] concuma_foundation::Error),
}

impl RuntimeError {
    /// Formats the error the way the `concuma` binary prints it.
    ///
    /// VM errors print as `RuntimeError: <message>` followed by the offset of
    /// the failing statement and the user functions the error unwound through.
    #[must_use]
    pub fn report(&self) -> String {
        let Self::Vm(err) = self else {
            return format!("Error: {self}");
        };
        let mut report = format!("RuntimeError: {}", err.kind);
        let context = err.context.as_ref().map(ToString::to_string);
        if let Some(context) = context.as_deref().map(str::trim_end) {
            if !context.is_empty() {
                report.push('\n');
                report.push_str(context);
            }
        }
        report
    }
}
