use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for setup, configuration and file handling.
///
/// The collision engine itself never fails on a trajectory: geometric edge cases degrade
/// to "no contact". Everything that can go wrong happens before the engine runs (bad
/// physical parameters, malformed input records) or around it (I/O).
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Malformed record in an input file.
    #[error("bad format at line {line}: {msg}")]
    Format { line: usize, msg: String },

    /// Random placement ran out of tries before every particle fit.
    #[error("could only place {placed} of {requested} particles without overlap; try fewer particles or a larger box")]
    Placement { placed: usize, requested: usize },

    /// Propagated I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
