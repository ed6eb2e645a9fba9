//! Hard error taxonomy for the thumbnailing pipeline.
//!
//! These are *hard* failures only: the input could not be read, its data is
//! corrupt beyond decoder tolerance, the options are invalid, or a decoder
//! crashed inside the isolation boundary. The expected "no thumbnail for this
//! input" cases (unrecognized format, archive, audio without cover art) are
//! not errors — they come back as [`Outcome::Skipped`](crate::Outcome::Skipped)
//! on the ordinary return path.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbError {
    /// The input stream could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The format was recognized, but the content is invalid beyond what the
    /// decoder tolerates.
    #[error("corrupt or undecodable data: {0}")]
    Corrupt(String),

    /// A decode backend terminated abnormally and the fault-isolation
    /// boundary intercepted it. The calling process stays alive.
    #[error("decoder crashed: {0}")]
    DecodeCrash(String),

    /// Caller-supplied options violate their invariants.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
