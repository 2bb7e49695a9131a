//! Crate-wide error type.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CrackError>;

/// Every failure mode the toolkit can report.
#[derive(Error, Debug)]
pub enum CrackError {
    #[error("usage: cracker <rounds> <infile> <outfile> ({message})")]
    Usage { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse tuple line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("need at least two distinct tuples for {rounds}-round attack, found {found}")]
    InsufficientTuples { rounds: u32, found: usize },

    #[error("no candidate pairs survived the {rounds}-round filter")]
    NoCandidatePairs { rounds: u32 },

    #[error("worker ran out of resources: {message}")]
    Resource { message: String },

    #[error("internal invariant violated: {message}")]
    InternalInvariant { message: String },
}

impl CrackError {
    pub fn usage(message: impl Into<String>) -> Self {
        CrackError::Usage {
            message: message.into(),
        }
    }

    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        CrackError::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub fn insufficient_tuples(rounds: u32, found: usize) -> Self {
        CrackError::InsufficientTuples { rounds, found }
    }

    pub fn no_candidate_pairs(rounds: u32) -> Self {
        CrackError::NoCandidatePairs { rounds }
    }

    pub fn io(message: impl Into<String>) -> Self {
        CrackError::Io(std::io::Error::other(message.into()))
    }

    pub fn resource(message: impl Into<String>) -> Self {
        CrackError::Resource {
            message: message.into(),
        }
    }

    pub fn internal_invariant(message: impl Into<String>) -> Self {
        CrackError::InternalInvariant {
            message: message.into(),
        }
    }

    /// Whether the run as a whole must stop, versus a single worker backing off.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CrackError::Parse { .. } | CrackError::Resource { .. })
    }

    /// A clean "no keys found" outcome still exits 0, unlike every other error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            CrackError::NoCandidatePairs { .. } => 0,
            _ => 1,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            CrackError::Usage { .. } => "usage",
            CrackError::Io(_) => "io",
            CrackError::Parse { .. } => "parse",
            CrackError::InsufficientTuples { .. } => "insufficient_tuples",
            CrackError::NoCandidatePairs { .. } => "no_candidate_pairs",
            CrackError::Resource { .. } => "resource",
            CrackError::InternalInvariant { .. } => "internal_invariant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_not_fatal() {
        let e = CrackError::parse(12, "bad hex");
        assert!(!e.is_fatal());
        assert_eq!(e.category(), "parse");
    }

    #[test]
    fn resource_errors_are_not_fatal() {
        let e = CrackError::resource("bucket pool allocation failed");
        assert!(!e.is_fatal());
    }

    #[test]
    fn usage_and_invariant_errors_are_fatal() {
        assert!(CrackError::usage("bad arg count").is_fatal());
        assert!(CrackError::internal_invariant("counter overflow").is_fatal());
    }

    #[test]
    fn exit_codes() {
        assert_eq!(CrackError::no_candidate_pairs(6).exit_code(), 0);
        assert_eq!(CrackError::usage("x").exit_code(), 1);
        assert_eq!(CrackError::insufficient_tuples(2, 1).exit_code(), 1);
    }
}
