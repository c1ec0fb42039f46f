use std::error;
use std::fmt::{self, Display};

use crate::diagnostics::Diagnostics;

/// Failure of `parse_str`, carrying every diagnostic of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ScanError(Diagnostics),
    ParseError(Diagnostics),
}

impl Error {
    pub fn diagnostics(&self) -> &Diagnostics {
        match *self {
            Error::ScanError(ref d) | Error::ParseError(ref d) => d,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ScanError(ref d) => write!(f, "failed to scan:\n{}", d),
            Error::ParseError(ref d) => write!(f, "failed to parse:\n{}", d),
        }
    }
}

impl error::Error for Error {}
