// Unravel
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// `Error` provides an enumeration of all possible errors reported by Unravel.
#[derive(Debug)]
pub enum Error {
    /// An IO error occured while loading the inputs of a decode.
    IoError(std::io::Error),
    /// The codeword stream ran out of bits while a node still needed to be resolved. The first
    /// `decoded` symbols of the output were fully decoded before the failure.
    OutOfBits { decoded: usize },
    /// The traversal reached a node id outside of the link table, or the link table failed
    /// verification at the given node.
    MalformedTree { node: usize },
    /// The inputs of a decode were malformed and could not be used.
    DecodeError(&'static str),
    /// A default or user-defined limit was reached while decoding the stream. Limits are used to
    /// prevent denial-of-service attacks from malicious inputs.
    LimitError(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::OutOfBits { decoded } => {
                write!(f, "out of code bits after {} decoded symbols", decoded)
            }
            Error::MalformedTree { node } => {
                write!(f, "malformed link table at node {}", node)
            }
            Error::DecodeError(msg) => {
                write!(f, "malformed input: {}", msg)
            }
            Error::LimitError(constraint) => {
                write!(f, "limit reached: {}", constraint)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            Error::OutOfBits { .. } => None,
            Error::MalformedTree { .. } => None,
            Error::DecodeError(_) => None,
            Error::LimitError(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create an out-of-bits error.
pub fn out_of_bits_error<T>(decoded: usize) -> Result<T> {
    Err(Error::OutOfBits { decoded })
}

/// Convenience function to create a malformed tree error.
pub fn malformed_tree_error<T>(node: usize) -> Result<T> {
    Err(Error::MalformedTree { node })
}

/// Convenience function to create a decode error.
pub fn decode_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::DecodeError(desc))
}

/// Convenience function to create a limit error.
pub fn limit_error<T>(constraint: &'static str) -> Result<T> {
    Err(Error::LimitError(constraint))
}
