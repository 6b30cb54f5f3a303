// Unravel
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `codecs` module provides the options common to all symbol decoders.

/// The default maximum number of symbols a single decode may produce.
pub const DEFAULT_SYMBOL_LIMIT: usize = 1 << 28;

/// `Limit` defines an upper-bound on how much of a resource should be allocated when the amount to
/// be allocated is specified by the input rather than by the caller.
///
/// All limits can be defaulted to a reasonable value. These defaults will generally not break any
/// normal stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Limit {
    /// Do not impose any limit.
    None,
    /// Use the (reasonable) default.
    Default,
    /// Specify the upper limit of the resource. Units are use-case specific.
    Maximum(usize),
}

impl Limit {
    /// Gets the numeric limit of the limit, or default value. If there is no limit, None is
    /// returned.
    pub fn limit_or_default(&self, default: usize) -> Option<usize> {
        match self {
            Limit::None => None,
            Limit::Default => Some(default),
            Limit::Maximum(max) => Some(*max),
        }
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit::Default
    }
}

/// `DecoderOptions` is a common set of options that all symbol decoders use.
#[derive(Copy, Clone, Debug, Default)]
pub struct DecoderOptions {
    /// The link table should be verified before any stream is decoded with it.
    pub verify: bool,
    /// The maximum number of symbols a single decode may produce.
    pub limit_symbols: Limit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_limit_or_default() {
        assert_eq!(Limit::None.limit_or_default(8), None);
        assert_eq!(Limit::Default.limit_or_default(8), Some(8));
        assert_eq!(Limit::Maximum(3).limit_or_default(8), Some(3));

        let opts: DecoderOptions = Default::default();
        assert!(!opts.verify);
        assert_eq!(opts.limit_symbols, Limit::Default);
    }
}
