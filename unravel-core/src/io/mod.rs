// Unravel
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `io` module implements bit-level reading of codeword streams.
//!
//! A codeword stream is a sequence of fixed-width unsigned words. All readers in this module
//! consume bits from most-significant to least-significant within a word, and continue into the
//! next word once a word is exhausted. The width of a word is described by the [`CodeWord`]
//! trait. The canonical width is 16 bits.

mod bit;

pub use bit::*;

/// `CodeWord` is implemented by the unsigned integer types that may make up a codeword stream.
pub trait CodeWord: Copy + Send + Sync + 'static {
    /// The number of bits in one word.
    const BITS: u32;

    /// Widens the word to 64 bits without changing its value.
    fn to_u64(self) -> u64;
}

macro_rules! impl_code_word {
    ($ty:ty) => {
        impl CodeWord for $ty {
            const BITS: u32 = <$ty>::BITS;

            #[inline(always)]
            fn to_u64(self) -> u64 {
                u64::from(self)
            }
        }
    };
}

impl_code_word!(u8);
impl_code_word!(u16);
impl_code_word!(u32);
impl_code_word!(u64);
