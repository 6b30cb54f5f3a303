// Unravel
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp::min;
use std::fmt;
use std::io;

use super::CodeWord;

fn end_of_bitstream_error<T>() -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of bitstream"))
}

mod private {
    use std::io;

    pub trait FetchBitsLtr {
        /// Discard any remaining bits in the source and fetch the next word.
        fn fetch_bits(&mut self) -> io::Result<()>;

        /// Get all the bits in the source, left-justified.
        fn get_bits(&self) -> u64;

        /// Get the number of bits left in the source.
        fn num_bits_left(&self) -> u32;

        /// Consume `num` bits from the source.
        fn consume_bits(&mut self, num: u32);
    }
}

/// A `BitCursor` is the logical read position within a codeword stream.
///
/// `word_index` is the index of the word containing the next bit to be read, and `bit_index` is
/// the position of that bit within the word, counting down from the most-significant bit
/// (`W::BITS - 1`) to the least-significant bit (0). After the least-significant bit of a word is
/// read, `bit_index` wraps back to the most-significant bit and `word_index` is incremented.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BitCursor {
    pub word_index: usize,
    pub bit_index: u32,
}

impl fmt::Display for BitCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "word {} bit {}", self.word_index, self.bit_index)
    }
}

/// A `FiniteBitStream` is a bit stream that has a known length in bits.
pub trait FiniteBitStream {
    /// Gets the number of bits left unread.
    fn bits_left(&self) -> u64;
}

/// `ReadBitsLtr` reads bits from most-significant to least-significant.
pub trait ReadBitsLtr: private::FetchBitsLtr {
    /// Gets the position of the next bit to be read.
    fn position(&self) -> BitCursor;

    /// Ignores the specified number of bits from the stream or returns an error.
    #[inline(always)]
    fn ignore_bits(&mut self, mut num_bits: u32) -> io::Result<()> {
        if num_bits <= self.num_bits_left() {
            self.consume_bits(num_bits);
        }
        else {
            // Consume whole words directly.
            while num_bits > self.num_bits_left() {
                num_bits -= self.num_bits_left();
                self.fetch_bits()?;
            }

            self.consume_bits(num_bits);
        }

        Ok(())
    }

    /// Ignores one bit from the stream or returns an error.
    #[inline(always)]
    fn ignore_bit(&mut self) -> io::Result<()> {
        self.ignore_bits(1)
    }

    /// Read a single bit as a boolean value or returns an error.
    #[inline(always)]
    fn read_bit(&mut self) -> io::Result<bool> {
        if self.num_bits_left() < 1 {
            self.fetch_bits()?;
        }

        let bit = self.get_bits() & (1 << 63) != 0;

        self.consume_bits(1);
        Ok(bit)
    }

    /// Reads up to 32-bits and returns them as an unsigned integer or returns an error.
    #[inline(always)]
    fn read_bits_leq32(&mut self, mut bit_width: u32) -> io::Result<u32> {
        debug_assert!(bit_width <= u32::BITS);

        // Shift in two 32-bit operations instead of a single 64-bit operation to avoid panicing
        // when bit_width == 0 (and thus shifting right 64-bits).
        let mut bits = (self.get_bits() >> u32::BITS) >> (u32::BITS - bit_width);

        while bit_width > self.num_bits_left() {
            bit_width -= self.num_bits_left();

            self.fetch_bits()?;

            // Unlike the first shift, bit_width is always > 0 here so this operation will never
            // shift by > 63 bits.
            bits |= self.get_bits() >> (u64::BITS - bit_width);
        }

        self.consume_bits(bit_width);

        Ok(bits as u32)
    }
}

/// `WordReaderLtr` reads bits from most-significant to least-significant from a `&[W]` of
/// codewords.
///
/// The reader never reads past `word_budget` words, nor past the end of the slice, whichever is
/// reached first. Attempting to do so returns an `UnexpectedEof` error and leaves the cursor
/// unchanged.
pub struct WordReaderLtr<'a, W: CodeWord> {
    buf: &'a [W],
    /// The index of the next word to fetch.
    next_word: usize,
    bits: u64,
    n_bits_left: u32,
}

impl<'a, W: CodeWord> WordReaderLtr<'a, W> {
    /// Instantiate a new `WordReaderLtr` that may read every word in `buf`.
    pub fn new(buf: &'a [W]) -> Self {
        Self::with_budget(buf, buf.len())
    }

    /// Instantiate a new `WordReaderLtr` that may read at most `word_budget` words from `buf`.
    pub fn with_budget(buf: &'a [W], word_budget: usize) -> Self {
        WordReaderLtr {
            buf: &buf[..min(word_budget, buf.len())],
            next_word: 0,
            bits: 0,
            n_bits_left: 0,
        }
    }

    /// Gets the number of words this reader may read in total.
    pub fn word_budget(&self) -> usize {
        self.buf.len()
    }

    /// Gets the total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        (self.next_word as u64 * u64::from(W::BITS)) - u64::from(self.n_bits_left)
    }
}

impl<W: CodeWord> private::FetchBitsLtr for WordReaderLtr<'_, W> {
    #[inline(always)]
    fn fetch_bits(&mut self) -> io::Result<()> {
        let word = match self.buf.get(self.next_word) {
            Some(&word) => word,
            None => return end_of_bitstream_error(),
        };

        self.next_word += 1;

        self.bits = word.to_u64() << (u64::BITS - W::BITS);
        self.n_bits_left = W::BITS;

        Ok(())
    }

    #[inline(always)]
    fn get_bits(&self) -> u64 {
        self.bits
    }

    #[inline(always)]
    fn num_bits_left(&self) -> u32 {
        self.n_bits_left
    }

    #[inline(always)]
    fn consume_bits(&mut self, num: u32) {
        self.n_bits_left -= num;
        // A 64-bit word may be consumed whole.
        self.bits = self.bits.checked_shl(num).unwrap_or(0);
    }
}

impl<W: CodeWord> ReadBitsLtr for WordReaderLtr<'_, W> {
    fn position(&self) -> BitCursor {
        if self.n_bits_left > 0 {
            BitCursor { word_index: self.next_word - 1, bit_index: self.n_bits_left - 1 }
        }
        else {
            BitCursor { word_index: self.next_word, bit_index: W::BITS - 1 }
        }
    }
}

impl<W: CodeWord> FiniteBitStream for WordReaderLtr<'_, W> {
    fn bits_left(&self) -> u64 {
        let words_left = (self.buf.len() - self.next_word) as u64;
        (words_left * u64::from(W::BITS)) + u64::from(self.n_bits_left)
    }
}

#[cfg(test)]
mod tests {
    use super::{BitCursor, FiniteBitStream, ReadBitsLtr, WordReaderLtr};

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn verify_wordreaderltr_read_bit() {
        let mut bs = WordReaderLtr::new(&[0b1010_0000_0000_0001u16, 0x8000]);

        assert_eq!(bs.read_bit().unwrap(), true);
        assert_eq!(bs.read_bit().unwrap(), false);
        assert_eq!(bs.read_bit().unwrap(), true);

        bs.ignore_bits(12).unwrap();

        // Last bit of the first word, then the first bit of the second.
        assert_eq!(bs.read_bit().unwrap(), true);
        assert_eq!(bs.read_bit().unwrap(), true);
        assert_eq!(bs.read_bit().unwrap(), false);

        // Error test.
        let mut bs = WordReaderLtr::<u16>::new(&[]);

        assert!(bs.read_bit().is_err());
    }

    #[test]
    fn verify_wordreaderltr_position_wraps() {
        let mut bs = WordReaderLtr::new(&[0u16, 0u16]);

        assert_eq!(bs.position(), BitCursor { word_index: 0, bit_index: 15 });

        bs.ignore_bits(15).unwrap();
        assert_eq!(bs.position(), BitCursor { word_index: 0, bit_index: 0 });

        bs.read_bit().unwrap();
        assert_eq!(bs.position(), BitCursor { word_index: 1, bit_index: 15 });
        assert_eq!(bs.bits_read(), 16);

        bs.read_bit().unwrap();
        assert_eq!(bs.position(), BitCursor { word_index: 1, bit_index: 14 });
    }

    #[test]
    fn verify_wordreaderltr_budget() {
        let words = [0xffffu16, 0xffff, 0xffff];

        // The budget is smaller than the slice.
        let mut bs = WordReaderLtr::with_budget(&words, 1);

        assert_eq!(bs.word_budget(), 1);
        assert_eq!(bs.bits_left(), 16);
        assert!(bs.ignore_bits(16).is_ok());
        assert_eq!(bs.bits_left(), 0);
        assert!(bs.read_bit().is_err());

        // The budget is larger than the slice.
        let mut bs = WordReaderLtr::with_budget(&words, 10);

        assert_eq!(bs.word_budget(), 3);
        assert!(bs.ignore_bits(48).is_ok());
        assert!(bs.read_bit().is_err());

        // A zero budget cannot supply any bits.
        let mut bs = WordReaderLtr::with_budget(&words, 0);

        assert!(bs.ignore_bits(0).is_ok());
        assert!(bs.read_bit().is_err());
        assert_eq!(bs.position(), BitCursor { word_index: 0, bit_index: 15 });
    }

    #[test]
    fn verify_wordreaderltr_read_bits_leq32() {
        let mut bs = WordReaderLtr::new(&[0b1010_0101_0111_1110u16, 0b1101_0011_0000_0000]);

        assert_eq!(bs.read_bits_leq32(4).unwrap(), 0b1010);
        assert_eq!(bs.read_bits_leq32(4).unwrap(), 0b0101);
        assert_eq!(bs.read_bits_leq32(13).unwrap(), 0b0_1111_1101_1010);
        assert_eq!(bs.read_bits_leq32(3).unwrap(), 0b011);
        assert_eq!(bs.read_bits_leq32(0).unwrap(), 0);

        // Upper limit test.
        let mut bs = WordReaderLtr::new(&[0xffffu16, 0xffff, 0x0100]);

        assert_eq!(bs.read_bits_leq32(32).unwrap(), u32::MAX);
        assert_eq!(bs.read_bits_leq32(8).unwrap(), 0x01);

        // Test error cases.
        let mut bs = WordReaderLtr::new(&[0xffffu16]);

        assert!(bs.read_bits_leq32(17).is_err());
    }

    #[test]
    fn verify_wordreaderltr_wide_words() {
        let mut bs = WordReaderLtr::new(&[u64::MAX, 1]);

        assert!(bs.ignore_bits(64).is_ok());
        assert_eq!(bs.position(), BitCursor { word_index: 1, bit_index: 63 });
        assert!(bs.ignore_bits(63).is_ok());
        assert_eq!(bs.read_bit().unwrap(), true);
        assert_eq!(bs.bits_left(), 0);
    }

    #[test]
    fn verify_wordreaderltr_word_widths_agree() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);

        let bytes: Vec<u8> = (0..64).map(|_| rng.random()).collect();
        let words: Vec<u16> =
            bytes.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect();

        let mut narrow = WordReaderLtr::new(&bytes);
        let mut wide = WordReaderLtr::new(&words);

        for _ in 0..(8 * bytes.len()) {
            assert_eq!(narrow.read_bit().unwrap(), wide.read_bit().unwrap());
        }

        assert!(narrow.read_bit().is_err());
        assert!(wide.read_bit().is_err());
    }
}
