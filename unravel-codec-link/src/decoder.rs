// Unravel
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use unravel_core::codecs::{DecoderOptions, DEFAULT_SYMBOL_LIMIT};
use unravel_core::errors::{limit_error, malformed_tree_error, out_of_bits_error, Error, Result};
use unravel_core::io::{CodeWord, ReadBitsLtr, WordReaderLtr};
use unravel_core::tree::{LinkTable, Node, ROOT_NODE};

use log::{debug, warn};

/// Decodes `xsz` symbols from the first `word_budget` words of `stream` using `link_table`.
///
/// Bits are consumed from the most-significant to the least-significant bit of each word, and
/// decoding continues into the next word once a word is exhausted. Returns an `OutOfBits` error if
/// the stream runs out of bits before `xsz` symbols are decoded.
pub fn decode<W: CodeWord>(
    stream: &[W],
    link_table: &LinkTable,
    word_budget: usize,
    xsz: usize,
) -> Result<Vec<u64>> {
    let mut bs = WordReaderLtr::with_budget(stream, word_budget);

    let mut out = vec![0; xsz];
    decode_into(&mut bs, link_table, &mut out)?;

    Ok(out)
}

/// Decodes exactly `out.len()` symbols from `bs` into `out` using `link_table`.
///
/// If an error is returned, the symbols decoded before the failure remain in `out`. For an
/// `OutOfBits` error, the number of such symbols is reported by the error.
pub fn decode_into<B: ReadBitsLtr>(
    bs: &mut B,
    link_table: &LinkTable,
    out: &mut [u64],
) -> Result<()> {
    let xsz = out.len();

    let mut node = ROOT_NODE;
    let mut produced = 0;

    while produced < xsz {
        match link_table.node(node)? {
            Node::Internal { one, zero } => {
                let bit = match bs.read_bit() {
                    Ok(bit) => bit,
                    Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                        debug!(
                            "out of code bits at {} with {} of {} symbols decoded",
                            bs.position(),
                            produced,
                            xsz
                        );
                        return out_of_bits_error(produced);
                    }
                    Err(err) => return Err(Error::IoError(err)),
                };

                node = if bit { one } else { zero };
            }
            Node::Leaf(value) => {
                out[produced] = value;
                produced += 1;

                // Every symbol is decoded starting from the root.
                node = ROOT_NODE;
            }
        }
    }

    // One symbol left over. The loop above only exits once every symbol is decoded, so this
    // cannot be reached. It is kept so the trailing behaviour of reference decoders is preserved.
    if produced + 1 == xsz {
        warn!("decoding a trailing symbol at node {} without reading any bits", node);

        match link_table.node(node)? {
            Node::Leaf(value) => out[produced] = value,
            Node::Internal { .. } => return malformed_tree_error(node),
        }
    }

    debug!("decoded {} symbols, next bit at {}", xsz, bs.position());

    Ok(())
}

/// `LinkDecoder` decodes codeword streams with a single link table.
///
/// A `LinkDecoder` holds no per-stream state and may be shared between threads to decode
/// independent streams in parallel.
#[derive(Clone, Debug)]
pub struct LinkDecoder {
    table: LinkTable,
    symbol_limit: Option<usize>,
}

impl LinkDecoder {
    /// Attempts to instantiate a `LinkDecoder` for `table` using the provided options.
    ///
    /// If `options.verify` is set, the link table is verified first and a malformed tree error is
    /// returned if any bit pattern does not end at a leaf.
    pub fn try_new(table: LinkTable, options: &DecoderOptions) -> Result<Self> {
        if options.verify {
            let depth = table.max_depth()?;
            debug!("verified link table with {} entries, max code length {}", table.len(), depth);
        }

        let symbol_limit = options.limit_symbols.limit_or_default(DEFAULT_SYMBOL_LIMIT);

        Ok(LinkDecoder { table, symbol_limit })
    }

    /// Gets the link table used by the decoder.
    pub fn link_table(&self) -> &LinkTable {
        &self.table
    }

    /// Decodes `xsz` symbols from the first `word_budget` words of `stream`.
    pub fn decode<W: CodeWord>(
        &self,
        stream: &[W],
        word_budget: usize,
        xsz: usize,
    ) -> Result<Vec<u64>> {
        self.check_limit(xsz)?;
        decode(stream, &self.table, word_budget, xsz)
    }

    /// Decodes exactly `out.len()` symbols from `bs` into `out`.
    pub fn decode_into<B: ReadBitsLtr>(&self, bs: &mut B, out: &mut [u64]) -> Result<()> {
        self.check_limit(out.len())?;
        decode_into(bs, &self.table, out)
    }

    fn check_limit(&self, xsz: usize) -> Result<()> {
        match self.symbol_limit {
            Some(limit) if xsz > limit => limit_error("number of symbols exceeds the limit"),
            _ => Ok(()),
        }
    }
}
