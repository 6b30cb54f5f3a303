// Unravel
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![forbid(unsafe_code)]

//! A decoder for prefix coded streams described by a link table.
//!
//! A link table is a binary decision tree flattened into an array of signed entries (see
//! [`unravel_core::tree`]). Decoding walks the tree from the root one bit at a time, reading bits
//! from the most-significant to the least-significant bit of each word of the stream, until a leaf
//! is reached. The leaf's value is emitted and the walk restarts at the root for the next symbol.
//!
//! ```
//! use unravel_codec_link::decode;
//! use unravel_core::tree::LinkTable;
//!
//! let table = LinkTable::new(vec![2, -5, -7]);
//!
//! assert_eq!(decode(&[0x8000u16], &table, 1, 2).unwrap(), vec![7, 5]);
//! ```

mod decoder;

pub use decoder::{decode, decode_into, LinkDecoder};
