// Unravel
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![forbid(unsafe_code)]

//! Shared structs, traits, and bit-level I/O for Project Unravel.

pub mod codecs;
pub mod errors;
pub mod io;
pub mod tree;
