// Unravel Check Tool
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use unravel_core::errors::{decode_error, Result};
use unravel_core::tree::LinkTable;

/// A decode job as stored on disk.
///
/// Every field is optional at the serialization level so that missing inputs are reported with
/// the same errors as malformed inputs.
#[derive(Deserialize, Debug, Default)]
struct RawJob {
    /// The codeword stream.
    stream: Option<Vec<u16>>,
    /// The link table. Entries may be stored as integers or integral floating point values.
    link: Option<Vec<f64>>,
    /// The number of symbols to decode.
    xsz: Option<Value>,
    /// The number of words of the stream that may be read. Defaults to the stream length.
    word_budget: Option<usize>,
    /// The expected output, if known.
    expected: Option<Vec<u64>>,
}

/// A validated decode job.
#[derive(Debug)]
pub struct Job {
    pub stream: Vec<u16>,
    pub link_table: LinkTable,
    pub xsz: usize,
    pub word_budget: usize,
    pub expected: Option<Vec<u64>>,
}

impl Job {
    /// Loads and validates a job from a JSON file.
    pub fn load(path: &Path) -> Result<Job> {
        let reader = BufReader::new(File::open(path)?);
        let raw: RawJob = serde_json::from_reader(reader).map_err(std::io::Error::from)?;
        Job::try_from_raw(raw)
    }

    /// Parses and validates a job from a JSON string.
    pub fn parse(json: &str) -> Result<Job> {
        let raw: RawJob = serde_json::from_str(json).map_err(std::io::Error::from)?;
        Job::try_from_raw(raw)
    }

    fn try_from_raw(raw: RawJob) -> Result<Job> {
        let (stream, link, xsz) = match (raw.stream, raw.link, raw.xsz) {
            (Some(stream), Some(link), Some(xsz)) => (stream, link, xsz),
            _ => return decode_error("stream, link, and xsz are all required"),
        };

        let xsz = parse_xsz(&xsz)?;

        let link_table = LinkTable::try_from_f64(&link)?;

        let word_budget = raw.word_budget.unwrap_or(stream.len());

        if let Some(expected) = &raw.expected {
            if expected.len() != xsz {
                return decode_error("expected output length does not match xsz");
            }
        }

        Ok(Job { stream, link_table, xsz, word_budget, expected: raw.expected })
    }
}

/// The output size must be a single non-negative integral number.
fn parse_xsz(value: &Value) -> Result<usize> {
    let xsz = match value {
        Value::Number(num) => num.as_f64(),
        // A one element array is still a scalar.
        Value::Array(items) if items.len() == 1 => items[0].as_f64(),
        _ => None,
    };

    match xsz {
        Some(xsz) if xsz.is_finite() && xsz >= 0.0 && xsz.fract() == 0.0 => {
            if xsz > usize::MAX as f64 {
                return decode_error("xsz is too large");
            }
            Ok(xsz as usize)
        }
        _ => decode_error("xsz must be a non-negative integer scalar"),
    }
}

#[cfg(test)]
mod tests {
    use super::Job;
    use unravel_core::errors::Error;

    #[test]
    fn verify_job_parse() {
        let job = Job::parse(r#"{ "stream": [32768], "link": [2, -5.0, -7], "xsz": 2 }"#).unwrap();

        assert_eq!(job.stream, vec![0x8000]);
        assert_eq!(job.link_table.entries(), &[2, -5, -7]);
        assert_eq!(job.xsz, 2);
        assert_eq!(job.word_budget, 1);
        assert!(job.expected.is_none());

        let job = Job::parse(
            r#"{ "stream": [], "link": [-1], "xsz": [3.0], "word_budget": 0, "expected": [1, 1, 1] }"#,
        )
        .unwrap();

        assert_eq!(job.xsz, 3);
        assert_eq!(job.expected, Some(vec![1, 1, 1]));
    }

    #[test]
    fn verify_job_rejects_bad_inputs() {
        // Missing input.
        assert!(matches!(Job::parse(r#"{ "stream": [], "xsz": 1 }"#), Err(Error::DecodeError(_))));

        // Non-scalar, negative, and fractional sizes.
        for xsz in ["[1, 2]", "-1", "1.5", "\"3\""] {
            let json = format!(r#"{{ "stream": [], "link": [-1], "xsz": {} }}"#, xsz);
            assert!(matches!(Job::parse(&json), Err(Error::DecodeError(_))));
        }

        // Non-integral link entry.
        assert!(matches!(
            Job::parse(r#"{ "stream": [], "link": [0.5], "xsz": 1 }"#),
            Err(Error::DecodeError(_))
        ));

        // Expected output of the wrong length.
        assert!(matches!(
            Job::parse(r#"{ "stream": [], "link": [-1], "xsz": 1, "expected": [] }"#),
            Err(Error::DecodeError(_))
        ));

        // Malformed JSON.
        assert!(matches!(Job::parse("{"), Err(Error::IoError(_))));
    }
}
