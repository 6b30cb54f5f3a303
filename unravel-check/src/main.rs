// Unravel Check Tool
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use unravel_codec_link::LinkDecoder;
use unravel_core::codecs::{DecoderOptions, Limit};
use unravel_core::errors::{Error, Result};

use clap::Parser;
use log::{info, warn};

mod job;

use job::Job;

#[derive(Parser, Debug)]
#[command(name = "Unravel Check", version, about = "Decode a link table job and check the output")]
struct Args {
    /// Verify the link table before decoding
    #[arg(long)]
    verify: bool,

    /// The maximum number of symbols to decode
    #[arg(long, value_name = "N", conflicts_with = "no_limit")]
    limit: Option<usize>,

    /// Do not limit the number of symbols to decode
    #[arg(long)]
    no_limit: bool,

    /// Only print test results
    #[arg(long, short)]
    quiet: bool,

    /// Print the decoded symbols as a JSON array
    #[arg(long)]
    json: bool,

    /// The input job file path
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

#[derive(Default)]
struct TestResult {
    n_symbols: usize,
    n_failed_symbols: usize,
    first_failure: Option<usize>,
}

fn decoder_options(args: &Args) -> DecoderOptions {
    let limit_symbols = match (args.limit, args.no_limit) {
        (Some(max), _) => Limit::Maximum(max),
        (None, true) => Limit::None,
        (None, false) => Limit::Default,
    };

    DecoderOptions { verify: args.verify, limit_symbols }
}

fn run_test(args: &Args, res: &mut TestResult) -> Result<()> {
    let job = Job::load(&args.input)?;

    info!(
        "job: {} words (budget {}), {} link table entries, {} symbols",
        job.stream.len(),
        job.word_budget,
        job.link_table.len(),
        job.xsz
    );

    let decoder = LinkDecoder::try_new(job.link_table, &decoder_options(args))?;

    let out = decoder.decode(&job.stream, job.word_budget, job.xsz)?;

    res.n_symbols = out.len();

    if args.json {
        println!("{}", serde_json::to_string(&out).map_err(std::io::Error::from)?);
    }
    else if !args.quiet {
        for (i, value) in out.iter().enumerate() {
            println!("[{:0>8}] {}", i, value);
        }
    }

    if let Some(expected) = &job.expected {
        for (i, (value, expected)) in out.iter().zip(expected).enumerate() {
            if value != expected {
                if !args.quiet {
                    warn!("symbol {} decoded as {}, expected {}", i, value, expected);
                }
                res.first_failure.get_or_insert(i);
                res.n_failed_symbols += 1;
            }
        }
    }

    Ok(())
}

fn main() {
    pretty_env_logger::init();

    let args = Args::parse();

    let mut res: TestResult = Default::default();

    if !args.json {
        println!("Input Path: {}", args.input.display());
        println!();
    }

    match run_test(&args, &mut res) {
        Err(Error::OutOfBits { decoded }) => {
            eprintln!("Out of code bits after {} decoded symbols", decoded);
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("Test interrupted by error: {}", err);
            std::process::exit(2);
        }
        _ => (),
    };

    if args.json {
        std::process::exit(if res.n_failed_symbols == 0 { 0 } else { 1 });
    }

    println!();
    println!("Test Results");
    println!("=================================================");
    println!();
    println!("  Failed/Total Symbols: {:>12}/{:>12}", res.n_failed_symbols, res.n_symbols);

    if let Some(first) = res.first_failure {
        println!("  First Failed Symbol:  {:>12}", first);
    }

    println!();

    let ret = if res.n_failed_symbols == 0 {
        println!("PASS");
        0
    }
    else {
        println!("FAIL");
        1
    };
    println!();

    std::process::exit(ret);
}
