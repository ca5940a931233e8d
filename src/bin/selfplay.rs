//! Self-play battle generation CLI.
//!
//! Plays random-legal-action battles and outputs their records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --battles N     Number of battles to play (default: 10)
//!   --max-turns N   Turn cap per battle (default: 200)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};

use depthcharge::selfplay::{self, SelfPlayConfig};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--battles" => {
                i += 1;
                config.num_battles = args[i].parse().expect("invalid --battles value");
            }
            "--max-turns" => {
                i += 1;
                config.max_turns = args[i].parse().expect("invalid --max-turns value");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--output" => {
                i += 1;
                output_path = Some(args[i].clone());
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let battles = selfplay::run_self_play(&config);

    if !config.quiet {
        eprintln!("Played {} battles", battles.len());
        selfplay::print_summary(&battles);
    }

    match output_path {
        Some(path) => {
            let file = File::create(&path).expect("failed to create output file");
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&battles, &mut writer).expect("failed to write output");
            if !config.quiet {
                eprintln!("Wrote {} battles to {}", battles.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&battles, &mut writer).expect("failed to write output");
        }
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --battles N      Number of battles to play (default: 10)");
    eprintln!("  --max-turns N    Turn cap per battle (default: 200)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress summary output");
    eprintln!("  --help           Show this help");
}
