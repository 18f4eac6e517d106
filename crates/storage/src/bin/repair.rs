//! One-shot backup repair tool.
//!
//! Reads a backup JSON file, rewrites each question's `correctAnswer` to the
//! position of its flagged answer, and overwrites the file in place. Runs
//! offline; not part of the application itself.

use std::fmt;

use storage::backup::{repair, BackupDocument};

#[derive(Debug, Clone)]
struct Args {
    file: String,
    dry_run: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut file =
            std::env::var("QUIZ_BACKUP_FILE").unwrap_or_else(|_| "quiz-backup.json".into());
        let mut dry_run = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--file" => {
                    file = require_value(&mut args, "--file")?;
                }
                "--dry-run" => {
                    dry_run = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if !arg.starts_with("--") => {
                    file = arg;
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { file, dry_run })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin repair -- [file] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --file <path>   Backup JSON file (default: quiz-backup.json)");
    eprintln!("  --dry-run       Report inconsistencies without writing");
    eprintln!("  -h, --help      Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_BACKUP_FILE");
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut document = BackupDocument::read_from(&args.file)?;
    let report = repair(&mut document);

    for position in &report.missing_flag {
        println!("question {}: no answer flagged correct, left unchanged", position + 1);
    }
    for position in &report.multi_flag {
        println!("question {}: multiple answers flagged correct, kept the first", position + 1);
    }

    if !args.dry_run {
        document.write_to(&args.file)?;
    }

    println!(
        "{} questions checked, {} rewritten, {} with issues{}",
        report.total,
        report.rewritten,
        report.issues(),
        if args.dry_run { " (dry run, file untouched)" } else { "" },
    );

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
