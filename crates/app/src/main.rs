//! Command-line interface for the quiz application.

use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use quiz_core::Clock;
use services::{
    AppServices, BackupError, BankError, PracticeMode, QuestionCount, QuizConfig, QuizReport,
    QuizSession, SessionError, Step,
};
use storage::{JsonFileStore, StorageError};

/// Environment variable overriding the data directory.
const DATA_DIR_ENV: &str = "QUIZ_DATA_DIR";

#[derive(Parser)]
#[command(name = "quiz", version, about = "Practice multiple-choice questions")]
struct Cli {
    /// Directory holding the question bank and statistics
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List, add, or remove subjects
    Subjects {
        #[command(subcommand)]
        command: Option<SubjectsCommand>,
    },
    /// Parse questions from text and add them to the bank
    Add {
        /// Subject to file the questions under
        #[arg(long, default_value = storage::DEFAULT_SUBJECT)]
        subject: String,
        /// Read the text from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Run an interactive practice session
    Practice {
        #[arg(long, value_enum, default_value_t = ModeArg::Check)]
        mode: ModeArg,
        /// Number of questions, or "all"
        #[arg(long, default_value = "10")]
        count: String,
        /// Restrict to one subject
        #[arg(long)]
        subject: Option<String>,
        /// Keep the bank order instead of shuffling questions
        #[arg(long)]
        no_shuffle: bool,
        /// Also shuffle each question's answer options
        #[arg(long)]
        shuffle_answers: bool,
    },
    /// Show practice statistics
    Stats,
    /// Export all data to a backup file
    Export { path: PathBuf },
    /// Replace all data with a backup file's contents
    Import {
        path: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SubjectsCommand {
    /// Add a new subject
    Add { name: String },
    /// Remove a subject and every question filed under it
    Remove {
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Check each answer immediately
    Check,
    /// Grade everything at the end
    End,
}

impl From<ModeArg> for PracticeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Check => PracticeMode::CheckAsYouGo,
            ModeArg::End => PracticeMode::EndOfQuiz,
        }
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error("no data directory available; pass --data-dir or set {DATA_DIR_ENV}")]
    NoDataDir,

    #[error("invalid --count value `{0}`; expected a positive number or \"all\"")]
    InvalidCount(String),

    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Backup(#[from] BackupError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Cancelled) => {
            println!("Cancelled.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let dir = resolve_data_dir(cli.data_dir)?;
    log::debug!("using data directory {}", dir.display());
    let store = Arc::new(JsonFileStore::open(dir)?);
    let services = AppServices::open(store, Clock::default_clock());

    match cli.command {
        Command::Subjects { command } => run_subjects(&services, command),
        Command::Add { subject, file } => run_add(&services, &subject, file),
        Command::Practice {
            mode,
            count,
            subject,
            no_shuffle,
            shuffle_answers,
        } => run_practice(&services, mode, &count, subject, no_shuffle, shuffle_answers),
        Command::Stats => run_stats(&services),
        Command::Export { path } => run_export(&services, &path),
        Command::Import { path, yes } => run_import(&services, &path, yes),
    }
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|base| base.join("quiz"))
        .ok_or(AppError::NoDataDir)
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

fn run_subjects(
    services: &AppServices,
    command: Option<SubjectsCommand>,
) -> Result<(), AppError> {
    match command {
        None => {
            for (subject, count) in services.bank.subject_counts() {
                println!("{subject}  ({count} questions)");
            }
            Ok(())
        }
        Some(SubjectsCommand::Add { name }) => {
            let name = services.bank.create_subject(&name)?;
            println!("Added subject \"{name}\".");
            Ok(())
        }
        Some(SubjectsCommand::Remove { name, yes }) => {
            if !yes {
                confirm(&format!(
                    "Remove \"{name}\" and every question filed under it?"
                ))?;
            }
            let removed = services.bank.delete_subject(&name)?;
            println!("Removed \"{name}\" and {removed} questions.");
            Ok(())
        }
    }
}

fn run_add(services: &AppServices, subject: &str, file: Option<PathBuf>) -> Result<(), AppError> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let summary = services.bank.add_from_text(&input, subject)?;
    println!("Saved {} questions under \"{subject}\".", summary.saved);
    if summary.skipped > 0 {
        println!("Skipped {} malformed blocks.", summary.skipped);
    }
    Ok(())
}

fn parse_count(value: &str) -> Result<QuestionCount, AppError> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(QuestionCount::All);
    }
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(QuestionCount::Limit(n)),
        _ => Err(AppError::InvalidCount(value.to_owned())),
    }
}

fn run_practice(
    services: &AppServices,
    mode: ModeArg,
    count: &str,
    subject: Option<String>,
    no_shuffle: bool,
    shuffle_answers: bool,
) -> Result<(), AppError> {
    let config = QuizConfig {
        mode: mode.into(),
        count: parse_count(count)?,
        shuffle_questions: !no_shuffle,
        shuffle_answers,
        subject,
    };

    let started = services.practice.start(&config)?;
    // one reader for the whole session, prompts included; a second
    // io::stdin() reader underneath this lock would deadlock
    practice_loop(
        services,
        started,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )
}

fn practice_loop(
    services: &AppServices,
    started: services::StartedQuiz,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if let Some(shortfall) = started.shortfall {
        writeln!(
            out,
            "Only {} questions available (requested {}).",
            shortfall.available, shortfall.requested
        )?;
    }

    let mut session = started.session;
    writeln!(
        out,
        "Starting a {}-question session. Answer with a-d, n = next, p = previous, q = finish.",
        session.len()
    )?;

    loop {
        print_question(out, &session)?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = read_command(input)? else {
            // EOF: grade whatever was answered
            break;
        };

        match line.as_str() {
            "q" => {
                if session.answered() == session.len() {
                    break;
                }
                writeln!(
                    out,
                    "{} questions are unanswered and will count as incorrect.",
                    session.len() - session.answered()
                )?;
                write!(out, "[f]inish and grade, [a]bandon, or continue? ")?;
                out.flush()?;
                match read_command(input)?.as_deref() {
                    Some("f") | Some("y") => break,
                    Some("a") | None => {
                        // per-answer statistics already recorded in check
                        // mode stay; no history entry is written
                        writeln!(out, "Session abandoned.")?;
                        return Ok(());
                    }
                    _ => {}
                }
            }
            "n" => {
                if session.advance()? == Step::End {
                    // past the last question the session is graded,
                    // unanswered questions count as incorrect
                    break;
                }
            }
            "p" => {
                if !session.retreat()? {
                    writeln!(out, "Already on the first question.")?;
                }
            }
            choice if choice.len() == 1 => {
                let Some(position) = letter_position(choice, session.display_order().len())
                else {
                    writeln!(out, "Unrecognized input \"{choice}\".")?;
                    continue;
                };
                let index = session.display_order()[position];
                match services.practice.answer(&mut session, index) {
                    Ok(Some(check)) => {
                        if check.is_correct {
                            writeln!(out, "Correct!")?;
                        } else {
                            let correct = session.current_question().answers()
                                [check.correct_answer]
                                .text();
                            writeln!(out, "Wrong. Correct answer: {correct}")?;
                        }
                        if session.advance()? == Step::End {
                            break;
                        }
                    }
                    Ok(None) => {
                        if session.advance()? == Step::End && session.answered() == session.len()
                        {
                            break;
                        }
                    }
                    Err(SessionError::AnswerLocked) => {
                        writeln!(out, "Already answered; move on with n.")?;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            other => writeln!(out, "Unrecognized input \"{other}\".")?,
        }
    }

    let report = services.practice.finish(&mut session)?;
    print_report(out, &session, &report)
}

/// Reads one trimmed, lowercased line; `None` on end of input.
fn read_command(input: &mut impl BufRead) -> Result<Option<String>, AppError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

fn letter_position(input: &str, options: usize) -> Option<usize> {
    let letter = input.chars().next()?;
    let position = (letter as usize).checked_sub('a' as usize)?;
    (position < options).then_some(position)
}

fn print_question(out: &mut impl Write, session: &QuizSession) -> Result<(), AppError> {
    let question = session.current_question();
    writeln!(out)?;
    writeln!(
        out,
        "[{}/{}] {}",
        session.position() + 1,
        session.len(),
        question.text()
    )?;
    for (slot, &index) in session.display_order().iter().enumerate() {
        let letter = (b'a' + slot as u8) as char;
        let marker = if session.answer_at_cursor() == Some(index) {
            "*"
        } else {
            " "
        };
        writeln!(out, " {marker}{letter}. {}", question.answers()[index].text())?;
    }
    Ok(())
}

fn print_report(
    out: &mut impl Write,
    session: &QuizSession,
    report: &QuizReport,
) -> Result<(), AppError> {
    writeln!(out)?;
    writeln!(
        out,
        "Score: {}  ({}%)  Time: {}",
        report.score(),
        report.accuracy,
        format_duration(report.time_spent_secs)
    )?;

    for (number, entry) in session.review()?.iter().enumerate() {
        let verdict = if entry.is_correct { "ok" } else { "MISS" };
        let chosen = match entry.chosen {
            Some(index) => entry.question.answers()[index].text(),
            None => "(no answer)",
        };
        writeln!(out, "{:>4} {} {}", number + 1, verdict, entry.question.text())?;
        if !entry.is_correct {
            let correct = entry.question.answers()[entry.question.correct_answer()].text();
            writeln!(out, "       answered: {chosen}, correct: {correct}")?;
        }
    }
    Ok(())
}

fn run_stats(services: &AppServices) -> Result<(), AppError> {
    let stats = services.stats.overview();
    let counts = services.bank.subject_counts();
    let bank_size: usize = counts.iter().map(|(_, n)| n).sum();

    println!("Questions in the bank: {bank_size}");
    for (subject, count) in &counts {
        println!("  {subject}: {count}");
    }
    println!();
    println!("Questions answered: {}", stats.total_questions());
    println!(
        "Correct: {}  ({}%)",
        stats.correct_answers(),
        stats.accuracy_percent()
    );
    println!(
        "Streak: {} current / {} longest",
        stats.current_streak(),
        stats.longest_streak()
    );

    if !stats.history().is_empty() {
        println!();
        println!("Recent sessions:");
        for entry in stats.history().iter().take(5) {
            println!(
                "  {}  {}/{} ({}%) in {}",
                entry.date().format("%Y-%m-%d %H:%M"),
                entry.correct(),
                entry.total(),
                entry.accuracy(),
                format_duration(entry.time_spent_secs())
            );
        }
    }
    Ok(())
}

fn run_export(services: &AppServices, path: &PathBuf) -> Result<(), AppError> {
    let document = services.backup.export_to_file(path)?;
    println!(
        "Exported {} questions and {} subjects to {}.",
        document.questions.len(),
        document.subjects.len(),
        path.display()
    );
    Ok(())
}

fn run_import(services: &AppServices, path: &PathBuf, yes: bool) -> Result<(), AppError> {
    if !yes {
        confirm("Importing replaces all questions, subjects, and statistics. Continue?")?;
    }
    let summary = services.backup.import_from_file(path)?;
    println!(
        "Imported {} questions and {} subjects.",
        summary.questions, summary.subjects
    );
    if summary.statistics_replaced {
        println!("Statistics were replaced from the backup.");
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<(), AppError> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    if answer.trim().eq_ignore_ascii_case("y") {
        Ok(())
    } else {
        Err(AppError::Cancelled)
    }
}

fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
