mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::QuizId;
use services::{
    Clock, DriverOutcome, QuizDraft, QuizService, QuizSessionService, SessionDriver,
    SessionUpdate,
};
use storage::repository::Storage;
use tokio::sync::mpsc;

const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    InvalidQuizId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid quiz id: {raw:?}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- list                    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- import <quiz.json>      [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- take <quiz-id>          [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- attempts <quiz-id>      [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  QUIZ_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Import(PathBuf),
    Take(QuizId),
    Attempts(QuizId),
}

impl Command {
    fn parse(name: &str, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        match name {
            "list" => Ok(Self::List),
            "import" => {
                let path = args
                    .next()
                    .ok_or(ArgsError::MissingArgument { name: "quiz.json" })?;
                Ok(Self::Import(PathBuf::from(path)))
            }
            "take" => Ok(Self::Take(parse_quiz_id(args)?)),
            "attempts" => Ok(Self::Attempts(parse_quiz_id(args)?)),
            other => Err(ArgsError::UnknownArg(other.to_string())),
        }
    }
}

fn parse_quiz_id(args: &mut impl Iterator<Item = String>) -> Result<QuizId, ArgsError> {
    let raw = args
        .next()
        .ok_or(ArgsError::MissingArgument { name: "quiz-id" })?;
    raw.parse()
        .map_err(|_| ArgsError::InvalidQuizId { raw: raw.clone() })
}

struct Args {
    command: Command,
    db_url: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let name = args.next().ok_or(ArgsError::MissingArgument { name: "command" })?;
        let command = Command::parse(&name, args)?;
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { command, db_url })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

async fn take_quiz(
    sessions: Arc<QuizSessionService>,
    quiz_id: &QuizId,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = sessions.start_session(quiz_id).await?;
    println!("{}", terminal::help_text());

    let (tx, rx) = mpsc::unbounded_channel();
    terminal::spawn_stdin_reader(tx);

    let driver = SessionDriver::new(sessions);
    let outcome = driver
        .run(session, rx, |session, update| match update {
            SessionUpdate::Started | SessionUpdate::Changed(_) | SessionUpdate::Advanced => {
                print!("{}", terminal::render_question(session));
            }
            SessionUpdate::Tick { remaining } => {
                if terminal::announce_tick(remaining) {
                    println!("{}", terminal::render_clock(remaining));
                }
            }
            SessionUpdate::SubmitPrompt(prompt) => println!("{}", terminal::render_prompt(prompt)),
            SessionUpdate::Rejected { error, .. } => println!("! {error}"),
        })
        .await?;

    match outcome {
        DriverOutcome::Completed(receipt) => {
            if let Some(warning) = &receipt.persist_warning {
                eprintln!("warning: your attempt could not be saved: {warning}");
            }
            print!("{}", terminal::render_review(&receipt.review));
        }
        DriverOutcome::Abandoned => println!("Quiz abandoned, nothing was saved."),
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1).peekable();
    if matches!(argv.peek().map(String::as_str), None | Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }

    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let clock = Clock::default_clock();
    let quizzes = QuizService::new(
        clock,
        Arc::clone(&storage.quizzes),
        Arc::clone(&storage.attempts),
    );

    match parsed.command {
        Command::List => {
            let seeded = quizzes.seed_samples_if_empty().await?;
            if !seeded.is_empty() {
                println!("Added {} sample quizzes.", seeded.len());
            }
            let all = quizzes.list_quizzes().await?;
            if all.is_empty() {
                println!("No quizzes yet. Import one with `import <quiz.json>`.");
            }
            for quiz in all {
                println!(
                    "{}  {}  ({} questions, {} min)",
                    quiz.id(),
                    quiz.title(),
                    quiz.question_count(),
                    quiz.time_limit_secs() / 60
                );
            }
        }
        Command::Import(path) => {
            let json = std::fs::read_to_string(&path)?;
            let quiz = quizzes.create_quiz(QuizDraft::from_json(&json)?).await?;
            println!("Imported {} as {}", quiz.title(), quiz.id());
        }
        Command::Attempts(quiz_id) => {
            let Some(quiz) = quizzes.get_quiz(&quiz_id).await? else {
                return Err(format!("quiz {quiz_id} not found").into());
            };
            println!("{}", quiz.title());
            for attempt in quizzes.list_attempts(&quiz_id).await? {
                println!("  {}", terminal::render_attempt(&attempt));
            }
        }
        Command::Take(quiz_id) => {
            let sessions = Arc::new(QuizSessionService::new(
                clock,
                Arc::clone(&storage.quizzes),
                Arc::clone(&storage.attempts),
            ));
            take_quiz(sessions, &quiz_id).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(ToString::to_string).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_take_with_db_flag() {
        let parsed = Args::parse(&mut args(&["take", "abc", "--db", "sqlite::memory:"])).unwrap();
        assert_eq!(parsed.command, Command::Take(QuizId::new("abc")));
        assert_eq!(parsed.db_url, "sqlite::memory:");
    }

    #[test]
    fn take_requires_quiz_id() {
        let err = Args::parse(&mut args(&["take"])).err().unwrap();
        assert!(matches!(err, ArgsError::MissingArgument { name: "quiz-id" }));
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = Args::parse(&mut args(&["list", "--verbose"])).err().unwrap();
        assert!(matches!(err, ArgsError::UnknownArg(arg) if arg == "--verbose"));
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/quiz.db".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/quiz.db"));
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/q.db".into()),
            "sqlite:///tmp/q.db"
        );
    }
}
