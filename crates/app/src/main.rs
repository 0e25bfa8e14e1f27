use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{CategoryId, DifficultyFilter, QuestionId};
use quiz_core::review::CategoryFilter;
use quiz_core::time::format_countdown;
use services::template::{TEMPLATE_FILE_NAME, write_template};
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

mod interactive;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { command: &'static str, flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDifficulty { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { command, flag } => write!(f, "{command} requires {flag}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw} (expected all, easy, medium or hard)")
            }
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
    eprintln!("  app categories");
    eprintln!("  app add-category --name <name> [--description <text>]");
    eprintln!("  app edit-category --category <id> --name <name> [--description <text>]");
    eprintln!("  app delete-category --category <id>");
    eprintln!("  app import --category <id> --file <questions.json>");
    eprintln!("  app template [--out <path>]");
    eprintln!("  app quiz --category <id> [--difficulty all|easy|medium|hard] [--shuffle]");
    eprintln!("  app history");
    eprintln!("  app incorrect [--search <text>] [--category <id>]");
    eprintln!("  app retake [--search <text>] [--category <id>]");
    eprintln!("  app remove-record --question <id>");
    eprintln!();
    eprintln!("Every command accepts --db <sqlite_url> (default sqlite://quiz.sqlite3).");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Categories,
    AddCategory,
    EditCategory,
    DeleteCategory,
    Import,
    Template,
    Quiz,
    History,
    Incorrect,
    Retake,
    RemoveRecord,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "categories" => Some(Self::Categories),
            "add-category" => Some(Self::AddCategory),
            "edit-category" => Some(Self::EditCategory),
            "delete-category" => Some(Self::DeleteCategory),
            "import" => Some(Self::Import),
            "template" => Some(Self::Template),
            "quiz" => Some(Self::Quiz),
            "history" => Some(Self::History),
            "incorrect" => Some(Self::Incorrect),
            "retake" => Some(Self::Retake),
            "remove-record" => Some(Self::RemoveRecord),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    db_url: String,
    name: Option<String>,
    description: Option<String>,
    category: Option<CategoryId>,
    question: Option<QuestionId>,
    file: Option<PathBuf>,
    out: Option<PathBuf>,
    search: Option<String>,
    difficulty: DifficultyFilter,
    shuffle: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: std::env::var("QUIZ_DB_URL")
                .ok()
                .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--name" => parsed.name = Some(require_value(args, "--name")?),
                "--description" => parsed.description = Some(require_value(args, "--description")?),
                "--category" => {
                    parsed.category = Some(CategoryId::new(require_value(args, "--category")?));
                }
                "--question" => {
                    parsed.question = Some(QuestionId::new(require_value(args, "--question")?));
                }
                "--file" => parsed.file = Some(require_value(args, "--file")?.into()),
                "--out" => parsed.out = Some(require_value(args, "--out")?.into()),
                "--search" => parsed.search = Some(require_value(args, "--search")?),
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    parsed.difficulty = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?;
                }
                "--shuffle" => parsed.shuffle = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn category_filter(&self) -> CategoryFilter {
        self.category
            .clone()
            .map_or(CategoryFilter::All, CategoryFilter::Only)
    }

    fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

fn required<'a, T>(
    value: &'a Option<T>,
    command: &'static str,
    flag: &'static str,
) -> Result<&'a T, ArgsError> {
    value.as_ref().ok_or(ArgsError::MissingFlag { command, flag })
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if cmd == Command::Template {
        let path = args
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(TEMPLATE_FILE_NAME));
        write_template(&path).await?;
        println!("Template written to {}", path.display());
        return Ok(());
    }

    // The sqlite file must exist before sqlx can open it without create mode.
    prepare_sqlite_file(&args.db_url)?;
    let services = AppServices::new_sqlite(&args.db_url, Clock::default_clock())
        .await?
        .with_shuffle(args.shuffle);

    match cmd {
        Command::Categories => {
            let rows = services.categories().list();
            if rows.is_empty() {
                println!("No categories yet.");
            }
            for row in rows {
                println!(
                    "{}  {}  ({} questions)",
                    row.category.id, row.category.name, row.question_count
                );
                if !row.category.description.is_empty() {
                    println!("    {}", row.category.description);
                }
            }
        }
        Command::AddCategory => {
            let name = required(&args.name, "add-category", "--name")?;
            let description = args.description.as_deref().unwrap_or("");
            let category = services
                .categories()
                .create_category(name, description)
                .await?;
            println!("Created category {} ({})", category.name, category.id);
        }
        Command::EditCategory => {
            let id = required(&args.category, "edit-category", "--category")?;
            let name = required(&args.name, "edit-category", "--name")?;
            let description = args.description.as_deref().unwrap_or("");
            let category = services
                .categories()
                .update_category(id, name, description)
                .await?;
            println!("Updated category {} ({})", category.name, category.id);
        }
        Command::DeleteCategory => {
            let id = required(&args.category, "delete-category", "--category")?;
            services.categories().delete_category(id).await;
            println!("Deleted category {id}");
        }
        Command::Import => {
            let id = required(&args.category, "import", "--category")?;
            let file = required(&args.file, "import", "--file")?;
            let questions = services::import::read_questions_file(file).await?;
            let count = services.categories().add_questions(id, questions).await?;
            println!("Successfully imported {count} questions!");
        }
        Command::Quiz => {
            let id = required(&args.category, "quiz", "--category")?;
            let setup = services.quiz().setup(id)?;
            let counts = setup.counts();
            println!(
                "{}: {} questions (easy {}, medium {}, hard {})",
                setup.category().name,
                counts.all,
                counts.easy,
                counts.medium,
                counts.hard
            );
            let session = services.quiz().start_quiz(id, args.difficulty)?;
            println!(
                "{} questions, {} on the clock.",
                session.questions().len(),
                format_countdown(session.remaining_secs())
            );
            interactive::run_session(&services, session).await?;
        }
        Command::History => {
            let items = services.history().list();
            if items.is_empty() {
                println!("No quiz history yet.");
            }
            for item in items {
                println!(
                    "{}  {:<24} {}/{}  {:>3}%  {:<6} {}",
                    item.completed_at.format("%Y-%m-%d %H:%M"),
                    item.category_name,
                    item.score,
                    item.total_questions,
                    item.percentage,
                    if item.passed { "PASS" } else { "FAIL" },
                    item.time_spent
                );
            }
        }
        Command::Incorrect => {
            let note = services.incorrect_note();
            let items = note.list(args.search(), &args.category_filter());
            if items.is_empty() {
                println!("No incorrect answers recorded.");
            }
            for item in items {
                let category = item.category_name.as_deref().unwrap_or("-");
                println!("[{category}] {}  ({})", item.question.text, item.question.id);
                if let Some(correct) = item.question.correct_option() {
                    println!("    Correct Answer: {}", correct.text);
                }
                if let Some(explanation) = &item.question.explanation {
                    println!("    {explanation}");
                }
            }
        }
        Command::Retake => {
            let questions = services
                .incorrect_note()
                .retake_set(args.search(), &args.category_filter());
            if questions.is_empty() {
                println!("No questions to retake.");
                return Ok(());
            }
            let session = services.quiz().start_retake(questions)?;
            interactive::run_session(&services, session).await?;
        }
        Command::RemoveRecord => {
            let id = required(&args.question, "remove-record", "--question")?;
            services.incorrect_note().remove(id).await;
            println!("Removed {id} from the incorrect note");
        }
        Command::Template => {}
    }

    Ok(())
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

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
