//! Quizzer CLI
//!
//! Runs the quiz server and provides the terminal front end for authoring and
//! taking quizzes against it.

mod author;
mod display;
mod prompt;
mod take;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use quizzer_client::{QuizClient, DEFAULT_SERVER_URL};
use quizzer_core::{validate_quiz, AnswerSheet, NewQuiz, QuizSession};
use quizzer_report::{json::JsonGenerator, AttemptReport, MarkdownGenerator};
use quizzer_server::{create_router, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::prompt::Prompter;

/// Quizzer - author and take quizzes
///
/// Serves the quiz REST API and talks to it from the terminal.
#[derive(Parser, Debug)]
#[command(name = "quizzer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the quiz server
    #[arg(long, global = true, env = "QUIZZER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the quiz API server
    Serve {
        /// Path to configuration file (default: quizzer.json in current directory)
        #[arg(short, long, value_name = "FILE")]
        config: Option<String>,

        /// Port for the HTTP API server
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database URL, e.g. sqlite://quizzer.db or sqlite::memory:
        #[arg(long, value_name = "URL")]
        database: Option<String>,
    },

    /// List all quizzes
    List,

    /// Show one quiz
    Show {
        /// Quiz id
        id: i64,

        /// Include the answer key
        #[arg(long)]
        answers: bool,
    },

    /// Create a quiz from a JSON file
    Create {
        /// File holding `{title, description, questions}`
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Build a quiz interactively and create it
    Author,

    /// Take a quiz
    Take {
        /// Quiz id
        id: i64,

        /// Read answers from a JSON file instead of prompting
        #[arg(long, value_name = "FILE")]
        answers: Option<PathBuf>,

        /// Write a report of the attempt to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,

        /// Reveal the correct answers while answering and in the results
        #[arg(long)]
        show_answers: bool,
    },

    /// Delete a quiz and all of its questions
    Delete {
        /// Quiz id
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::debug!(server = %args.server, command = ?args.command, "Quizzer starting");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let client = QuizClient::new(&args.server);

    match args.command {
        Command::Serve {
            config,
            port,
            database,
        } => run_server(config.as_deref(), port, database).await,
        Command::List => {
            let quizzes = client.list_quizzes().await?;
            print!("{}", display::quiz_table(&quizzes));
            Ok(())
        }
        Command::Show { id, answers } => {
            let quiz = client.get_quiz(id).await?;
            print!("{}", display::quiz_details(&quiz, answers));
            Ok(())
        }
        Command::Create { file } => {
            let quiz = read_quiz_file(&file)?;
            submit_quiz(&client, &quiz).await
        }
        Command::Author => {
            let authored = {
                let mut p = Prompter::new(io::stdin().lock(), io::stdout());
                author::author_quiz(&mut p)?
            };
            match authored {
                Some(quiz) => submit_quiz(&client, &quiz).await,
                None => {
                    println!("Cancelled, nothing was created");
                    Ok(())
                }
            }
        }
        Command::Take {
            id,
            answers,
            report,
            format,
            show_answers,
        } => {
            let quiz = client.get_quiz(id).await?;
            let mut session = QuizSession::new(quiz);
            let mut p = Prompter::new(io::stdin().lock(), io::stdout());

            if let Some(path) = answers {
                let sheet = read_answer_file(&path)?;
                take::apply_answers(&mut session, &sheet)?;
                if show_answers {
                    session.toggle_show_answers();
                }
                session.submit()?;
                take::print_results(&mut p, &session)?;
            } else {
                take::run_interactive(&mut p, &mut session, show_answers)?;
            }

            if let Some(path) = report {
                write_report(&session, &path, format)?;
            }
            Ok(())
        }
        Command::Delete { id, yes } => {
            let quiz = client.get_quiz(id).await?;
            if !yes {
                let mut p = Prompter::new(io::stdin().lock(), io::stdout());
                if !confirm_delete(&mut p, id, &quiz.title)? {
                    println!("Nothing deleted");
                    return Ok(());
                }
            }
            client.delete_quiz(id).await?;
            println!("Deleted quiz #{id}: {}", quiz.title);
            Ok(())
        }
    }
}

/// Loads configuration, applies CLI overrides and serves the API until Ctrl+C.
async fn run_server(
    config_path: Option<&str>,
    port: Option<u16>,
    database: Option<String>,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(port) = port {
        config.port = port;
    }
    if let Some(database) = database {
        config.database_url = database;
    }

    // Re-validate after overrides
    config.validate()?;
    let addr = config.bind_addr()?;

    print_config(&config);

    let state = AppState::connect(config).await.map_err(|e| {
        anyhow::anyhow!("{e}\n\nSuggestion: Check databaseUrl in quizzer.json or the --database flag")
    })?;
    let counts = state.service.store().row_counts().await?;
    tracing::info!(
        quizzes = counts.quizzes,
        questions = counts.questions,
        options = counts.options,
        "Database opened"
    );

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!();
    println!("Quizzer API running on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        })
        .await?;

    println!("Server stopped");
    Ok(())
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

fn print_config(config: &Config) {
    println!("Configuration loaded:");
    println!("  Database: {}", config.database_url);
    println!("  Listen address: {}:{}", config.host, config.port);
    println!("  Max connections: {}", config.max_connections);
    println!("  Strict validation: {}", config.strict_validation);
}

fn read_quiz_file(path: &Path) -> anyhow::Result<NewQuiz> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!("Failed to read quiz file '{}': {e}", path.display())
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        anyhow::anyhow!(
            "Invalid quiz file '{}': {e}\n\nSuggestion: Expected {{\"title\", \"description\", \"questions\": [...]}}",
            path.display()
        )
    })
}

fn read_answer_file(path: &Path) -> anyhow::Result<AnswerSheet> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!("Failed to read answers file '{}': {e}", path.display())
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        anyhow::anyhow!(
            "Invalid answers file '{}': {e}\n\nSuggestion: Map question indices to answers, e.g. {{\"0\": {{\"boolean\": true}}, \"1\": {{\"text\": \"Paris\"}}}}",
            path.display()
        )
    })
}

/// Validates a quiz locally, then creates it on the server.
async fn submit_quiz(client: &QuizClient, quiz: &NewQuiz) -> anyhow::Result<()> {
    validate_quiz(quiz)?;
    let created = client.create_quiz(quiz).await?;
    println!("Created quiz #{}: {}", created.id, created.title);
    Ok(())
}

fn confirm_delete<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    id: i64,
    title: &str,
) -> io::Result<bool> {
    p.ask_bool(
        &format!("Delete quiz #{id} \"{title}\" and all of its questions? [y/N]"),
        false,
    )
}

fn write_report(session: &QuizSession, path: &Path, format: ReportFormat) -> anyhow::Result<()> {
    let report = AttemptReport::from_session(session)?;

    match format {
        ReportFormat::Markdown => {
            std::fs::write(path, MarkdownGenerator::new(&report).generate())?;
        }
        ReportFormat::Json => JsonGenerator::new(&report).write_to_file(path, true)?,
    }

    println!("Report written to {}", path.display());
    Ok(())
}
