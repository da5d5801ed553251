//! Precis CLI - summarise text and documents with an LLM
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments, collecting input and reporting errors.

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;
use precis::{
    agent, export, extract, Config, CredentialStore, Error, Length, OpenAiProvider, OutputFormat,
    Session, SummaryOptions,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "precis")]
#[command(author, version, about = "Summarise text, DOCX and PDF documents with an LLM", long_about = None)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise text from an argument, a file, stdin or your editor
    #[command(alias = "summarize")]
    Summarise {
        /// .txt, .docx or .pdf file to summarise
        file: Option<PathBuf>,
        /// Text to summarise instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Summary length
        #[arg(short, long, value_enum)]
        length: Option<Length>,
        /// Summary layout
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Language to write the summary in
        #[arg(long)]
        language: Option<String>,
        /// Also save the summary to a .txt or .docx file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
    },
    /// Print the text extracted from a document
    Extract {
        /// .txt, .docx or .pdf file
        file: PathBuf,
    },
    /// Manage the provider API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Validate and store an API key (prompts when omitted)
    Set { key: Option<String> },
    /// Show whether a key is stored
    Status,
    /// Remove the stored key
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "precis=debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Summarise {
            file,
            text,
            length,
            format,
            language,
            output,
            raw,
        } => {
            let input = read_input(text, file)?;
            if input.trim().is_empty() {
                return Err(Error::EmptyInput.into());
            }

            if raw {
                println!("{}", input);
                eprintln!("\n--- Extracted {} characters ---", input.chars().count());
                return Ok(());
            }

            let config = Config::load()?;
            let options = SummaryOptions {
                length: length.unwrap_or(config.summary.length),
                format: format.unwrap_or(config.summary.format),
                language: language.or_else(|| config.summary.language.clone()),
            };

            let mut session = open_session(&config)?;
            session.resume()?;

            eprintln!("Summarising {} characters...\n", input.chars().count());
            let summary = match summarise(&session, &input, &options).await {
                Ok(summary) => summary,
                Err(e) => {
                    session.discard_rejected(&e)?;
                    if !(e.requires_reentry() && is_interactive()) {
                        return Err(e.into());
                    }
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    prompt_for_key(&mut session).await?;
                    println!("Run the command again to summarise with the new key.");
                    return Ok(());
                }
            };

            println!("{}", summary);

            if let Some(path) = output {
                let format = export::write(&path, &summary)?;
                eprintln!(
                    "\n{} Saved {:?} export to {}",
                    "✓".green(),
                    format,
                    path.display()
                );
            }
        }
        Commands::Extract { file } => {
            let text = extract::extract_path(&file)?;
            println!("{}", text);
            eprintln!("\n--- Extracted {} characters ---", text.chars().count());
        }
        Commands::Key { action } => {
            let config = Config::load()?;
            let mut session = open_session(&config)?;

            match action {
                KeyAction::Set { key: Some(key) } => {
                    session.save(&key).await?;
                    println!("{} API key saved successfully", "✓".green());
                }
                KeyAction::Set { key: None } => prompt_for_key(&mut session).await?,
                KeyAction::Status => match session.stored()? {
                    Some(stored) => println!(
                        "🔑 {} (validated {})",
                        stored.key.masked(),
                        stored.validated_at.format("%Y-%m-%d %H:%M")
                    ),
                    None => println!("No API key stored. Run `precis key set` to add one."),
                },
                KeyAction::Clear => {
                    if session.reset()? {
                        println!("API key removed.");
                    } else {
                        println!("No API key stored.");
                    }
                }
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "precis", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Open the credential store and bind it to the configured provider.
fn open_session(config: &Config) -> anyhow::Result<Session> {
    std::fs::create_dir_all(&config.storage.path)?;
    let store = CredentialStore::open(config.credentials_path())?;
    let provider = OpenAiProvider::from_config(&config.provider)?;
    Ok(Session::new(
        Arc::new(provider),
        store,
        config.provider.model.clone(),
    ))
}

async fn summarise(
    session: &Session,
    input: &str,
    options: &SummaryOptions,
) -> precis::Result<String> {
    let client = session.client()?;
    agent::summarize(&client, input, options).await
}

/// Collect the text to summarise: `--text`, then a file, then piped stdin,
/// then the user's editor.
fn read_input(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = file {
        return Ok(extract::extract_path(&path)?);
    }

    if !is_interactive() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return Ok(input);
    }

    Ok(edit::edit("")?)
}

fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Ask for an API key, validate it and store it.
async fn prompt_for_key(session: &mut Session) -> anyhow::Result<()> {
    let key = Password::new()
        .with_prompt("OpenAI API key (sk-...)")
        .interact()?;
    session.save(&key).await?;
    println!("{} API key saved successfully", "✓".green());
    Ok(())
}
