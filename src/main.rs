use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use newscast::config::{ClassifierBackend, Config, StoreBackend};
use newscast::db::{InMemoryStore, ResultStore};
use newscast::narration::gtts::GoogleTranslateTts;
use newscast::narration::{NarrationLanguage, Narrator};
use newscast::news::google::GoogleNewsSource;
use newscast::output::{audio_file_name, terminal};
use newscast::pipeline::{Analyzer, DEFAULT_ARTICLES};
use newscast::sentiment::huggingface::HuggingFaceClassifier;
use newscast::sentiment::onnx::OnnxSentimentClassifier;
use newscast::sentiment::SentimentClassifier;
use newscast::topics::frequency::FrequencyExtractor;

/// Newscast: company news sentiment with a spoken summary.
///
/// Searches recent news about a company, scores each article's sentiment,
/// compares coverage across articles, and narrates the result.
#[derive(Parser)]
#[command(name = "newscast", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the results database
    Init,

    /// Analyze recent news coverage of a company
    Analyze {
        /// Company name (e.g. "Tesla")
        company: String,

        /// Number of articles to analyze, 1 to 15 (default: 10)
        #[arg(long, default_value_t = DEFAULT_ARTICLES)]
        count: usize,

        /// Narration language: hi or en (default: NEWSCAST_LANGUAGE or hi)
        #[arg(long)]
        lang: Option<String>,

        /// Where to write the narration audio (default: output/<company>_analysis.mp3)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show the stored analysis for a company
    Show {
        company: String,
    },

    /// List analyzed companies
    Companies,

    /// Write a company's stored narration audio to a file
    Audio {
        company: String,

        /// Output path (default: output/<company>_analysis.mp3)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Download the ONNX sentiment model (~67 MB)
    DownloadModel,

    /// Show store status (DB size, analyzed companies, latest run)
    Status,

    /// Serve the HTTP API
    #[cfg(feature = "web")]
    Serve {
        #[arg(long, default_value = "8000")]
        port: u16,

        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("newscast=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let config = Config::load()?;
            init_database(&config)?;
        }

        Commands::Analyze {
            company,
            count,
            lang,
            out,
        } => {
            let mut config = Config::load()?;
            if let Some(lang) = lang {
                config.language = lang.parse::<NarrationLanguage>()?;
            }
            config.require_classifier()?;

            let store = create_store(&config)?;
            let analyzer = build_analyzer(&config, store)?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner} {msg} [{elapsed}]")
                    .context("Invalid spinner template")?,
            );
            spinner.set_message(format!("Analyzing news coverage of {}", company.trim()));
            spinner.enable_steady_tick(Duration::from_millis(120));

            let outcome = analyzer.analyze(&company, count).await;
            spinner.finish_and_clear();
            let result = outcome?;

            terminal::display_result(&result);

            match result.audio.bytes() {
                Some(bytes) => {
                    let path = out.unwrap_or_else(|| default_audio_path(&result.company));
                    write_audio(&path, bytes)?;
                    println!("\n{} {}", "Audio saved to".bold(), path.display());
                }
                None => println!(
                    "\n{}",
                    "No audio was produced; the text summary above is complete.".yellow()
                ),
            }
        }

        Commands::Show { company } => {
            let config = Config::load()?;
            let store = open_store(&config)?;
            match store.get_result(&company).await? {
                Some(result) => terminal::display_result(&result),
                None => println!(
                    "No analysis stored for {}. Run `newscast analyze \"{}\"` first.",
                    company.trim(),
                    company.trim()
                ),
            }
        }

        Commands::Companies => {
            let config = Config::load()?;
            let store = open_store(&config)?;
            let entries = store.list_entries().await?;
            terminal::display_company_list(&entries);
        }

        Commands::Audio { company, out } => {
            let config = Config::load()?;
            let store = open_store(&config)?;
            let Some(bytes) = store.get_audio(&company).await? else {
                anyhow::bail!("No audio stored for {}", company.trim());
            };
            let path = out.unwrap_or_else(|| default_audio_path(&company));
            write_audio(&path, &bytes)?;
            println!("Audio saved to {} ({} bytes)", path.display(), bytes.len());
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX sentiment model...");
            println!("  Destination: {}", model_dir.display());

            newscast::sentiment::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `newscast analyze <company>`.");
        }

        Commands::Status => {
            let config = Config::load()?;
            match config.store_backend {
                StoreBackend::Memory => {
                    let store: Arc<dyn ResultStore> = Arc::new(InMemoryStore::new());
                    newscast::status::show(&store, None).await?;
                }
                StoreBackend::Sqlite => {
                    if !std::path::Path::new(&config.db_path).exists() {
                        let store: Arc<dyn ResultStore> = Arc::new(InMemoryStore::new());
                        newscast::status::show(&store, Some(&config.db_path)).await?;
                    } else {
                        let store = open_store(&config)?;
                        newscast::status::show(&store, Some(&config.db_path)).await?;
                    }
                }
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            config.require_classifier()?;
            let store = create_store(&config)?;
            let analyzer = Arc::new(build_analyzer(&config, store)?);
            let stored = analyzer.store().result_count().await?;
            info!(stored, "Result store ready");
            newscast::web::run_server(analyzer, port, &bind).await?;
        }
    }

    Ok(())
}

/// Create the SQLite database and report what was created.
#[cfg(feature = "sqlite")]
fn init_database(config: &Config) -> Result<()> {
    info!("Initializing Newscast database...");
    let conn = newscast::db::initialize(&config.db_path)?;
    let table_count = newscast::db::schema::table_count(&conn)?;
    println!("Database initialized at: {}", config.db_path);
    println!("Tables created: {table_count}");
    println!("\nNext step: run `newscast download-model` (or set NEWSCAST_CLASSIFIER=huggingface)");
    println!("Then run: newscast analyze \"<company>\"");
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
fn init_database(_config: &Config) -> Result<()> {
    anyhow::bail!(
        "This build has no SQLite support. Rebuild with: cargo build --features sqlite"
    );
}

/// Store for commands that write results; creates the database if needed.
fn create_store(config: &Config) -> Result<Arc<dyn ResultStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory result store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite => {
            let conn = newscast::db::initialize(&config.db_path)?;
            Ok(Arc::new(newscast::db::SqliteStore::new(conn)))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite => anyhow::bail!(
            "NEWSCAST_STORE=sqlite but the 'sqlite' feature is not compiled in.\n\
             Rebuild with: cargo build --features sqlite, or set NEWSCAST_STORE=memory"
        ),
    }
}

/// Store for read-only commands; the database must already exist.
fn open_store(config: &Config) -> Result<Arc<dyn ResultStore>> {
    match config.store_backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryStore::new())),
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite => {
            let conn = newscast::db::open(&config.db_path)?;
            Ok(Arc::new(newscast::db::SqliteStore::new(conn)))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite => create_store(config),
    }
}

/// Create a sentiment classifier based on the configured backend.
fn create_classifier(config: &Config) -> Result<Arc<dyn SentimentClassifier>> {
    match config.classifier_backend {
        ClassifierBackend::Onnx => {
            info!("Using local ONNX sentiment classifier");
            let classifier =
                OnnxSentimentClassifier::load(&config.model_dir, config.neutral_threshold)?;
            Ok(Arc::new(classifier))
        }
        ClassifierBackend::HuggingFace => {
            info!("Using hosted Hugging Face sentiment classifier");
            Ok(Arc::new(HuggingFaceClassifier::new(
                &config.hf_model_url,
                config.hf_api_token.clone(),
                config.neutral_threshold,
            )))
        }
    }
}

/// Wire the live news source, classifier, topic extractor and TTS backend.
fn build_analyzer(config: &Config, store: Arc<dyn ResultStore>) -> Result<Analyzer> {
    let source = GoogleNewsSource::new(&config.search_url, config.fetch_timeout)?;
    let tts = GoogleTranslateTts::new(&config.tts_url, config.fetch_timeout)?;
    Ok(Analyzer::new(
        Arc::new(source),
        create_classifier(config)?,
        Arc::new(FrequencyExtractor::new(config.topics_per_article)),
        Narrator::new(Arc::new(tts), config.language),
        store,
        config.analysis_options(),
    ))
}

fn default_audio_path(company: &str) -> PathBuf {
    PathBuf::from("output").join(audio_file_name(company))
}

fn write_audio(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
