mod config;
mod db;
mod fetch;
mod mode;
mod model;
mod parser;
mod pipeline;

use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use config::Config;
use fetch::HttpFetcher;
use mode::WorkingMode;
use model::{BookRecord, Books, CreateBookRequest};

#[derive(Parser)]
#[command(name = "book_scraper", about = "Scrape book listings and keep a local library")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape and/or list books depending on the working mode
    Run {
        /// scrap_only, scrap_and_store or retrieve_all (default)
        #[arg(short, long, default_value = "")]
        mode: String,
        /// Index page to scrape (overrides BOOKS_INDEX_URL)
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Print one stored book
    Show {
        id: i64,
    },
    /// Store a book given as JSON: {"title", "description", "isbn", "language"}
    Create {
        json: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Run { mode, url } => {
            if let Some(url) = url {
                config.index_url = url;
            }
            match WorkingMode::from_str_lossy(&mode) {
                WorkingMode::ScrapOnly => {
                    let books = scrape(&config).await?;
                    print_json(&Books::from(books))?;
                }
                WorkingMode::ScrapAndStore => {
                    let books = scrape(&config).await?;
                    let conn = open_db(&config)?;
                    for book in &books {
                        db::store_or_retrieve_by_title(&conn, book)
                            .context("Something went wrong while storing scraped books")?;
                    }
                    print_json(&Books::from(db::fetch_all(&conn)?))?;
                }
                WorkingMode::RetrieveAll => {
                    let conn = open_db(&config)?;
                    let books = db::fetch_all(&conn)
                        .context("Something went wrong while retrieving books from database")?;
                    print_json(&Books::from(books))?;
                }
            }
        }
        Commands::Show { id } => {
            let conn = open_db(&config)?;
            match db::find_by_id(&conn, id)? {
                Some(book) => print_json(&book)?,
                None => bail!("Book {} not found", id),
            }
        }
        Commands::Create { json } => {
            let record = CreateBookRequest::from_json(&json)?.into_record()?;
            let conn = open_db(&config)?;
            let stored = db::insert_book(&conn, &record).context("Failed to store book")?;
            print_json(&serde_json::json!({ "book_id": stored.id }))?;
        }
    }

    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}

async fn scrape(config: &Config) -> anyhow::Result<Vec<BookRecord>> {
    let fetcher = HttpFetcher::new(config)?;
    let books = pipeline::find_books(&fetcher, &config.index_url, config.fetch_concurrency)
        .await
        .context("Something went wrong while searching for books")?;
    info!("Scraped {} books from {}", books.len(), config.index_url);
    Ok(books)
}

fn open_db(config: &Config) -> anyhow::Result<rusqlite::Connection> {
    let conn = db::connect(&config.db_path)
        .with_context(|| format!("Could not open database at {}", config.db_path))?;
    db::init_schema(&conn)?;
    Ok(conn)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
