use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use thiserror::Error;

use reshub::{
    config::{load_config, ConfigError, ConfigFile},
    diff::check_page,
    logging::{init_logging, LogFormat},
    render::{render_page, section_title},
    CategoryLoader, Container, DirSource, FetchError, LevelFilter, ResourceStore, Source,
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Level(#[from] reshub::resource::UnknownLevel),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("--check needs an output file, pass --output or set `output` in the config")]
    CheckWithoutOutput,
    #[error("failed to encode resources: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} is not a directory, categories can only be discovered locally")]
    NotADirectory(String),
    #[cfg(not(feature = "http"))]
    #[error("http sources need the `http` feature: {0}")]
    HttpDisabled(String),
}

#[derive(Parser, Debug)]
#[command(author, about, version)]
struct Cli {
    /// Directory or base URL holding the `<category>.md` documents
    #[arg(short, long)]
    source: Option<String>,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Categories to load, in display order
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render resource cards into an HTML page
    Render {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,

        /// all, beginner, intermediate or advanced
        #[arg(long)]
        level: Option<String>,

        /// Write the page here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show what would change in the output file without writing it
        #[arg(long)]
        check: bool,
    },
    /// List parsed resources
    List {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        level: Option<String>,

        /// Print JSON instead of one line per resource
        #[arg(long)]
        json: bool,
    },
    /// List the categories found in a resource directory
    Categories,
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn categories(cli: &Cli, config: &ConfigFile) -> Vec<String> {
    if cli.categories.is_empty() {
        config.categories()
    } else {
        cli.categories.clone()
    }
}

fn level_filter(arg: Option<&str>, config: &ConfigFile) -> Result<LevelFilter, CliError> {
    match arg.or(config.level.as_deref()) {
        Some(level) => Ok(level.parse()?),
        None => Ok(LevelFilter::All),
    }
}

fn load_store<S: Source>(source: S, categories: &[String], cache: bool) -> ResourceStore {
    let mut loader = CategoryLoader::new(source);
    if cache {
        loader = loader.with_cache();
    }
    let mut store = ResourceStore::new();
    store.load(&loader, categories);
    store
}

fn open_store(source: &str, categories: &[String], cache: bool) -> Result<ResourceStore, CliError> {
    if is_url(source) {
        #[cfg(feature = "http")]
        return Ok(load_store(
            reshub::source::HttpSource::new(source)?,
            categories,
            cache,
        ));
        #[cfg(not(feature = "http"))]
        return Err(CliError::HttpDisabled(source.to_string()));
    }
    Ok(load_store(DirSource::new(source), categories, cache))
}

/// The page currently on disk; a missing file reads as an empty page.
fn read_existing(path: &Path) -> Result<String, CliError> {
    match fs::read_to_string(path) {
        Ok(current) => Ok(current),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(CliError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = match &cli.config {
        Some(path) => load_config(path, false)?,
        None => ConfigFile::default(),
    };
    let source = cli
        .source
        .clone()
        .unwrap_or_else(|| config.source().to_string());
    tracing::info!(source = %source, "using resource source");

    match &cli.command {
        Commands::Categories => {
            if is_url(&source) || !PathBuf::from(&source).is_dir() {
                return Err(CliError::NotADirectory(source));
            }
            for category in DirSource::new(&source).discover() {
                println!("{category}");
            }
        }
        Commands::List {
            category,
            level,
            json,
        } => {
            let filter = level_filter(level.as_deref(), &config)?;
            let store = open_store(&source, &categories(&cli, &config), config.cache)?;
            let resources = store.filter(category.as_deref(), filter);
            let resources = match config.limit {
                Some(limit) => resources.into_iter().take(limit).collect(),
                None => resources,
            };

            if *json {
                println!("{}", serde_json::to_string_pretty(&resources)?);
            } else {
                for resource in &resources {
                    println!(
                        "[{}] {} <{}> {}",
                        resource.level,
                        resource.title,
                        resource.url,
                        resource.display_description()
                    );
                }
            }
        }
        Commands::Render {
            category,
            level,
            output,
            check,
        } => {
            let filter = level_filter(level.as_deref(), &config)?;
            let store = open_store(&source, &categories(&cli, &config), config.cache)?;
            let resources = store.filter(category.as_deref(), filter);
            let resources = match config.limit {
                Some(limit) => resources.into_iter().take(limit).collect(),
                None => resources,
            };

            let mut container = Container::resources();
            reshub::render_cards(&resources, &mut container);
            let heading = match category {
                Some(category) => section_title(category),
                None => "Resources".to_string(),
            };
            let page = render_page(&heading, &container);

            match output.as_ref().or(config.output.as_ref()) {
                Some(path) if *check => {
                    let report = check_page(&read_existing(path)?, &page);
                    println!("{}", path.display());
                    print!("{}", report.report());
                    if !report.is_up_to_date() {
                        return Ok(ExitCode::FAILURE);
                    }
                }
                Some(path) => {
                    fs::write(path, &page).map_err(|source| CliError::Write {
                        path: path.clone(),
                        source,
                    })?;
                    tracing::info!(path = %path.display(), cards = resources.len(), "wrote page");
                }
                None if *check => return Err(CliError::CheckWithoutOutput),
                None => print!("{page}"),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "reshub failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
