//! Command line front end for editing `.xcstrings` catalogs.

use std::fmt::Write as _;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;
use xcstrings_editor::catalog::PathError;
use xcstrings_editor::codec::ParseError;
use xcstrings_editor::completeness::missing_keys;
use xcstrings_editor::config::{
    ConfigError,
    ConfigManager,
};
use xcstrings_editor::flatten::VariationRow;
use xcstrings_editor::translation::{
    TranslationRequest,
    build_prompt,
};
use xcstrings_editor::view::{
    EntryRow,
    table,
};
use xcstrings_editor::workspace::{
    WorkspaceError,
    find_catalogs,
};
use xcstrings_editor::{
    DocumentStore,
    StoreError,
    VariationPath,
};

#[derive(Parser, Debug)]
#[command(name = "xcstrings-editor")]
#[command(version)]
#[command(about = "Inspect and edit Xcode string catalogs")]
#[command(long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the languages used in a catalog
    Languages {
        /// Catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List keys still needing a translation
    Missing {
        /// Catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target language (defaults to `targetLanguage` from the config)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Print the translation table
    Show {
        /// Catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target language (defaults to `targetLanguage` from the config)
        #[arg(short, long)]
        lang: Option<String>,

        /// Only rows that still need a translation
        #[arg(short, long)]
        missing_only: bool,
    },

    /// Write or delete one translation
    Set {
        /// Catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// String key
        #[arg(short, long)]
        key: String,

        /// Target language (defaults to `targetLanguage` from the config)
        #[arg(short, long)]
        lang: Option<String>,

        /// Variation path such as `device:iphone.plural:one`
        #[arg(short, long)]
        path: Option<String>,

        /// New value. Empty or omitted deletes the translation.
        #[arg(short, long, conflicts_with = "copy_source")]
        value: Option<String>,

        /// Copy the source language value instead of `--value`
        #[arg(long, conflicts_with = "path")]
        copy_source: bool,

        /// Write here instead of overwriting FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the translation prompt for one entry or variation
    Prompt {
        /// Catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// String key
        #[arg(short, long)]
        key: String,

        /// Target language (defaults to `targetLanguage` from the config)
        #[arg(short, long)]
        lang: Option<String>,

        /// Variation path such as `device:iphone.plural:one`
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Apply a model reply containing a `<translation>` element
    Apply {
        /// Catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// String key
        #[arg(short, long)]
        key: String,

        /// Target language (defaults to `targetLanguage` from the config)
        #[arg(short, long)]
        lang: Option<String>,

        /// Variation path such as `device:iphone.plural:one`
        #[arg(short, long)]
        path: Option<String>,

        /// File holding the model reply
        #[arg(short, long, value_name = "REPLY")]
        response: PathBuf,

        /// Write here instead of overwriting FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find catalog files in a workspace
    List {
        /// Workspace root
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
}

/// Failures surfaced to the user
#[derive(Error, Debug)]
enum CliError {
    /// File read or write failed
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
    /// Config file could not be loaded or saved
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Catalog file could not be read
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Edit was rejected
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Workspace walk failed
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    /// Neither `--lang` nor a remembered language
    #[error("No target language. Pass --lang or set \"targetLanguage\" in the config file")]
    NoTargetLanguage,
    /// `prompt` was given a key the catalog lacks
    #[error("String key not found: {0}")]
    KeyNotFound(String),
    /// `--path` text is not a variation path
    #[error("Invalid variation path: {0}")]
    Path(#[from] PathError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(writer)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => match write_stdout(&output).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("Failed to write output: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            let _ = tokio::io::stderr().write_all(format!("error: {e}\n").as_bytes()).await;
            ExitCode::FAILURE
        }
    }
}

/// Executes one command and returns what to print
async fn run(cli: Cli) -> Result<String, CliError> {
    let mut config = ConfigManager::new();

    match cli.command {
        Commands::Languages { file } => {
            let store = open(&file).await?;
            let mut output = String::new();
            if let Some(catalog) = store.catalog() {
                for language in catalog.available_languages() {
                    let marker = if language == catalog.source_language { " (source)" } else { "" };
                    let _ = writeln!(output, "{language}{marker}");
                }
            }
            Ok(output)
        }
        Commands::Missing { file, lang } => {
            config.load_settings(Some(current_dir()?))?;
            let language = target_language(lang, &config)?;
            let store = open(&file).await?;
            let mut output = String::new();
            if let Some(catalog) = store.catalog() {
                for key in missing_keys(catalog, &language) {
                    let _ = writeln!(output, "{key}");
                }
            }
            Ok(output)
        }
        Commands::Show { file, lang, missing_only } => {
            config.load_settings(Some(current_dir()?))?;
            let language = target_language(lang, &config)?;
            let store = open(&file).await?;
            let mut output = String::new();
            if let Some(catalog) = store.catalog() {
                for entry in table(catalog, &language, missing_only) {
                    render_entry(&mut output, &entry.main);
                    for row in &entry.variations {
                        render_variation(&mut output, row);
                    }
                }
            }
            Ok(output)
        }
        Commands::Set { file, key, lang, path, value, copy_source, output } => {
            config.load_settings(Some(current_dir()?))?;
            let language = target_language(lang, &config)?;
            let mut store =
                DocumentStore::with_export_options(config.get_settings().export.into());
            store.import(&read(&file).await?)?;

            if copy_source {
                store.copy_source(&key, &language)?;
            } else {
                store.update_translation(
                    &key,
                    value.as_deref().unwrap_or_default(),
                    &language,
                    path.as_deref(),
                )?;
            }

            save(&store, &output.unwrap_or(file)).await?;
            config.remember_target_language(&language)?;
            Ok(String::new())
        }
        Commands::Prompt { file, key, lang, path } => {
            config.load_settings(Some(current_dir()?))?;
            let language = target_language(lang, &config)?;
            let path = path
                .filter(|text| !text.is_empty())
                .map(|text| text.parse::<VariationPath>())
                .transpose()?;
            let store = open(&file).await?;
            let request = store
                .catalog()
                .and_then(|catalog| {
                    TranslationRequest::for_entry(catalog, &key, &language, path.as_ref())
                })
                .ok_or(CliError::KeyNotFound(key))?;
            tracing::debug!(model = %config.get_settings().translation.model, "Built translation prompt");
            Ok(build_prompt(&request))
        }
        Commands::Apply { file, key, lang, path, response, output } => {
            config.load_settings(Some(current_dir()?))?;
            let language = target_language(lang, &config)?;
            let mut store =
                DocumentStore::with_export_options(config.get_settings().export.into());
            store.import(&read(&file).await?)?;
            let reply = String::from_utf8_lossy(&read(&response).await?).into_owned();

            store.apply_translation(&key, &language, path.as_deref(), &reply)?;

            save(&store, &output.unwrap_or(file)).await?;
            config.remember_target_language(&language)?;
            Ok(String::new())
        }
        Commands::List { dir } => {
            config.load_settings(Some(dir.clone()))?;
            let files = find_catalogs(&dir, config.get_settings())?;
            let mut output = String::new();
            for file in files {
                let shown = file.strip_prefix(&dir).unwrap_or(&file);
                let _ = writeln!(output, "{}", shown.display());
            }
            Ok(output)
        }
    }
}

/// `--lang`, or the remembered target language
fn target_language(lang: Option<String>, config: &ConfigManager) -> Result<String, CliError> {
    lang.or_else(|| config.get_settings().target_language.clone())
        .ok_or(CliError::NoTargetLanguage)
}

/// Working directory, where the config file is looked up
fn current_dir() -> Result<PathBuf, CliError> {
    std::env::current_dir().map_err(|source| CliError::Io { path: PathBuf::from("."), source })
}

/// Reads a whole file
async fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    tokio::fs::read(path).await.map_err(|source| CliError::Io { path: path.to_path_buf(), source })
}

/// Exports the store to `destination`
async fn save(store: &DocumentStore, destination: &Path) -> Result<(), CliError> {
    let bytes = store.export()?;
    tokio::fs::write(destination, bytes)
        .await
        .map_err(|source| CliError::Io { path: destination.to_path_buf(), source })?;
    tracing::debug!(destination = ?destination, "Saved catalog");
    Ok(())
}

/// Reads and imports a catalog file
async fn open(path: &Path) -> Result<DocumentStore, CliError> {
    let mut store = DocumentStore::new();
    store.import(&read(path).await?)?;
    Ok(store)
}

/// `key | source | target | state | comment | badges`
fn render_entry(output: &mut String, row: &EntryRow) {
    let state = row.target_state.as_ref().map(ToString::to_string).unwrap_or_default();
    let _ = writeln!(
        output,
        "{}\t{}\t{}\t{state}\t{}\t{}",
        row.key,
        row.source_value,
        row.target_value.as_deref().unwrap_or_default(),
        row.comment.as_deref().unwrap_or_default(),
        row.badges.join(", "),
    );
}

/// Variation rows are indented one level per depth under their entry
fn render_variation(output: &mut String, row: &VariationRow) {
    let indent = "  ".repeat(row.depth + 1);
    let state = row.target_state.as_ref().map(ToString::to_string).unwrap_or_default();
    let _ = writeln!(
        output,
        "{indent}{}:{}\t{}\t{}\t{state}\t{}",
        row.variation_type, row.var_key, row.source_value, row.target_value, row.path,
    );
}

/// Writes the command output and flushes
async fn write_stdout(output: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    stdout.flush().await
}
