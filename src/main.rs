// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info};
use std::io::Write;
use std::path::PathBuf;

use pinyin_toolkit::app_config::{self, Config};
use pinyin_toolkit::file_utils::FileManager;
use pinyin_toolkit::{DictionaryRegistry, Fact, FieldKind, FieldUpdater};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill the derived fields of a fact from an expression
    Fill(FillArgs),

    /// Show how the dictionary splits a piece of text
    Tokenize {
        /// Text to tokenize
        #[arg(value_name = "TEXT")]
        text: String,

        /// Directory holding the dictionary files
        #[arg(short, long, env = "PINYIN_TOOLKIT_DICTIONARIES")]
        dictionaries: PathBuf,

        /// Meaning language whose dictionary is used
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Generate shell completions for pinyin-toolkit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct FillArgs {
    /// Expression to fill the fact from
    #[arg(short, long)]
    expression: String,

    /// Directory holding the dictionary files
    #[arg(short, long, env = "PINYIN_TOOLKIT_DICTIONARIES")]
    dictionaries: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON object of existing field values; all known fields when omitted
    #[arg(short, long)]
    fact: Option<PathBuf>,

    /// Audio media pack directories, most preferred first
    #[arg(short, long)]
    media: Vec<PathBuf>,

    /// Write the filled fact here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Pinyin Toolkit - fills Chinese vocabulary notes
///
/// Looks expressions up in CEDICT-style dictionaries and generates readings,
/// meanings, measure words, colored characters, audio and web links.
#[derive(Parser, Debug)]
#[command(name = "pinyin-toolkit")]
#[command(version)]
#[command(about = "Chinese vocabulary field generator")]
#[command(long_about = "Pinyin Toolkit fills the reading, meaning, audio and other fields of a Chinese vocabulary note.

EXAMPLES:
    pinyin-toolkit fill -e 书 -d dicts/                      # Fill every field
    pinyin-toolkit fill -e 书 -d dicts/ -f note.json         # Fill the fields of an existing note
    pinyin-toolkit fill -e 书 -d dicts/ -m audio/            # Add sound tags from a media pack
    pinyin-toolkit tokenize 你好吗 -d dicts/                 # Show the tokenization
    pinyin-toolkit completions bash > pinyin-toolkit.bash    # Generate bash completions

CONFIGURATION:
    Options are read from a JSON file given with --config. Every option has a
    default, so the file only needs the options that differ.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    // Let everything through the logger; the effective level is set with max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "pinyin-toolkit", &mut std::io::stdout());
            Ok(())
        }
        Commands::Tokenize {
            text,
            dictionaries,
            language,
        } => run_tokenize(&text, dictionaries, &language),
        Commands::Fill(args) => run_fill(args),
    }
}

fn run_tokenize(text: &str, dictionaries: PathBuf, language: &str) -> Result<()> {
    let registry = DictionaryRegistry::new(dictionaries);
    let dictionary = registry.dictionary_for(language)?;
    let tokens = dictionary.tonedchars(text);
    println!("{}", serde_json::to_string_pretty(&tokens)?);
    Ok(())
}

fn run_fill(options: FillArgs) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => {
            debug!("No config file given, using defaults");
            Config::default()
        }
    };

    // Command line log level wins over the config
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(level_filter(&config.log_level));

    let mut fact = match &options.fact {
        Some(path) => {
            let json = FileManager::read_to_string(path)?;
            serde_json::from_str::<std::collections::BTreeMap<String, String>>(&json)
                .map(Fact::from_strings)
                .with_context(|| format!("Failed to parse fact file: {}", path.display()))?
        }
        None => Fact::from_strings(FieldKind::ALL.iter().map(|kind| (kind.name(), ""))),
    };

    let registry = DictionaryRegistry::new(&options.dictionaries);
    let updater =
        FieldUpdater::load(config, &registry, &options.media).context("Failed to load dictionaries and media")?;
    info!("Filling fields for '{}'", options.expression);

    updater.update(&mut fact, FieldKind::Expression, Some(&options.expression));

    let json = serde_json::to_string_pretty(&fact.to_strings())?;
    match &options.output {
        Some(path) => {
            FileManager::write_to_file(path, &json)?;
            info!("Wrote filled fact to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
