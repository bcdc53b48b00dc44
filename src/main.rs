// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use ebt_translator::app_config::{self, Config, EngineProvider};
use ebt_translator::file_utils::FileManager;
use ebt_translator::glossary::GlossaryManager;
use ebt_translator::providers::deepl::DeepL;
use ebt_translator::providers::mock::MockEngine;
use ebt_translator::providers::{GlossaryProvider, TranslationEngine};
use ebt_translator::quotes::{resolve, NestingScanner, QuoteConverter};
use ebt_translator::translation::{align_columns, render_rows, Segment, SegmentColumn, SegmentTranslator};

/// CLI Wrapper for EngineProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEngine {
    Deepl,
    Mock,
}

impl From<CliEngine> for EngineProvider {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::Deepl => EngineProvider::DeepL,
            CliEngine::Mock => EngineProvider::Mock,
        }
    }
}

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
    /// Translate a segment document
    Translate(TranslateArgs),

    /// Convert the quotation glyphs of a text between conventions
    Convert {
        /// Convention of the input text (e.g. 'en-us', 'pt-deepl')
        #[arg(long)]
        from: String,

        /// Convention to convert into
        #[arg(long)]
        to: String,

        /// Nesting level open before the text
        #[arg(short, long, default_value_t = 0)]
        level: usize,

        /// Text to convert
        text: String,
    },

    /// Check the quotation nesting of a text
    Scan {
        /// Convention of the text
        #[arg(long)]
        convention: String,

        /// Nesting level open before the text
        #[arg(short, long, default_value_t = 0)]
        level: usize,

        /// Text to scan
        text: String,
    },

    /// Generate shell completions for ebt-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Segment document (JSON object of scid -> text)
    #[arg(value_name = "SEGMENTS_JSON")]
    segments_path: PathBuf,

    /// Source language tag (e.g. 'en', 'de')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language tag (e.g. 'pt', 'pt-br', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Author of the source segments
    #[arg(long)]
    src_author: Option<String>,

    /// Author recorded for the translation
    #[arg(long)]
    dst_author: Option<String>,

    /// Translation engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliEngine>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Output file; the translation is printed when neither this nor --write is given
    #[arg(short, long, conflicts_with = "write")]
    output: Option<PathBuf>,

    /// Write the translation next to the source in the corpus tree
    #[arg(short, long)]
    write: bool,

    /// Overwrite an existing translation file
    #[arg(long)]
    dst_replace: bool,

    /// Upload the local glossary before translating
    #[arg(long)]
    update_glossary: bool,

    /// Nesting level open before the first segment
    #[arg(short, long, default_value_t = 0)]
    level: usize,

    /// Second source document, translated into the same target language
    #[arg(long, value_name = "SEGMENTS_JSON", requires = "src_lang2", requires = "src_author2")]
    src2: Option<PathBuf>,

    /// Language of the second source (e.g. 'de')
    #[arg(long, requires = "src2")]
    src_lang2: Option<String>,

    /// Author of the second source
    #[arg(long, requires = "src2")]
    src_author2: Option<String>,

    /// Existing translation shown for comparison; never sent to the engine
    #[arg(long, value_name = "SEGMENTS_JSON", requires = "out_all")]
    reference: Option<PathBuf>,

    /// Print sources, reference and translations side by side per segment
    #[arg(long, conflicts_with_all = ["output", "write", "output2"])]
    out_all: bool,

    /// Output file for the translation of the second source
    #[arg(long, requires = "src2")]
    output2: Option<PathBuf>,
}

/// Second source document and its translation
struct SecondSource {
    config: Config,
    path: PathBuf,
    segments: Vec<Segment>,
    translated: Vec<Segment>,
}

/// ebt-translator - machine translation of scripture segments
///
/// Translates segment documents with DeepL while keeping nested quotations
/// intact across languages with different quotation conventions.
#[derive(Parser, Debug)]
#[command(name = "ebt-translator")]
#[command(version = "0.1.0")]
#[command(about = "Quotation-aware scripture segment translator")]
#[command(long_about = "ebt-translator translates segment documents and converts nested quotation marks between language conventions.

EXAMPLES:
    ebt-translator translate mn1_translation-en-sujato.json -t pt     # Print Portuguese translation
    ebt-translator translate -w --dst-replace mn1_translation-en-sujato.json
    ebt-translator translate mn1_translation-en-sujato.json --src2 mn1_translation-de-sabbamitta.json \
        --src-lang2 de --src-author2 sabbamitta --reference mn1_translation-pt-laera-quaresma.json --out-all
    ebt-translator convert --from en-us --to en-uk '“I say: ‘done’”'
    ebt-translator scan --convention pt-deepl -l 2 'Eu disse!</x>?</w>'
    ebt-translator completions bash > ebt-translator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (colour, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the max level filters
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ebt-translator", &mut std::io::stdout());
            Ok(())
        }
        Commands::Convert { from, to, level, text } => run_convert(&from, &to, level, &text),
        Commands::Scan { convention, level, text } => run_scan(&convention, level, &text),
        Commands::Translate(args) => run_translate(args, cli.log_level).await,
    }
}

fn run_convert(from: &str, to: &str, level: usize, text: &str) -> Result<()> {
    let source = resolve(from)?;
    let target = resolve(to)?;
    let converted = QuoteConverter::new(source).convert(text, &target, level)?;
    println!("{}", converted.text);
    println!("level: {}", converted.level);
    Ok(())
}

fn run_scan(convention: &str, level: usize, text: &str) -> Result<()> {
    let scanner = NestingScanner::new(resolve(convention)?);
    let state = scanner.scan(text, level)?;
    println!("level: {} quotes: {}", state.level, state.quotes);
    Ok(())
}

/// Load the config file, or create a default one, then apply CLI overrides
fn load_config(options: &TranslateArgs, log_level: Option<&CliLogLevel>) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        let mut config = Config::default();
        if let Some(level) = log_level {
            config.log_level = level.clone().into();
        }
        config.save(config_path)?;
        config
    };

    if let Some(engine) = &options.engine {
        config.engine.provider = engine.clone().into();
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(author) = &options.src_author {
        config.source_author = author.clone();
    }
    if let Some(author) = &options.dst_author {
        config.target_author = author.clone();
    }
    if options.update_glossary {
        config.glossary.update = true;
    }
    if let Some(level) = log_level {
        config.log_level = level.clone().into();
    }

    Ok(config)
}

async fn run_translate(options: TranslateArgs, log_level: Option<CliLogLevel>) -> Result<()> {
    let config = load_config(&options, log_level.as_ref())?;

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    if log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let segments = FileManager::read_segments(&options.segments_path)?;
    info!("Translating {:?} ({} segments)", options.segments_path, segments.len());
    let translated = translate_document(&config, &options, &segments).await?;

    let second = match &options.src2 {
        Some(path) => Some(translate_second_source(&config, &options, path).await?),
        None => None,
    };

    if options.out_all {
        let reference = match &options.reference {
            Some(path) => Some(FileManager::read_segments(path)?),
            None => None,
        };
        print!(
            "{}",
            comparison_report(&config, &segments, &translated, second.as_ref(), reference.as_deref())
        );
        return Ok(());
    }

    let output = if let Some(output) = &options.output {
        Some(output.clone())
    } else if options.write {
        Some(FileManager::translation_path(
            &options.segments_path,
            &config.source_language,
            &config.source_author,
            &config.target_language,
            &config.target_author,
        ))
    } else {
        None
    };

    match output {
        Some(path) => write_translation(&path, &translated, options.dst_replace)?,
        None => println!("{}", FileManager::segments_to_json(&translated)?),
    }

    if let Some(second) = &second {
        let output2 = if let Some(output) = &options.output2 {
            Some(output.clone())
        } else if options.write {
            Some(FileManager::translation_path(
                &second.path,
                &second.config.source_language,
                &second.config.source_author,
                &second.config.target_language,
                &second.config.target_author,
            ))
        } else {
            None
        };
        match output2 {
            Some(path) => write_translation(&path, &second.translated, options.dst_replace)?,
            None => warn!("Translation of {:?} not written; use --output2, --write or --out-all", second.path),
        }
    }

    Ok(())
}

fn write_translation(path: &Path, segments: &[Segment], replace: bool) -> Result<()> {
    if FileManager::write_segments(path, segments, replace)? {
        info!("Success: {:?}", path);
    }
    Ok(())
}

async fn translate_second_source(
    config: &Config,
    options: &TranslateArgs,
    path: &Path,
) -> Result<SecondSource> {
    let language = options
        .src_lang2
        .as_deref()
        .context("--src-lang2 is required with --src2")?;
    let author = options
        .src_author2
        .as_deref()
        .context("--src-author2 is required with --src2")?;

    let config = config.for_source(language, author);
    config
        .validate()
        .context("Second source configuration validation failed")?;

    let segments = FileManager::read_segments(path)?;
    info!("Translating {:?} ({} segments)", path, segments.len());
    let translated = translate_document(&config, options, &segments).await?;

    Ok(SecondSource {
        config,
        path: path.to_path_buf(),
        segments,
        translated,
    })
}

/// Header lines followed by the aligned segments of every document
fn comparison_report(
    config: &Config,
    segments: &[Segment],
    translated: &[Segment],
    second: Option<&SecondSource>,
    reference: Option<&[Segment]>,
) -> String {
    let target = &config.target_language;
    let mut header = vec![format!("Source1  : {}/{}", config.source_language, config.source_author)];
    let mut columns: Vec<(String, &[Segment])> = vec![(config.source_language.clone(), segments)];
    if let Some(second) = second {
        header.push(format!(
            "Source2  : {}/{}",
            second.config.source_language, second.config.source_author
        ));
        columns.push((second.config.source_language.clone(), second.segments.as_slice()));
    }
    if let Some(reference) = reference {
        columns.push(("ref".to_string(), reference));
    }
    header.push(format!("Target   : {}/{}", target, config.target_author));
    columns.push((format!("{}-{}", config.source_language, target), translated));
    if let Some(second) = second {
        columns.push((
            format!("{}-{}", second.config.source_language, target),
            second.translated.as_slice(),
        ));
    }

    let columns: Vec<SegmentColumn<'_>> = columns
        .iter()
        .map(|(label, segs)| SegmentColumn::new(label, segs))
        .collect();
    format!("{}\n{}", header.join("\n"), render_rows(&align_columns(&columns)))
}

/// Translate `segments` with the engine `config` selects
async fn translate_document(
    config: &Config,
    options: &TranslateArgs,
    segments: &[Segment],
) -> Result<Vec<Segment>> {
    match config.engine.provider {
        EngineProvider::DeepL => {
            let engine = DeepL::from_config(&config.engine)?;
            translate_with(engine, config, options, segments).await
        }
        EngineProvider::Mock => translate_with(MockEngine::echo(), config, options, segments).await,
    }
}

async fn translate_with<E>(
    mut engine: E,
    config: &Config,
    options: &TranslateArgs,
    segments: &[Segment],
) -> Result<Vec<Segment>>
where
    E: TranslationEngine + GlossaryProvider,
{
    let manager = GlossaryManager::new(
        &config.glossary.directory,
        &config.source_language,
        &config.target_language,
        config.glossary_author(),
    );
    match manager.attach(&mut engine, config.glossary.update).await? {
        Some(glossary) => info!("Using glossary {} ({} entries)", glossary.name, glossary.entry_count),
        None => info!("No glossary {}", manager.name()),
    }

    let mut translator = SegmentTranslator::from_config(engine, config)?.with_start_level(options.level);
    let translated = translator.translate_segments(segments).await?;

    if translator.source_level() != 0 || translator.target_level() != 0 {
        warn!(
            "Quotations still open after last segment (source level {}, target level {})",
            translator.source_level(),
            translator.target_level()
        );
    }
    Ok(translated)
}
