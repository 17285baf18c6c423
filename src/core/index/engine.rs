//! Indexing engine boundary backed by Tantivy.
//!
//! The rest of the crate only talks to the engine through a flag list
//! (see [`super::build_args`]) and JSON documents. [`TantivyEngine`]
//! interprets the flags, builds the analyzer and schema, and writes the
//! index. Analyzer settings are saved beside the index so searchers
//! analyze queries the same way.

use crate::core::error::{Result, SpaceriniError};
use crate::core::shard::list_shards;
use crate::core::types::value_to_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tantivy::schema::*;
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, WhitespaceTokenizer,
};
use tantivy::{Index, IndexWriter, TantivyDocument};

/// Name the analyzer is registered under
pub const ANALYZER_NAME: &str = "spacerini";

/// Analyzer settings saved in the index directory
pub const SETTINGS_FILE: &str = "spacerini.json";

const MAX_THREADS: usize = 8;
const MIN_HEAP_PER_THREAD: usize = 15_000_000;
const MAX_HEAP_PER_THREAD: usize = 3_000_000_000;
const MAX_TOKEN_LEN: usize = 40;

/// Receives documents for one index
pub trait DocumentIndexer {
    /// Add one JSON document (`{"id": .., "contents": ..}`)
    fn add(&mut self, json: &str) -> Result<()>;

    /// Flush buffered documents. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// An indexing engine driven by a flag list
pub trait IndexEngine {
    type Indexer: DocumentIndexer;

    /// Open an indexer for the `-index` directory
    fn open(&self, args: &[String]) -> Result<Self::Indexer>;

    /// Index every `*.json` / `*.jsonl` file under `-input`
    ///
    /// Returns the number of documents added.
    fn index_collection(&self, args: &[String]) -> Result<u64> {
        let input = flag_value(args, "-input").ok_or_else(|| {
            SpaceriniError::ExternalEngine("-input is required to index a collection".to_string())
        })?;
        let files = list_shards(Path::new(input))?;

        let mut indexer = self.open(args)?;
        let outcome = feed_files(&mut indexer, &files);
        let closed = indexer.close();

        let added = outcome?;
        closed?;
        Ok(added)
    }
}

fn feed_files<I: DocumentIndexer>(indexer: &mut I, files: &[PathBuf]) -> Result<u64> {
    let mut added = 0;
    for file in files {
        tracing::debug!("Indexing collection file {}", file.display());
        for line in BufReader::new(File::open(file)?).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            indexer.add(&line)?;
            added += 1;
        }
    }
    Ok(added)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Parsed engine flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineArgs {
    pub input: Option<PathBuf>,
    pub index: PathBuf,
    pub threads: usize,
    pub memory_mb: usize,
    pub language: Option<String>,
    pub stemmer: Option<String>,
    pub stopwords: Option<PathBuf>,
    pub fields: Vec<String>,
    pub pretokenized: bool,
    pub store_positions: bool,
    pub store_docvectors: bool,
    pub store_contents: bool,
    pub store_raw: bool,
    pub keep_stopwords: bool,
    pub optimize: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl EngineArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = EngineArgs {
            threads: 1,
            memory_mb: 4096,
            ..Default::default()
        };
        let mut index = None;

        let mut iter = args.iter();
        while let Some(flag) = iter.next() {
            let mut value = || {
                iter.next().cloned().ok_or_else(|| {
                    SpaceriniError::ExternalEngine(format!("Missing value for {flag}"))
                })
            };

            match flag.as_str() {
                "-input" => parsed.input = Some(PathBuf::from(value()?)),
                "-index" => index = Some(PathBuf::from(value()?)),
                "-threads" => parsed.threads = parse_number(flag, &value()?)?,
                "-memorybuffer" => parsed.memory_mb = parse_number(flag, &value()?)?,
                "-collection" => expect_value(flag, &value()?, "JsonCollection")?,
                "-generator" => expect_value(flag, &value()?, "DefaultLuceneDocumentGenerator")?,
                "-language" => parsed.language = Some(value()?),
                "-stemmer" => parsed.stemmer = Some(value()?),
                "-stopwords" => parsed.stopwords = Some(PathBuf::from(value()?)),
                "-fields" => {
                    parsed.fields = value()?.split_whitespace().map(str::to_string).collect()
                }
                "-analyzeWithHuggingFaceTokenizer" => {
                    return Err(SpaceriniError::ExternalEngine(format!(
                        "Hugging Face tokenizers are not supported (requested {})",
                        value()?
                    )))
                }
                "-pretokenized" => parsed.pretokenized = true,
                "-storePositions" => parsed.store_positions = true,
                "-storeDocvectors" => parsed.store_docvectors = true,
                "-storeContents" => parsed.store_contents = true,
                "-storeRaw" => parsed.store_raw = true,
                "-keepStopwords" => parsed.keep_stopwords = true,
                "-optimize" => parsed.optimize = true,
                "-verbose" => parsed.verbose = true,
                "-quiet" => parsed.quiet = true,
                other => {
                    return Err(SpaceriniError::ExternalEngine(format!(
                        "Unrecognized option: {other}"
                    )))
                }
            }
        }

        parsed.index = index
            .ok_or_else(|| SpaceriniError::ExternalEngine("-index is required".to_string()))?;
        parsed.threads = parsed.threads.clamp(1, MAX_THREADS);

        if parsed.store_docvectors && !parsed.store_positions {
            return Err(SpaceriniError::ExternalEngine(
                "-storeDocvectors requires -storePositions".to_string(),
            ));
        }

        Ok(parsed)
    }

    /// Overall writer heap in bytes, split evenly across threads
    pub fn heap_bytes(&self) -> usize {
        let per_thread = self.memory_mb.saturating_mul(1_000_000) / self.threads;
        per_thread.clamp(MIN_HEAP_PER_THREAD, MAX_HEAP_PER_THREAD) * self.threads
    }
}

fn parse_number(flag: &str, value: &str) -> Result<usize> {
    value.parse().map_err(|_| {
        SpaceriniError::ExternalEngine(format!("{flag} expects a number, got '{value}'"))
    })
}

fn expect_value(flag: &str, value: &str, expected: &str) -> Result<()> {
    if value == expected {
        Ok(())
    } else {
        Err(SpaceriniError::ExternalEngine(format!(
            "Unsupported {flag} '{value}' (only {expected})"
        )))
    }
}

/// How `contents` is analyzed, for indexing and for queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    pub language: Option<String>,
    pub stemmer: Option<String>,
    /// Extra stop words read from the `-stopwords` file
    #[serde(default)]
    pub stopwords: Vec<String>,
    #[serde(default)]
    pub keep_stopwords: bool,
    #[serde(default)]
    pub pretokenized: bool,
}

impl AnalyzerSettings {
    pub fn from_args(args: &EngineArgs) -> Result<Self> {
        let stopwords = match &args.stopwords {
            Some(path) => read_stopwords(path)?,
            None => Vec::new(),
        };

        let settings = Self {
            language: args.language.clone(),
            stemmer: args.stemmer.clone(),
            stopwords,
            keep_stopwords: args.keep_stopwords,
            pretokenized: args.pretokenized,
        };
        // Fail on unsupported settings before anything is written
        settings.build()?;
        Ok(settings)
    }

    /// Build the text analyzer
    pub fn build(&self) -> Result<TextAnalyzer> {
        if self.pretokenized {
            return Ok(TextAnalyzer::builder(WhitespaceTokenizer::default()).build());
        }

        let language = language_for(self.language.as_deref().unwrap_or("en"))?;
        let mut builder = TextAnalyzer::builder(SimpleTokenizer::default())
            .dynamic()
            .filter_dynamic(RemoveLongFilter::limit(MAX_TOKEN_LEN))
            .filter_dynamic(LowerCaser);

        if !self.keep_stopwords {
            if let Some(filter) = StopWordFilter::new(language) {
                builder = builder.filter_dynamic(filter);
            }
        }
        if !self.stopwords.is_empty() {
            builder = builder.filter_dynamic(StopWordFilter::remove(self.stopwords.clone()));
        }

        match self.stemmer.as_deref() {
            None | Some("porter") => builder = builder.filter_dynamic(Stemmer::new(language)),
            Some("none") => {}
            Some(other) => {
                return Err(SpaceriniError::ExternalEngine(format!(
                    "Unsupported stemmer '{other}' (expected porter or none)"
                )))
            }
        }

        Ok(builder.build())
    }

    pub fn save(&self, index_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(index_dir.join(SETTINGS_FILE), json)?;
        Ok(())
    }

    /// Load saved settings, falling back to defaults for foreign indexes
    pub fn load(index_dir: &Path) -> Result<Self> {
        let path = index_dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

fn read_stopwords(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| {
        SpaceriniError::ExternalEngine(format!(
            "Failed to read stop words {}: {e}",
            path.display()
        ))
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty() && !w.starts_with('#'))
        .map(str::to_lowercase)
        .collect())
}

/// ISO 639-1 codes accepted by [`language_for`]
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "da", "de", "el", "en", "es", "fi", "fr", "hu", "it", "nl", "no", "pt", "ro", "ru",
    "sv", "ta", "tr",
];

/// Map an ISO 639-1 code to a stemming language
pub fn language_for(code: &str) -> Result<Language> {
    let language = match code.to_ascii_lowercase().as_str() {
        "ar" => Language::Arabic,
        "da" => Language::Danish,
        "de" => Language::German,
        "el" => Language::Greek,
        "en" => Language::English,
        "es" => Language::Spanish,
        "fi" => Language::Finnish,
        "fr" => Language::French,
        "hu" => Language::Hungarian,
        "it" => Language::Italian,
        "nl" => Language::Dutch,
        "no" => Language::Norwegian,
        "pt" => Language::Portuguese,
        "ro" => Language::Romanian,
        "ru" => Language::Russian,
        "sv" => Language::Swedish,
        "ta" => Language::Tamil,
        "tr" => Language::Turkish,
        other => {
            return Err(SpaceriniError::ExternalEngine(format!(
                "Unsupported language '{other}' (expected one of {})",
                SUPPORTED_LANGUAGES.join(", ")
            )))
        }
    };
    Ok(language)
}

/// Build the index schema
///
/// Fields:
/// - id: document identifier (STRING | STORED)
/// - contents: analyzed text, stored with `-storeContents`
/// - raw: original JSON document, with `-storeRaw`
/// - one analyzed field per `-fields` entry
pub fn create_schema(args: &EngineArgs) -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("id", STRING | STORED);

    let record = if args.store_positions {
        IndexRecordOption::WithFreqsAndPositions
    } else {
        IndexRecordOption::WithFreqs
    };
    let indexing = TextFieldIndexing::default()
        .set_tokenizer(ANALYZER_NAME)
        .set_index_option(record);

    let mut contents = TextOptions::default().set_indexing_options(indexing.clone());
    if args.store_contents {
        contents = contents.set_stored();
    }
    builder.add_text_field("contents", contents);

    if args.store_raw {
        builder.add_text_field("raw", STORED);
    }

    for field in &args.fields {
        if field != "id" && field != "contents" && field != "raw" {
            builder.add_text_field(
                field,
                TextOptions::default().set_indexing_options(indexing.clone()),
            );
        }
    }

    builder.build()
}

/// Open an existing index with its analyzer registered
pub fn open_index(index_dir: &Path) -> Result<Index> {
    if !index_dir.is_dir() {
        return Err(SpaceriniError::ConfigError(format!(
            "Index path {} does not exist",
            index_dir.display()
        )));
    }
    let index = Index::open_in_dir(index_dir)?;
    let analyzer = AnalyzerSettings::load(index_dir)?.build()?;
    index.tokenizers().register(ANALYZER_NAME, analyzer);
    Ok(index)
}

/// Tantivy-backed engine
#[derive(Debug, Clone, Copy, Default)]
pub struct TantivyEngine;

impl IndexEngine for TantivyEngine {
    type Indexer = TantivyIndexer;

    fn open(&self, args: &[String]) -> Result<TantivyIndexer> {
        TantivyIndexer::create(&EngineArgs::parse(args)?)
    }
}

struct DocFields {
    id: Field,
    contents: Field,
    raw: Option<Field>,
    extra: Vec<(String, Field)>,
}

/// Writer for one new index
pub struct TantivyIndexer {
    index: Index,
    writer: Option<IndexWriter>,
    fields: DocFields,
    optimize: bool,
    verbose: bool,
    quiet: bool,
    added: u64,
}

impl std::fmt::Debug for TantivyIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyIndexer")
            .field("open", &self.writer.is_some())
            .field("added", &self.added)
            .finish()
    }
}

impl TantivyIndexer {
    /// Create a new index at `-index`
    pub fn create(args: &EngineArgs) -> Result<Self> {
        let settings = AnalyzerSettings::from_args(args)?;
        let schema = create_schema(args);

        fs::create_dir_all(&args.index)?;
        let index = Index::create_in_dir(&args.index, schema.clone())?;
        index.tokenizers().register(ANALYZER_NAME, settings.build()?);
        settings.save(&args.index)?;

        let writer: IndexWriter = index.writer_with_num_threads(args.threads, args.heap_bytes())?;

        let fields = DocFields {
            id: schema.get_field("id")?,
            contents: schema.get_field("contents")?,
            raw: schema.get_field("raw").ok(),
            extra: args
                .fields
                .iter()
                .filter_map(|name| {
                    schema
                        .get_field(name)
                        .ok()
                        .filter(|_| name != "id" && name != "contents" && name != "raw")
                        .map(|f| (name.clone(), f))
                })
                .collect(),
        };

        if !args.quiet {
            tracing::info!(
                "Opened index {} ({} threads, {} MB heap)",
                args.index.display(),
                args.threads,
                args.heap_bytes() / 1_000_000
            );
        }

        Ok(Self {
            index,
            writer: Some(writer),
            fields,
            optimize: args.optimize,
            verbose: args.verbose,
            quiet: args.quiet,
            added: 0,
        })
    }

    /// Documents added so far
    pub fn added(&self) -> u64 {
        self.added
    }

    fn to_document(&self, json: &str) -> Result<TantivyDocument> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SpaceriniError::ExternalEngine(format!("Malformed document: {e}")))?;
        let object = value.as_object().ok_or_else(|| {
            SpaceriniError::ExternalEngine("Document must be a JSON object".to_string())
        })?;

        let id = object.get("id").ok_or_else(|| {
            SpaceriniError::ExternalEngine("Document is missing an \"id\" field".to_string())
        })?;
        let contents = object.get("contents").ok_or_else(|| {
            SpaceriniError::ExternalEngine(format!(
                "Document {} is missing a \"contents\" field",
                value_to_text(id)
            ))
        })?;

        let mut doc = TantivyDocument::default();
        doc.add_text(self.fields.id, value_to_text(id));
        doc.add_text(self.fields.contents, value_to_text(contents));
        if let Some(raw) = self.fields.raw {
            doc.add_text(raw, json);
        }
        for (name, field) in &self.fields.extra {
            if let Some(v) = object.get(name) {
                doc.add_text(*field, value_to_text(v));
            }
        }
        Ok(doc)
    }
}

impl DocumentIndexer for TantivyIndexer {
    fn add(&mut self, json: &str) -> Result<()> {
        let doc = self.to_document(json)?;
        let writer = self
            .writer
            .as_ref()
            .ok_or_else(|| SpaceriniError::ExternalEngine("Indexer is closed".to_string()))?;
        writer.add_document(doc)?;
        self.added += 1;

        if self.verbose {
            tracing::debug!("Added document {}", self.added);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        writer.commit()?;
        if self.optimize {
            let segments = self.index.searchable_segment_ids()?;
            if segments.len() > 1 {
                writer.merge(&segments).wait()?;
            }
        }
        writer.wait_merging_threads()?;

        if !self.quiet {
            tracing::info!("Indexed {} documents", self.added);
        }
        Ok(())
    }
}
