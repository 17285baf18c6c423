//! Indexer options and their command-line style flag list.
//!
//! The engine boundary takes an ordered list of Anserini-style flags.
//! [`build_args`] derives that list from an [`IndexerOptions`] value:
//! fixed flags first, then string options that are set, then boolean
//! switches that are on. Unset options are omitted, never emitted empty.

use crate::core::config::IndexingConfig;
use crate::core::error::SpaceriniError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Indexing thread count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThreadsRepr", into = "ThreadsRepr")]
pub enum Threads {
    /// One thread per available core, resolved when the flags are built
    #[default]
    Auto,
    Fixed(usize),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ThreadsRepr {
    Count(usize),
    Name(String),
}

impl TryFrom<ThreadsRepr> for Threads {
    type Error = SpaceriniError;

    fn try_from(repr: ThreadsRepr) -> Result<Self, Self::Error> {
        match repr {
            ThreadsRepr::Count(n) => Ok(Threads::Fixed(n)),
            ThreadsRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Threads> for ThreadsRepr {
    fn from(threads: Threads) -> Self {
        match threads {
            Threads::Auto => ThreadsRepr::Name("auto".to_string()),
            Threads::Fixed(n) => ThreadsRepr::Count(n),
        }
    }
}

impl Threads {
    /// Concrete thread count
    pub fn resolve(self) -> usize {
        match self {
            Threads::Auto => num_cpus::get(),
            Threads::Fixed(n) => n,
        }
    }
}

impl FromStr for Threads {
    type Err = SpaceriniError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Threads::Auto);
        }
        s.parse::<usize>().map(Threads::Fixed).map_err(|_| {
            SpaceriniError::ConfigError(format!(
                "Invalid thread count '{s}': expected a number or 'auto'"
            ))
        })
    }
}

impl fmt::Display for Threads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threads::Auto => write!(f, "auto"),
            Threads::Fixed(n) => write!(f, "{n}"),
        }
    }
}

/// Options for one indexing run
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerOptions {
    /// Directory of JSON-lines files (collection mode only)
    pub input: Option<PathBuf>,
    /// Index directory
    pub index: PathBuf,
    pub threads: Threads,
    /// Memory buffer in MB
    pub memory_buffer: String,

    pub analyze_with_hf_tokenizer: Option<String>,
    pub language: Option<String>,
    pub stemmer: Option<String>,
    /// File of extra stop words, one per line
    pub stopwords: Option<PathBuf>,
    /// Extra JSON fields to index beside `contents`
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

impl IndexerOptions {
    /// Defaults: English analysis, positions stored, automatic threads
    pub fn new(index: impl Into<PathBuf>) -> Self {
        Self {
            input: None,
            index: index.into(),
            threads: Threads::Auto,
            memory_buffer: "4096".to_string(),
            analyze_with_hf_tokenizer: None,
            language: Some("en".to_string()),
            stemmer: None,
            stopwords: None,
            fields: Vec::new(),
            pretokenized: false,
            store_positions: true,
            store_docvectors: false,
            store_contents: false,
            store_raw: false,
            keep_stopwords: false,
            optimize: false,
            verbose: false,
            quiet: false,
        }
    }

    /// Options taken from the `[indexing]` configuration section
    pub fn from_config(config: &IndexingConfig, index: &Path) -> Self {
        Self {
            threads: config.threads,
            memory_buffer: config.memory_buffer.clone(),
            language: config.language.clone(),
            stemmer: config.stemmer.clone(),
            store_positions: config.store_positions,
            store_docvectors: config.store_docvectors,
            store_contents: config.store_contents,
            store_raw: config.store_raw,
            keep_stopwords: config.keep_stopwords,
            optimize: config.optimize,
            ..Self::new(index)
        }
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self
    }
}

/// Build the engine flag list
pub fn build_args(options: &IndexerOptions) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(input) = &options.input {
        args.push("-input".to_string());
        args.push(input.display().to_string());
    }
    args.extend([
        "-threads".to_string(),
        options.threads.resolve().to_string(),
        "-collection".to_string(),
        "JsonCollection".to_string(),
        "-generator".to_string(),
        "DefaultLuceneDocumentGenerator".to_string(),
        "-index".to_string(),
        options.index.display().to_string(),
        "-memorybuffer".to_string(),
        options.memory_buffer.clone(),
    ]);

    let stopwords = options.stopwords.as_ref().map(|p| p.display().to_string());
    let optional = [
        ("-analyzeWithHuggingFaceTokenizer", options.analyze_with_hf_tokenizer.as_ref()),
        ("-language", options.language.as_ref()),
        ("-stemmer", options.stemmer.as_ref()),
        ("-stopwords", stopwords.as_ref()),
    ];
    for (flag, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            args.push(flag.to_string());
            args.push(value.clone());
        }
    }

    if !options.fields.is_empty() {
        args.push("-fields".to_string());
        args.push(options.fields.join(" "));
    }

    let switches = [
        ("-pretokenized", options.pretokenized),
        ("-storePositions", options.store_positions),
        ("-storeDocvectors", options.store_docvectors),
        ("-storeContents", options.store_contents),
        ("-storeRaw", options.store_raw),
        ("-keepStopwords", options.keep_stopwords),
        ("-optimize", options.optimize),
        ("-verbose", options.verbose),
        ("-quiet", options.quiet),
    ];
    args.extend(
        switches
            .into_iter()
            .filter(|(_, on)| *on)
            .map(|(flag, _)| flag.to_string()),
    );

    args
}
