//! Dense retrieval over precomputed embeddings.
//!
//! A corpus of `{"id", "contents"}` JSON lines is encoded into an
//! embedding directory:
//!
//! - `embeddings.jsonl`: one `{"id", "contents", "vector"}` record per document
//! - `encoder.json`: the [`EncoderSpec`] used, so queries are encoded alike
//!
//! Search is an exhaustive inner product against every stored vector.

use crate::core::error::{Result, SpaceriniError};
use crate::core::shard::list_shards;
use crate::core::types::{value_to_text, SearchHit};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const EMBEDDINGS_FILE: &str = "embeddings.jsonl";
pub const ENCODER_FILE: &str = "encoder.json";

/// Maps text to a fixed-size vector
pub trait Encoder: std::fmt::Debug {
    fn dimension(&self) -> usize;

    fn encode(&self, text: &str) -> Vec<f32>;

    fn encode_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

/// Which encoder produced an embedding directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncoderSpec {
    Hashing { dimension: usize },
}

impl EncoderSpec {
    pub fn build(&self) -> Result<Box<dyn Encoder>> {
        match self {
            EncoderSpec::Hashing { dimension } => Ok(Box::new(HashingEncoder::new(*dimension)?)),
        }
    }

    /// Read `encoder.json` from an embedding directory
    pub fn load(embedding_dir: &Path) -> Result<Self> {
        let path = embedding_dir.join(ENCODER_FILE);
        let text = fs::read_to_string(&path).map_err(|e| {
            SpaceriniError::ConfigError(format!(
                "No encoder description at {}: {e}",
                path.display()
            ))
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, embedding_dir: &Path) -> Result<()> {
        fs::write(
            embedding_dir.join(ENCODER_FILE),
            serde_json::to_string_pretty(self)?,
        )?;
        Ok(())
    }
}

/// Signed feature hashing of lowercased alphanumeric tokens
///
/// Each token lands in bucket `crc32(token) % dimension`; the top bit of
/// the hash picks the sign. Vectors are L2-normalized, so the inner
/// product is the cosine similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingEncoder {
    dimension: usize,
}

impl HashingEncoder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(SpaceriniError::ConfigError(
                "Encoder dimension must be non-zero".to_string(),
            ));
        }
        Ok(Self { dimension })
    }
}

impl Encoder for HashingEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = crc32fast::hash(token.to_lowercase().as_bytes());
            let bucket = hash as usize % self.dimension;
            let sign = if hash & 0x8000_0000 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EmbeddingRecord {
    id: String,
    contents: String,
    vector: Vec<f32>,
}

/// Encode every document of a shard directory into `embedding_dir`
///
/// Returns the number of documents encoded.
pub fn encode_corpus(
    shards_dir: &Path,
    spec: &EncoderSpec,
    embedding_dir: &Path,
    batch_size: usize,
) -> Result<u64> {
    if batch_size == 0 {
        return Err(SpaceriniError::ConfigError(
            "Batch size must be non-zero".to_string(),
        ));
    }

    let encoder = spec.build()?;
    let files = list_shards(shards_dir)?;

    fs::create_dir_all(embedding_dir)?;
    let mut writer = BufWriter::new(File::create(embedding_dir.join(EMBEDDINGS_FILE))?);

    let mut batch: Vec<(String, String)> = Vec::with_capacity(batch_size);
    let mut encoded = 0u64;
    for file in &files {
        for line in BufReader::new(File::open(file)?).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            batch.push(parse_document(&line)?);
            if batch.len() == batch_size {
                encoded += write_batch(&mut writer, encoder.as_ref(), &mut batch)?;
            }
        }
    }
    encoded += write_batch(&mut writer, encoder.as_ref(), &mut batch)?;
    writer.flush()?;

    spec.save(embedding_dir)?;
    tracing::info!(
        "Encoded {} documents into {}",
        encoded,
        embedding_dir.display()
    );
    Ok(encoded)
}

fn parse_document(line: &str) -> Result<(String, String)> {
    let value: Value = serde_json::from_str(line)?;
    let id = value.get("id").ok_or_else(|| {
        SpaceriniError::ConfigError("Corpus document is missing an \"id\" field".to_string())
    })?;
    let contents = value.get("contents").map(value_to_text).unwrap_or_default();
    Ok((value_to_text(id), contents))
}

fn write_batch<W: Write>(
    writer: &mut W,
    encoder: &dyn Encoder,
    batch: &mut Vec<(String, String)>,
) -> Result<u64> {
    if batch.is_empty() {
        return Ok(0);
    }

    let texts: Vec<String> = batch.iter().map(|(_, c)| c.clone()).collect();
    let vectors = encoder.encode_batch(&texts);
    let count = batch.len() as u64;

    for ((id, contents), vector) in batch.drain(..).zip(vectors) {
        serde_json::to_writer(
            &mut *writer,
            &EmbeddingRecord {
                id,
                contents,
                vector,
            },
        )?;
        writer.write_all(b"\n")?;
    }
    Ok(count)
}

/// Exhaustive inner-product searcher
#[derive(Debug)]
pub struct DenseSearcher {
    path: PathBuf,
    encoder: Box<dyn Encoder>,
    records: Vec<EmbeddingRecord>,
}

impl DenseSearcher {
    pub fn open(embedding_dir: &Path, encoder: Box<dyn Encoder>) -> Result<Self> {
        let path = embedding_dir.join(EMBEDDINGS_FILE);
        if !path.exists() {
            return Err(SpaceriniError::ConfigError(format!(
                "Dense index {} has no {EMBEDDINGS_FILE}",
                embedding_dir.display()
            )));
        }

        let mut records = Vec::new();
        for line in BufReader::new(File::open(&path)?).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: EmbeddingRecord = serde_json::from_str(&line)?;
            if record.vector.len() != encoder.dimension() {
                return Err(SpaceriniError::ConfigError(format!(
                    "Embedding for {} has dimension {}, encoder produces {}",
                    record.id,
                    record.vector.len(),
                    encoder.dimension()
                )));
            }
            records.push(record);
        }

        tracing::debug!(
            "Loaded {} embeddings from {}",
            records.len(),
            embedding_dir.display()
        );
        Ok(Self {
            path: embedding_dir.to_path_buf(),
            encoder,
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(SpaceriniError::ConfigError(
                "Query cannot be empty".to_string(),
            ));
        }

        let q = self.encoder.encode(query);
        let mut scored: Vec<(f32, &EmbeddingRecord)> = self
            .records
            .iter()
            .map(|r| (dot(&q, &r.vector), r))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(limit);

        tracing::debug!(
            "Dense search {:?} over {} returned {} hits",
            query,
            self.path.display(),
            scored.len()
        );
        Ok(scored
            .into_iter()
            .map(|(score, r)| SearchHit {
                docid: r.id.clone(),
                score,
                contents: Some(r.contents.clone()),
            })
            .collect())
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
