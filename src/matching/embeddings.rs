//! Embedding providers and vector similarity
//!
//! The scoring pipeline only sees the [`Embedder`] trait; the real
//! implementation wraps a pretrained Model2Vec static model, and a
//! deterministic feature-hashing implementation exists for tests and
//! offline smoke runs. Vectors are produced per call and never cached.

use crate::error::{Result, TalentMatchError};
use model2vec_rs::model::StaticModel;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Text-to-vector capability. Implementations must be deterministic
/// for a given model version and must return a defined vector for the
/// empty string rather than an error.
pub trait Embedder: Send + Sync {
    /// Encode a single text into a fixed-dimension vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode several texts, one vector per input, in input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Identifier of the underlying model, for reporting only.
    fn model_id(&self) -> &str;
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Zero-norm vectors (e.g. from empty text) make the plain formula
/// undefined; the documented fallback is 0.0. A dimension mismatch
/// cannot happen for vectors from one provider instance, but returns
/// 0.0 with a warning instead of producing garbage.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        log::warn!(
            "embedding dimension mismatch ({} vs {}); returning zero similarity",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Cosine similarity of `query` against each row, normalizing the
/// query once per call rather than once per pair.
pub fn batch_similarity(query: &[f32], rows: &[Vec<f32>]) -> Vec<f32> {
    let query_norm: f32 = query.iter().map(|x| x * x).sum::<f32>().sqrt();
    if query_norm == 0.0 {
        return vec![0.0; rows.len()];
    }

    rows.iter()
        .map(|row| {
            if row.len() != query.len() {
                log::warn!(
                    "embedding dimension mismatch ({} vs {}); returning zero similarity",
                    query.len(),
                    row.len()
                );
                return 0.0;
            }
            let row_norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            if row_norm == 0.0 {
                0.0
            } else {
                let dot: f32 = query.iter().zip(row.iter()).map(|(x, y)| x * y).sum();
                dot / (query_norm * row_norm)
            }
        })
        .collect()
}

/// Embedding engine backed by a pretrained Model2Vec static model.
///
/// Loading is the expensive step; inference is read-only, so a loaded
/// engine can be shared freely across threads.
pub struct EmbeddingEngine {
    model: StaticModel,
    model_id: String,
}

impl EmbeddingEngine {
    /// Load a Model2Vec model from a local folder.
    pub fn new(model_path: &Path, model_id: &str) -> Result<Self> {
        log::info!("Loading embedding model from {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None)
            .map_err(|e| {
                TalentMatchError::EmbeddingUnavailable(format!(
                    "failed to load model from {}: {}",
                    model_path.display(),
                    e
                ))
            })?;

        Ok(Self {
            model,
            model_id: model_id.to_string(),
        })
    }
}

impl Embedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Lazily-initialized embedding engine with single-flight semantics.
///
/// The wrapped engine is built on the first `embed` call; concurrent
/// first-time callers block on the cell until that one initialization
/// completes, so no caller ever observes a partially-loaded model and
/// at most one model instance exists. Read-only after initialization.
/// Owned and injected by the caller — there is no process global.
pub struct LazyEmbedder {
    model_path: PathBuf,
    model_id: String,
    cell: OnceCell<EmbeddingEngine>,
}

impl LazyEmbedder {
    pub fn new(model_path: PathBuf, model_id: impl Into<String>) -> Self {
        Self {
            model_path,
            model_id: model_id.into(),
            cell: OnceCell::new(),
        }
    }

    fn engine(&self) -> Result<&EmbeddingEngine> {
        self.cell
            .get_or_try_init(|| EmbeddingEngine::new(&self.model_path, &self.model_id))
    }

    /// Whether the underlying model has been loaded yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Embedder for LazyEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.engine()?.embed(text)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.engine()?.embed_batch(texts)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Default dimension of [`HashingEmbedder`] vectors.
pub const HASHING_EMBEDDER_DIM: usize = 256;

/// Deterministic feature-hashing embedder.
///
/// Tokens are FNV-1a hashed into a fixed number of signed buckets and
/// the result is L2-normalized. No model files, no network. Texts
/// sharing tokens get high cosine similarity, which is enough for
/// tests and offline smoke runs; it is not a substitute for a real
/// semantic model.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self::with_dimension(HASHING_EMBEDDER_DIM)
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    // Changing the hash function changes every vector this embedder
    // has ever produced; treat it as part of the model version.
    fn fnv1a(bytes: &[u8]) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in bytes {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
            .filter(|t| !t.is_empty())
        {
            let hash = Self::fnv1a(token.as_bytes());
            let index = (hash as usize) % self.dimension;
            // Sign hashing keeps the expected bucket sum centered at zero.
            let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.encode(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }

    fn model_id(&self) -> &str {
        "hashing-embedder"
    }
}
