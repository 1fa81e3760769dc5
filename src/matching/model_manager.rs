//! Embedding model management: download and cache Model2Vec models

use crate::error::{Result, TalentMatchError};
use hf_hub::api::tokio::Api;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Information about a known embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

/// Files a local directory must contain to count as a loadable
/// Model2Vec model.
const REQUIRED_MODEL_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];

/// Manager for embedding models — handles download, local caching, and
/// selection.
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: HashMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                TalentMatchError::ModelError(format!("failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: Self::known_models(),
            downloaded_models: HashSet::new(),
        };

        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn known_models() -> HashMap<String, EmbeddingModelInfo> {
        let mut models = HashMap::new();

        models.insert(
            "potion-base-8M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                dimensions: 256,
                description: "High-quality Model2Vec embeddings with 8M parameters".to_string(),
            },
        );

        models.insert(
            "m2v-base".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                dimensions: 256,
                description: "Fast Model2Vec base embeddings model".to_string(),
            },
        );

        models.insert(
            "m2v-large".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Large".to_string(),
                repo_id: "minishlab/M2V_large_output".to_string(),
                size_mb: 250,
                dimensions: 512,
                description: "High-capacity Model2Vec large embeddings model".to_string(),
            },
        );

        models
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            TalentMatchError::ModelError(format!("failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            TalentMatchError::ModelError(format!("failed to read directory entry: {}", e))
        })? {
            let path = entry.path();
            if path.is_dir() && Self::is_valid_model_directory(&path).await {
                let model_name = entry.file_name().to_string_lossy().to_string();
                self.downloaded_models.insert(model_name);
            }
        }

        Ok(())
    }

    async fn is_valid_model_directory(path: &Path) -> bool {
        for file in &REQUIRED_MODEL_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a known model from the Hugging Face Hub into the
    /// models directory. Already-downloaded models are returned as-is.
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .ok_or_else(|| TalentMatchError::ModelNotFound(model_id.to_string()))?
            .clone();

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        log::info!(
            "Downloading embedding model {} (~{} MB) from {}",
            model_info.name,
            model_info.size_mb,
            model_info.repo_id
        );

        fs::create_dir_all(&model_dir).await.map_err(|e| {
            TalentMatchError::ModelError(format!("failed to create model directory: {}", e))
        })?;

        let api = Api::new().map_err(|e| {
            TalentMatchError::ModelError(format!("failed to initialize HF API: {}", e))
        })?;
        let repo = api.model(model_info.repo_id.clone());

        for file in &REQUIRED_MODEL_FILES {
            let file_path = repo.get(file).await.map_err(|e| {
                TalentMatchError::ModelError(format!("failed to download {}: {}", file, e))
            })?;
            fs::copy(&file_path, model_dir.join(file)).await.map_err(|e| {
                TalentMatchError::ModelError(format!("failed to copy {}: {}", file, e))
            })?;
            log::debug!("Downloaded {}", file);
        }

        self.downloaded_models.insert(model_id.to_string());
        log::info!("Embedding model {} downloaded", model_info.name);

        Ok(model_dir)
    }

    /// Remove a downloaded model from disk.
    pub async fn remove_model(&mut self, model_id: &str) -> Result<()> {
        if !self.downloaded_models.remove(model_id) {
            return Err(TalentMatchError::ModelNotFound(model_id.to_string()));
        }

        fs::remove_dir_all(self.models_dir.join(model_id))
            .await
            .map_err(|e| {
                TalentMatchError::ModelError(format!("failed to remove model {}: {}", model_id, e))
            })
    }

    /// Path to a downloaded model, if present.
    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        if self.downloaded_models.contains(model_id) {
            Some(self.models_dir.join(model_id))
        } else {
            None
        }
    }

    /// Get a model's local path, downloading it first if needed.
    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        if let Some(path) = self.get_model_path(model_id) {
            return Ok(path);
        }
        self.download_model(model_id).await
    }

    pub fn list_available_models(&self) -> Vec<(&str, &EmbeddingModelInfo)> {
        let mut models: Vec<_> = self
            .available_models
            .iter()
            .map(|(id, info)| (id.as_str(), info))
            .collect();
        models.sort_by(|a, b| a.0.cmp(b.0));
        models
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.downloaded_models.iter().cloned().collect();
        models.sort();
        models
    }

    /// Prefer an already-downloaded model, in quality/size order;
    /// otherwise recommend the default.
    pub fn auto_select_model(&self) -> String {
        let preferred_order = ["potion-base-8M", "m2v-base", "m2v-large"];

        for model_id in &preferred_order {
            if self.downloaded_models.contains(*model_id) {
                return (*model_id).to_string();
            }
        }

        "potion-base-8M".to_string()
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.available_models.get(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve a model ID from its ID, repo ID, or display name.
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        for (id, info) in &self.available_models {
            if info.repo_id == input || info.name.eq_ignore_ascii_case(input) {
                return Some(id.clone());
            }
        }

        None
    }
}
