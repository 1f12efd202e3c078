//! coursedb-embed
//!
//! Sentence embeddings for the dense index: an XLM-RoBERTa encoder run through
//! candle with masked mean pooling, and a hash-based fake for tests and
//! offline development.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::{info, warn};

use coursedb_core::config::EmbeddingSettings;
use coursedb_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean;

pub struct EmbeddingModel {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    max_len: usize,
    pad_id: u32,
}

impl EmbeddingModel {
    /// Load tokenizer, config and weights from `model_dir`. One-time and slow.
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let start = Instant::now();
        let device = device::select_device();
        info!(dir = %model_dir.display(), "loading embedding model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e)
        })?;
        let config_path = model_dir.join("config.json");
        let config_text = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let raw: serde_json::Value = serde_json::from_str(&config_text)?;
        let dim = raw
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("config.json has no hidden_size"))? as usize;
        let pad_id = raw
            .get("pad_token_id")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(1) as u32;
        let config: XLMRobertaConfig = serde_json::from_value(raw)?;
        let weights = load_weights(model_dir, &device)?;
        let prefixed = weights.keys().any(|k| k.starts_with("roberta."));
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let vb = if prefixed { vb.pp("roberta") } else { vb };
        let model = XLMRobertaModel::new(&config, vb)?;
        info!(
            dim,
            max_len,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "embedding model loaded"
        );
        Ok(Self {
            model,
            tokenizer,
            device,
            dim,
            max_len,
            pad_id,
        })
    }

    fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize::tokenize_on_device(
            &self.tokenizer,
            texts,
            self.max_len,
            self.pad_id,
            &self.device,
        )?;
        let token_type_ids =
            Tensor::zeros((texts.len(), self.max_len), DType::I64, &self.device)?;
        let hidden_states = self.model.forward(
            &input_ids,
            &attention_mask,
            &token_type_ids,
            None,
            None,
            None,
        )?;
        let pooled = masked_mean(&hidden_states, &attention_mask)?;
        let rows: Vec<Vec<f32>> = pooled
            .to_device(&Device::Cpu)?
            .to_dtype(DType::F32)?
            .to_vec2()?;
        let elapsed = start.elapsed().as_millis();
        if elapsed > 100 * texts.len() as u128 {
            warn!(batch = texts.len(), elapsed_ms = elapsed as u64, "slow embedding");
        }
        Ok(rows)
    }
}

impl Embedder for EmbeddingModel {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        self.max_len
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_chunk(texts)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return candle_core::safetensors::load(&safetensors, device)
            .with_context(|| format!("loading {}", safetensors.display()));
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        let weights = candle_core::pickle::read_all(&pickle)
            .with_context(|| format!("loading {}", pickle.display()))?;
        return weights
            .into_iter()
            .map(|(k, t)| Ok((k, t.to_device(device)?)))
            .collect();
    }
    Err(anyhow!(
        "no model.safetensors or pytorch_model.bin in {}",
        model_dir.display()
    ))
}

/// Deterministic bag-of-tokens embedder: each lowercased token is hashed into
/// one of `dim` buckets. Texts sharing tokens get similar vectors.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        let lower = text.to_lowercase();
        let tokens = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty());
        for (i, token) in tokens.enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += 0.5 + val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        usize::MAX
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// True when the fake embedder is selected by settings or `APP_USE_FAKE_EMBEDDINGS`.
pub fn uses_fake(settings: &EmbeddingSettings) -> bool {
    settings.use_fake || env_flag("APP_USE_FAKE_EMBEDDINGS")
}

/// Pick the embedder for this process: the fake one when configured (or when
/// `APP_USE_FAKE_EMBEDDINGS` is set), else the on-disk model.
pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    if uses_fake(settings) {
        info!(dim = settings.fake_dim, "using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(settings.fake_dim)));
    }
    let dir = resolve_model_dir(settings.model_dir.as_deref(), &settings.model_name)?;
    Ok(Box::new(EmbeddingModel::load(&dir, settings.max_len)?))
}

/// Resolve the model directory: configured path, then `APP_MODEL_DIR`, then
/// `MODEL_DIR`, then `models/<model_name>` relative to the working dir or its parent.
pub fn resolve_model_dir(configured: Option<&str>, model_name: &str) -> Result<PathBuf> {
    if let Some(dir) = configured {
        let p = coursedb_core::config::expand_path(dir);
        if p.exists() {
            return Ok(p);
        }
        warn!(dir = %p.display(), "configured model dir does not exist");
    }
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = PathBuf::from(&dir);
            if p.exists() {
                info!(dir = %p.display(), var, "using model dir from environment");
                return Ok(p);
            }
        }
    }
    let local = Path::new("models").join(model_name);
    if local.exists() {
        return Ok(local);
    }
    let parent = Path::new("..").join("models").join(model_name);
    if parent.exists() {
        return Ok(parent);
    }
    Err(anyhow!("Could not locate model directory for '{}'", model_name))
}
