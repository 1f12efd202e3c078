//! Domain types shared by the sparse, dense and hybrid engines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub type RecordId = String;

/// The atomic corpus unit (e.g. one course).
///
/// - `record_id`: stable external identifier, unique within a corpus
/// - `title`: human-readable name
/// - `units`: ordered sub-texts (e.g. learning objectives)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "course_id", alias = "course_code", alias = "id")]
    pub record_id: RecordId,
    pub title: String,
    #[serde(default, alias = "learning_objectives", alias = "learning-objectives")]
    pub units: Vec<String>,
}

impl Record {
    pub fn new(record_id: impl Into<String>, title: impl Into<String>, units: Vec<String>) -> Self {
        Self {
            record_id: record_id.into(),
            title: title.into(),
            units,
        }
    }
}

/// Whether a document represents a whole record or one of its units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Coarse,
    Fine,
}

impl Granularity {
    pub fn family_name(self) -> &'static str {
        match self {
            Granularity::Coarse => "coarse",
            Granularity::Fine => "fine",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family_name())
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" | "course" | "courses" => Ok(Granularity::Coarse),
            "fine" | "objective" | "objectives" => Ok(Granularity::Fine),
            other => Err(Error::invalid(format!("unknown granularity '{other}'"))),
        }
    }
}

/// A derived, indexable text blob. Built once at index time, immutable after.
///
/// `record_index` points into the corpus slice the document was built from;
/// `unit_text` is set only for [`Granularity::Fine`] documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub record_id: RecordId,
    pub record_index: usize,
    pub granularity: Granularity,
    pub unit_text: Option<String>,
}

/// Closed set of scoring modes. Alpha is validated on construction so the
/// scorer can match exhaustively without re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RetrievalMode {
    Sparse,
    Dense,
    Hybrid { alpha: f32 },
}

impl RetrievalMode {
    pub fn hybrid(alpha: f32) -> Result<Self> {
        validate_alpha(alpha)?;
        Ok(RetrievalMode::Hybrid { alpha })
    }

    /// Boundary constructor: a free-form mode name plus the alpha the caller sent.
    /// Alpha is range-checked for every mode, matching the query-string contract.
    pub fn from_parts(mode: &str, alpha: f32) -> Result<Self> {
        validate_alpha(alpha)?;
        match mode.trim().to_ascii_lowercase().as_str() {
            "sparse" => Ok(RetrievalMode::Sparse),
            "dense" => Ok(RetrievalMode::Dense),
            "hybrid" => Ok(RetrievalMode::Hybrid { alpha }),
            other => Err(Error::invalid(format!(
                "unknown mode '{other}' (expected sparse|dense|hybrid)"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RetrievalMode::Sparse => "sparse",
            RetrievalMode::Dense => "dense",
            RetrievalMode::Hybrid { .. } => "hybrid",
        }
    }

    pub fn needs_sparse(&self) -> bool {
        !matches!(self, RetrievalMode::Dense)
    }

    pub fn needs_dense(&self) -> bool {
        !matches!(self, RetrievalMode::Sparse)
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalMode::Hybrid { alpha } => write!(f, "hybrid(alpha={alpha})"),
            other => f.write_str(other.name()),
        }
    }
}

fn validate_alpha(alpha: f32) -> Result<()> {
    if alpha.is_nan() || !(0.0..=1.0).contains(&alpha) {
        return Err(Error::invalid(format!("alpha must be within [0.0, 1.0], got {alpha}")));
    }
    Ok(())
}

/// Validate a signed `top_k` from an external caller: non-positive values are
/// rejected, values above `max_top_k` are clamped.
pub fn parse_top_k(raw: i64, max_top_k: usize) -> Result<usize> {
    if raw <= 0 {
        return Err(Error::invalid(format!("top_k must be a positive integer, got {raw}")));
    }
    let requested = usize::try_from(raw).unwrap_or(usize::MAX);
    Ok(requested.min(max_top_k))
}

/// One ranked hit as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub record_id: RecordId,
    pub title: String,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_text: Option<String>,
}

/// Index sizes reported without touching the similarity path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub index_sizes: BTreeMap<String, usize>,
    pub vocabulary_sizes: BTreeMap<String, usize>,
    pub dense_dim: usize,
    pub embedder_id: String,
}
