use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use coursedb_core::config::Settings;
use coursedb_core::documents::build_documents;
use coursedb_core::traits::Retriever;
use coursedb_core::types::{Granularity, HealthReport, Record, RetrievalMode, ScoredResult};
use coursedb_core::{Error, Result};
use coursedb_vector::{EmbedProvider, EmbeddingCache};

use crate::encoder::{encode_for, QueryVectors};
use crate::family::FamilyIndex;
use crate::ranker::{rank, rank_excluding};
use crate::scorer::{check_mode, score};

/// Immutable retrieval state: the corpus plus a coarse and a fine family index.
/// Built once, then shared read-only between any number of queries.
pub struct HybridRetriever {
    records: Vec<Record>,
    by_id: HashMap<String, usize>,
    coarse: FamilyIndex,
    fine: FamilyIndex,
    provider: Arc<dyn EmbedProvider>,
    max_top_k: usize,
}

impl HybridRetriever {
    /// The blocking build phase. Every failure surfaces as `BuildFailure`.
    pub fn build(
        records: Vec<Record>,
        provider: Arc<dyn EmbedProvider>,
        settings: &Settings,
    ) -> Result<Self> {
        let start = Instant::now();
        if records.is_empty() {
            return Err(Error::BuildFailure("corpus has no records".into()));
        }
        let docs = build_documents(&records)?;
        let mut cache = EmbeddingCache::new();
        let coarse = FamilyIndex::build(
            Granularity::Coarse,
            docs.coarse,
            provider.as_ref(),
            settings,
            &mut cache,
        )?;
        let fine = FamilyIndex::build(
            Granularity::Fine,
            docs.fine,
            provider.as_ref(),
            settings,
            &mut cache,
        )?;
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.record_id.clone(), i))
            .collect();
        info!(
            records = records.len(),
            coarse = coarse.len(),
            fine = fine.len(),
            cached_vectors = cache.len(),
            embedder = provider.embedder_id(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "retriever built"
        );
        Ok(Self {
            records,
            by_id,
            coarse,
            fine,
            provider,
            max_top_k: settings.search.max_top_k,
        })
    }

    pub fn family(&self, granularity: Granularity) -> &FamilyIndex {
        match granularity {
            Granularity::Coarse => &self.coarse,
            Granularity::Fine => &self.fine,
        }
    }

    fn to_results(&self, family: &FamilyIndex, ranked: Vec<(usize, f32)>) -> Vec<ScoredResult> {
        ranked
            .into_iter()
            .filter_map(|(doc, score)| {
                let d = family.documents.get(doc)?;
                let record = self.records.get(d.record_index)?;
                Some(ScoredResult {
                    record_id: record.record_id.clone(),
                    title: record.title.clone(),
                    score,
                    unit_text: d.unit_text.clone(),
                })
            })
            .collect()
    }
}

fn check_request(top_k: usize, mode: RetrievalMode) -> Result<()> {
    if top_k == 0 {
        return Err(Error::invalid("top_k must be a positive integer, got 0"));
    }
    check_mode(mode)
}

impl Retriever for HybridRetriever {
    fn similar(
        &self,
        record_id: &str,
        top_k: usize,
        mode: RetrievalMode,
    ) -> Result<Vec<ScoredResult>> {
        let start = Instant::now();
        check_request(top_k, mode)?;
        let record_index = *self
            .by_id
            .get(record_id)
            .ok_or_else(|| Error::RecordNotFound(record_id.to_string()))?;
        let family = &self.coarse;
        // Coarse documents are one per record, in corpus order.
        let query = QueryVectors {
            sparse: if mode.needs_sparse() {
                family.sparse.row(record_index).cloned()
            } else {
                None
            },
            dense: if mode.needs_dense() {
                family.dense.row(record_index).map(<[f32]>::to_vec)
            } else {
                None
            },
        };
        let scored = score(&query, family, mode)?;
        let ranked = rank_excluding(scored, top_k, self.max_top_k, |doc| {
            family
                .documents
                .get(doc)
                .map(|d| d.record_id == record_id)
                .unwrap_or(false)
        })?;
        debug!(
            record_id,
            %mode,
            hits = ranked.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "similar"
        );
        Ok(self.to_results(family, ranked))
    }

    fn search(
        &self,
        query: &str,
        top_k: usize,
        mode: RetrievalMode,
        granularity: Granularity,
    ) -> Result<Vec<ScoredResult>> {
        let start = Instant::now();
        check_request(top_k, mode)?;
        let family = self.family(granularity);
        let vectors = encode_for(query, family, self.provider.as_ref(), mode)?;
        let scored = score(&vectors, family, mode)?;
        let ranked = rank(scored, top_k, self.max_top_k)?;
        debug!(
            %granularity,
            %mode,
            hits = ranked.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search"
        );
        Ok(self.to_results(family, ranked))
    }

    fn health(&self) -> Result<HealthReport> {
        let mut index_sizes = BTreeMap::new();
        let mut vocabulary_sizes = BTreeMap::new();
        for family in [&self.coarse, &self.fine] {
            let name = family.granularity.family_name().to_string();
            index_sizes.insert(name.clone(), family.len());
            vocabulary_sizes.insert(name, family.sparse.vocabulary_size());
        }
        Ok(HealthReport {
            status: "ok".to_string(),
            index_sizes,
            vocabulary_sizes,
            dense_dim: self.coarse.dense.dim(),
            embedder_id: self.provider.embedder_id().to_string(),
        })
    }
}
