use tracing::info;

use coursedb_core::config::Settings;
use coursedb_core::types::{Document, Granularity};
use coursedb_core::{Error, Result};
use coursedb_text::SparseIndex;
use coursedb_vector::{DenseIndex, EmbedProvider, EmbeddingCache};

/// Both vector spaces over one document family. Row `i` of each index is `documents[i]`.
pub struct FamilyIndex {
    pub granularity: Granularity,
    pub documents: Vec<Document>,
    pub sparse: SparseIndex,
    pub dense: DenseIndex,
}

impl FamilyIndex {
    pub fn build(
        granularity: Granularity,
        documents: Vec<Document>,
        provider: &dyn EmbedProvider,
        settings: &Settings,
        cache: &mut EmbeddingCache,
    ) -> Result<Self> {
        let sparse = SparseIndex::build(&documents, &settings.sparse);
        let dense = DenseIndex::build(&documents, provider, settings.embedding.batch_size, cache)
            .map_err(Error::build)?;
        if sparse.len() != documents.len() || dense.len() != documents.len() {
            return Err(Error::BuildFailure(format!(
                "{granularity} family rows disagree: documents={} sparse={} dense={}",
                documents.len(),
                sparse.len(),
                dense.len()
            )));
        }
        info!(
            family = %granularity,
            documents = documents.len(),
            vocabulary = sparse.vocabulary_size(),
            "family index ready"
        );
        Ok(Self {
            granularity,
            documents,
            sparse,
            dense,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
