use tracing::info;

use crate::corpus::validate_records;
use crate::error::Result;
use crate::types::{Document, Granularity, Record};

/// Joins the title and every unit of a coarse document.
pub const COARSE_SEPARATOR: &str = "\n";
/// Joins the title and the single unit of a fine document.
pub const FINE_SEPARATOR: &str = " - ";

/// Both document families derived from one corpus, in corpus order.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    pub coarse: Vec<Document>,
    pub fine: Vec<Document>,
}

impl DocumentSet {
    pub fn family(&self, granularity: Granularity) -> &[Document] {
        match granularity {
            Granularity::Coarse => &self.coarse,
            Granularity::Fine => &self.fine,
        }
    }
}

/// Turn records into one coarse document each plus one fine document per unit.
pub fn build_documents(records: &[Record]) -> Result<DocumentSet> {
    validate_records(records)?;
    let total_units: usize = records.iter().map(|r| r.units.len()).sum();
    let mut set = DocumentSet {
        coarse: Vec::with_capacity(records.len()),
        fine: Vec::with_capacity(total_units),
    };
    for (record_index, record) in records.iter().enumerate() {
        set.coarse.push(coarse_document(record, record_index));
        for unit in &record.units {
            set.fine.push(Document {
                text: format!("{}{}{}", record.title, FINE_SEPARATOR, unit),
                record_id: record.record_id.clone(),
                record_index,
                granularity: Granularity::Fine,
                unit_text: Some(unit.clone()),
            });
        }
    }
    info!(coarse = set.coarse.len(), fine = set.fine.len(), "built documents");
    Ok(set)
}

fn coarse_document(record: &Record, record_index: usize) -> Document {
    let mut text = record.title.clone();
    for unit in &record.units {
        text.push_str(COARSE_SEPARATOR);
        text.push_str(unit);
    }
    Document {
        text,
        record_id: record.record_id.clone(),
        record_index,
        granularity: Granularity::Coarse,
        unit_text: None,
    }
}
