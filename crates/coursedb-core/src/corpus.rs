use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::Record;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Shape of one value in the id-keyed corpus map (`{"02451": {...}}`).
#[derive(Debug, Deserialize)]
struct KeyedRecord {
    title: String,
    #[serde(default, alias = "learning_objectives", alias = "learning-objectives")]
    units: Vec<String>,
}

/// Load a corpus from a file or a directory of `.json` / `.jsonl` shards.
///
/// Records keep file order (and sorted-path order across shards). The result is
/// validated: ids and titles must be non-blank and ids unique.
pub fn load_corpus(path: &Path) -> Result<Vec<Record>> {
    let files = if path.is_dir() {
        list_corpus_files(path)
    } else {
        vec![path.to_path_buf()]
    };
    if files.is_empty() {
        return Err(Error::BuildFailure(format!(
            "no .json/.jsonl files found under {}",
            path.display()
        )));
    }
    let mut records = Vec::new();
    for file in &files {
        let content = fs::read_to_string(file).map_err(|e| {
            Error::BuildFailure(format!("failed to read {}: {}", file.display(), e))
        })?;
        let parsed = parse_corpus(&content).map_err(|e| match e {
            Error::BuildFailure(msg) => Error::BuildFailure(format!("{}: {}", file.display(), msg)),
            other => other,
        })?;
        debug!(file = %file.display(), records = parsed.len(), "parsed corpus file");
        records.extend(parsed);
    }
    validate_records(&records)?;
    info!(records = records.len(), files = files.len(), "loaded corpus");
    Ok(records)
}

/// Parse corpus text in any supported shape: JSON array, id-keyed JSON object,
/// or newline-delimited JSON. A leading UTF-8 byte order mark is ignored.
pub fn parse_corpus(content: &str) -> Result<Vec<Record>> {
    let content = content.trim_start_matches('\u{feff}');
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| Error::BuildFailure(format!("malformed JSON array: {e}")));
    }
    if trimmed.starts_with('{') {
        // A single JSON document could be a keyed map or the first line of JSONL.
        if let Ok(map) = serde_json::from_str::<JsonMap>(trimmed) {
            if !looks_like_record(&map) {
                return parse_keyed(map);
            }
        }
    }
    parse_jsonl(content)
}

fn looks_like_record(map: &JsonMap) -> bool {
    map.get("title").is_some_and(serde_json::Value::is_string)
}

// Keys come back in file order (serde_json `preserve_order`).
fn parse_keyed(map: JsonMap) -> Result<Vec<Record>> {
    let mut records = Vec::with_capacity(map.len());
    for (record_id, value) in map {
        let keyed: KeyedRecord = serde_json::from_value(value)
            .map_err(|e| Error::BuildFailure(format!("record '{record_id}': {e}")))?;
        records.push(Record {
            record_id,
            title: keyed.title,
            units: keyed.units,
        });
    }
    Ok(records)
}

fn parse_jsonl(content: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line)
            .map_err(|e| Error::BuildFailure(format!("line {}: {}", line_no + 1, e)))?;
        records.push(record);
    }
    Ok(records)
}

/// Every record needs a non-blank id and title; ids must be unique.
pub fn validate_records(records: &[Record]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        if r.record_id.trim().is_empty() {
            return Err(Error::BuildFailure(format!("record #{i} has no record_id")));
        }
        if r.title.trim().is_empty() {
            return Err(Error::BuildFailure(format!(
                "record '{}' has no title",
                r.record_id
            )));
        }
        if !seen.insert(r.record_id.as_str()) {
            return Err(Error::BuildFailure(format!(
                "duplicate record_id '{}'",
                r.record_id
            )));
        }
    }
    Ok(())
}

fn list_corpus_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("json") | Some("jsonl")
        ) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}
