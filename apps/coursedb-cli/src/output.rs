//! Human and JSON renderings of query results.

use coursedb_core::types::{HealthReport, RetrievalMode, ScoredResult};
use serde::Serialize;

/// JSON shape of a search or similar response.
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<&'a str>,
    pub mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
    pub top_k: usize,
    pub results: &'a [ScoredResult],
}

impl<'a> JsonOutput<'a> {
    pub fn new(mode: RetrievalMode, top_k: usize, results: &'a [ScoredResult]) -> Self {
        let alpha = match mode {
            RetrievalMode::Hybrid { alpha } => Some(alpha),
            RetrievalMode::Sparse | RetrievalMode::Dense => None,
        };
        Self {
            query: None,
            record_id: None,
            granularity: None,
            mode: mode.name(),
            alpha,
            top_k,
            results,
        }
    }

    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

pub fn format_health_json(report: &HealthReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_health(report: &HealthReport) -> String {
    let mut out = format!(
        "status: {}\nembedder: {} (dim {})\n",
        report.status, report.embedder_id, report.dense_dim
    );
    for (family, size) in &report.index_sizes {
        let vocab = report.vocabulary_sizes.get(family).copied().unwrap_or(0);
        out.push_str(&format!("{family}: {size} documents, {vocab} terms\n"));
    }
    out.trim_end().to_string()
}

pub fn format_human(header: &str, results: &[ScoredResult]) -> String {
    if results.is_empty() {
        return format!("No results for {header}");
    }
    let plural = if results.len() == 1 { "" } else { "s" };
    let mut out = format!("{} result{plural} for {header}:\n\n", results.len());
    for (i, r) in results.iter().enumerate() {
        out.push_str(&format!("{:>3}. {:<8} {:.4}  {}\n", i + 1, r.record_id, r.score, r.title));
        if let Some(unit) = &r.unit_text {
            out.push_str(&format!("     -> {unit}\n"));
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn hit(id: &str, score: f32, unit: Option<&str>) -> ScoredResult {
        ScoredResult {
            record_id: id.into(),
            title: format!("Course {id}"),
            score,
            unit_text: unit.map(String::from),
        }
    }

    #[test]
    fn human_empty() {
        assert_eq!(format_human("\"x\"", &[]), "No results for \"x\"");
    }

    #[test]
    fn human_lists_units_under_their_record() {
        let results = [
            hit("02451", 0.91234, Some("neural networks")),
            hit("02402", 0.1, None),
        ];
        let out = format_human("\"ml\"", &results);
        assert!(out.starts_with("2 results for \"ml\":"));
        assert!(out.contains("02451"));
        assert!(out.contains("0.9123"));
        assert!(out.contains("-> neural networks"));
        assert_eq!(out.matches("->").count(), 1);
    }

    #[test]
    fn json_shape_mirrors_service_response() {
        let results = vec![hit("02451", 0.5, None)];
        let mut json = JsonOutput::new(RetrievalMode::Hybrid { alpha: 0.25 }, 5, &results);
        json.query = Some("ml");
        let v: serde_json::Value = serde_json::from_str(&json.render()).unwrap();
        assert_eq!(v["query"], "ml");
        assert_eq!(v["mode"], "hybrid");
        assert_eq!(v["alpha"], 0.25);
        assert_eq!(v["top_k"], 5);
        assert_eq!(v["results"][0]["record_id"], "02451");
        assert!(v["results"][0].get("unit_text").is_none());
        assert!(v.get("record_id").is_none());
    }

    #[test]
    fn health_lines_per_family() {
        let report = HealthReport {
            status: "ok".into(),
            index_sizes: BTreeMap::from([("coarse".to_string(), 2), ("fine".to_string(), 3)]),
            vocabulary_sizes: BTreeMap::from([
                ("coarse".to_string(), 10),
                ("fine".to_string(), 12),
            ]),
            dense_dim: 384,
            embedder_id: "local:fake:d384".into(),
        };
        let out = format_health(&report);
        assert!(out.contains("coarse: 2 documents, 10 terms"));
        assert!(out.contains("fine: 3 documents, 12 terms"));
        assert!(out.contains("local:fake:d384 (dim 384)"));
    }
}
