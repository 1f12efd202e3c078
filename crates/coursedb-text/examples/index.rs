use std::env;
use std::path::PathBuf;

use coursedb_core::config::SparseSettings;
use coursedb_core::corpus::load_corpus;
use coursedb_core::documents::build_documents;
use coursedb_text::SparseIndex;

// Build both sparse families from a corpus file and print their shapes.
// Usage:
//   cargo run -p coursedb-text --example index -- \
//       [--corpus data/courses.json] [--max-features 10000]

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut corpus: Option<PathBuf> = None;
    let mut settings = SparseSettings::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--corpus" => {
                if i + 1 >= args.len() {
                    eprintln!("--corpus requires a path");
                    std::process::exit(2);
                }
                corpus = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--max-features" => {
                if i + 1 >= args.len() {
                    eprintln!("--max-features requires a number");
                    std::process::exit(2);
                }
                settings.max_features = args[i + 1].parse().unwrap_or(settings.max_features);
                i += 2;
            }
            s => {
                eprintln!("Unknown argument: {}", s);
                std::process::exit(2);
            }
        }
    }
    let corpus = corpus
        .or_else(|| env::var("COURSEDB_CORPUS").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data/courses.json"));

    let records = load_corpus(&corpus)?;
    let docs = build_documents(&records)?;
    let coarse = SparseIndex::build(&docs.coarse, &settings);
    let fine = SparseIndex::build(&docs.fine, &settings);
    println!("Sparse index\n============");
    println!("Corpus : {} ({} records)", corpus.display(), records.len());
    println!("Coarse : {} docs, {} terms", coarse.len(), coarse.vocabulary_size());
    println!("Fine   : {} docs, {} terms", fine.len(), fine.vocabulary_size());
    Ok(())
}
