use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

/// Fixed English stop list applied after lowercasing.
#[rustfmt::skip]
pub const STOP_WORDS: &[&str] = &[
    "a","about","above","after","again","against","all","also","am","an","and","any","are","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","could","did","do","does","doing","down","during","each","either","etc",
    "few","for","from","further","had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
    "i","if","in","into","is","it","its","itself","just","may","me","might","more","most","must","my","myself",
    "no","nor","not","now","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
    "same","shall","she","should","so","some","such","than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
    "under","until","up","upon","us","very","via","was","we","were","what","when","where","whether","which","while","who","whom","whose","why","will","with","within","without","would",
    "you","your","yours","yourself","yourselves",
];

/// Tokenizer shared by index build and query encoding so both sides see the
/// same terms: split on non-alphanumeric, lowercase, drop stop words and
/// tokens shorter than `min_token_len` characters.
#[derive(Clone)]
pub struct Analyzer {
    inner: TextAnalyzer,
    min_token_len: usize,
}

impl Analyzer {
    pub fn new(min_token_len: usize) -> Self {
        let inner = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .filter(StopWordFilter::remove(STOP_WORDS.iter().map(|s| s.to_string())))
            .build();
        Self {
            inner,
            min_token_len,
        }
    }

    /// Surviving unigrams in text order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        // token_stream needs &mut; the clone keeps the analyzer shareable across readers.
        let mut analyzer = self.inner.clone();
        let mut stream = analyzer.token_stream(text);
        let mut out = Vec::new();
        while stream.advance() {
            let token = &stream.token().text;
            if token.chars().count() >= self.min_token_len {
                out.push(token.clone());
            }
        }
        out
    }

    /// Unigrams followed by bigrams of adjacent surviving tokens.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let mut terms = self.tokens(text);
        let bigrams: Vec<String> = terms
            .windows(2)
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .collect();
        terms.extend(bigrams);
        terms
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(2)
    }
}
