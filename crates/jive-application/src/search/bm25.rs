//! BM25 keyword scorer.
//!
//! Operates over the candidate document pool the store hands back for the
//! requested corpora; corpus statistics (document frequency, average length)
//! are computed over exactly that pool.

use std::collections::HashMap;

use jive_domain::constants::search::{BM25_B, BM25_K1, BM25_TOKEN_MIN_LENGTH};
use jive_domain::ports::SearchDoc;

/// BM25 tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term-frequency saturation
    pub k1: f32,
    /// Document-length normalization
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: BM25_K1,
            b: BM25_B,
        }
    }
}

/// BM25 scorer over a fixed document pool.
#[derive(Debug)]
pub struct Bm25Scorer {
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    doc_freq: HashMap<String, usize>,
    avg_doc_len: f32,
    params: Bm25Params,
}

impl Bm25Scorer {
    /// Index the document pool. Title, body, and keywords all contribute.
    #[must_use]
    pub fn new(docs: &[SearchDoc], params: Bm25Params) -> Self {
        let mut term_freqs = Vec::with_capacity(docs.len());
        let mut doc_lens = Vec::with_capacity(docs.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let mut text = String::with_capacity(
                doc.title.len() + doc.body.len() + doc.keywords.len() * 8,
            );
            text.push_str(&doc.title);
            text.push(' ');
            text.push_str(&doc.body);
            for keyword in &doc.keywords {
                text.push(' ');
                text.push_str(keyword);
            }

            let tokens = Self::tokenize(&text);
            doc_lens.push(tokens.len());

            let mut freqs: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *freqs.entry(token).or_default() += 1;
            }
            for term in freqs.keys() {
                *doc_freq.entry(term.clone()).or_default() += 1;
            }
            term_freqs.push(freqs);
        }

        let avg_doc_len = if doc_lens.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f32 / doc_lens.len() as f32
        };

        Self {
            term_freqs,
            doc_lens,
            doc_freq,
            avg_doc_len,
            params,
        }
    }

    /// Lowercase, strip punctuation, drop tokens shorter than the minimum.
    #[must_use]
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= BM25_TOKEN_MIN_LENGTH)
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Score one indexed document against the query.
    #[must_use]
    pub fn score(&self, doc_index: usize, query: &str) -> f32 {
        let Some(freqs) = self.term_freqs.get(doc_index) else {
            return 0.0;
        };
        let n = self.term_freqs.len() as f32;
        let doc_len = self.doc_lens[doc_index] as f32;
        let mut score = 0.0;

        for term in Self::tokenize(query) {
            let Some(&tf) = freqs.get(&term) else {
                continue;
            };
            let df = self.doc_freq.get(&term).copied().unwrap_or(0) as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            let tf = tf as f32;
            let denom = tf
                + self.params.k1 * (1.0 - self.params.b + self.params.b * doc_len / self.avg_doc_len.max(1.0));
            score += idf * (tf * (self.params.k1 + 1.0)) / denom;
        }
        score
    }

    /// Score every indexed document against the query, in pool order.
    #[must_use]
    pub fn score_all(&self, query: &str) -> Vec<f32> {
        (0..self.term_freqs.len())
            .map(|i| self.score(i, query))
            .collect()
    }

    /// Number of documents in the pool.
    #[must_use]
    pub fn total_docs(&self) -> usize {
        self.term_freqs.len()
    }

    /// Number of distinct terms across the pool.
    #[must_use]
    pub fn unique_terms(&self) -> usize {
        self.doc_freq.len()
    }

    /// Average tokenized document length.
    #[must_use]
    pub fn avg_doc_len(&self) -> f32 {
        self.avg_doc_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jive_domain::value_objects::ContentType;
    use rstest::rstest;

    fn doc(id: &str, title: &str, body: &str, keywords: &[&str]) -> SearchDoc {
        SearchDoc {
            id: id.to_owned(),
            content_type: ContentType::Troubleshoot,
            title: title.to_owned(),
            body: body.to_owned(),
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("Infinite Render-Loop! (useEffect)", "infinite", true)]
    #[case("Infinite Render-Loop! (useEffect)", "useeffect", true)]
    #[case("Infinite Render-Loop! (useEffect)", "Render", false)]
    #[case("a b see", "a", false)]
    #[case("a b see", "see", true)]
    fn tokenize(#[case] input: &str, #[case] token: &str, #[case] should_contain: bool) {
        let tokens = Bm25Scorer::tokenize(input);
        assert_eq!(tokens.contains(&token.to_owned()), should_contain);
    }

    #[test]
    fn relevant_document_ranks_higher() {
        let docs = vec![
            doc("m1", "React hooks patterns", "component state patterns", &["react"]),
            doc(
                "m2",
                "Infinite render loop",
                "useEffect dependency array causes infinite re-render",
                &["react", "useEffect"],
            ),
        ];
        let scorer = Bm25Scorer::new(&docs, Bm25Params::default());
        let scores = scorer.score_all("useEffect infinite loop");
        assert!(scores[1] > scores[0], "scores: {scores:?}");
    }

    #[test]
    fn keywords_participate_in_scoring() {
        let docs = vec![
            doc("a", "Entry", "body text here", &["caching"]),
            doc("b", "Entry", "body text here", &[]),
        ];
        let scorer = Bm25Scorer::new(&docs, Bm25Params::default());
        assert!(scorer.score(0, "caching") > scorer.score(1, "caching"));
    }

    #[test]
    fn empty_pool_scores_nothing() {
        let scorer = Bm25Scorer::new(&[], Bm25Params::default());
        assert_eq!(scorer.total_docs(), 0);
        assert_eq!(scorer.score(0, "anything"), 0.0);
    }
}
