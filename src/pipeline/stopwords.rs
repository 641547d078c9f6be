//! Stopword set used by the word-frequency stage.
//!
//! The built-in set is NLTK's Turkish list plus a handful of words that
//! dominate corporate reports without carrying content. Callers can add
//! words through [`AnalysisConfig::extra_stopwords`] or a stopword file.
//!
//! [`AnalysisConfig::extra_stopwords`]: crate::AnalysisConfig::extra_stopwords

use crate::config::AnalysisConfig;
use crate::error::InsightError;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// NLTK `stopwords.words('turkish')`.
const NLTK_TURKISH: &[&str] = &[
    "acaba", "ama", "aslında", "az", "bazı", "belki", "biri", "birkaç", "birşey", "biz", "bu",
    "çok", "çünkü", "da", "daha", "de", "defa", "diye", "eğer", "en", "gibi", "hem", "hep",
    "hepsi", "her", "hiç", "için", "ile", "ise", "kez", "ki", "kim", "mı", "mu", "mü", "nasıl",
    "ne", "neden", "nerde", "nerede", "nereye", "niçin", "niye", "o", "sanki", "şey", "siz", "şu",
    "tüm", "ve", "veya", "ya", "yani",
];

/// Report boilerplate that NLTK does not cover.
const REPORT_EXTRAS: &[&str] = &[
    "bir", "ve", "ile", "bu", "de", "da", "için", "olarak", "olan", "daha", "veya", "gibi",
    "kadar", "sonra", "ancak", "yılında", "tarafından",
];

/// A set of lowercase words excluded from counting.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StopwordSet {
    /// The compiled-in Turkish list.
    pub fn builtin() -> Self {
        let words = NLTK_TURKISH
            .iter()
            .chain(REPORT_EXTRAS)
            .map(|w| w.to_string())
            .collect();
        Self { words }
    }

    /// Built-in list plus everything the config adds.
    pub fn load(config: &AnalysisConfig) -> Result<Self, InsightError> {
        let mut set = Self::builtin();
        set.extend(config.extra_stopwords.iter().map(String::as_str));
        if let Some(path) = &config.stopword_file {
            set.extend_from_file(path)?;
        }
        debug!("{} stopwords loaded", set.len());
        Ok(set)
    }

    pub fn extend<'a, I>(&mut self, words: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for w in words {
            let w = w.trim();
            if !w.is_empty() {
                self.words.insert(w.to_lowercase());
            }
        }
    }

    /// One word per line; blank lines and `#` comments are ignored.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<(), InsightError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| InsightError::StopwordsUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        self.extend(
            content
                .lines()
                .map(|line| line.split('#').next().unwrap_or(""))
                .filter(|w| !w.trim().is_empty()),
        );
        Ok(())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
