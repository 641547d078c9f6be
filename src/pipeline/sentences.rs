//! Sentence segmentation.
//!
//! Segmentation is naive: page text is split on every `.`
//! and each fragment trimmed. Fragments under the minimum length are
//! treated as headings, numbers or abbreviations and dropped. This keeps
//! `"3.5"` or `"A.Ş."` out of the sentiment table.

/// A fragment that passed the length filter, tagged with its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub page: usize,
    pub text: String,
}

/// Tallies from one segmentation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitCounts {
    /// Every fragment produced by the split, empty ones included.
    pub found: usize,
    pub too_short: usize,
}

/// Split one page's text into trimmed candidate sentences.
pub fn split_page(page: usize, text: &str, min_chars: usize, counts: &mut SplitCounts) -> Vec<Candidate> {
    let mut out = Vec::new();
    for fragment in text.split('.') {
        counts.found += 1;
        let trimmed = fragment.trim();
        if trimmed.chars().count() < min_chars {
            counts.too_short += 1;
            continue;
        }
        out.push(Candidate {
            page,
            text: trimmed.to_string(),
        });
    }
    out
}

/// Whole-document text for word counting: non-empty pages joined by a space.
pub fn join_pages<'a, I>(pages: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    pages
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_fragments_are_dropped() {
        let mut counts = SplitCounts::default();
        let out = split_page(
            1,
            "Bu raporun birinci cümlesi oldukça uzun ve anlamlıdır. Kısa.",
            20,
            &mut counts,
        );
        assert_eq!(
            out,
            vec![Candidate {
                page: 1,
                text: "Bu raporun birinci cümlesi oldukça uzun ve anlamlıdır".into()
            }]
        );
        // "...anlamlıdır", " Kısa", ""
        assert_eq!(counts.found, 3);
        assert_eq!(counts.too_short, 2);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 20 chars, 26 bytes.
        let s = "çğıöşüÇĞİÖŞÜabcdefgh";
        assert_eq!(s.chars().count(), 20);
        let mut counts = SplitCounts::default();
        assert_eq!(split_page(2, s, 20, &mut counts).len(), 1);
        assert_eq!(split_page(2, &s[..s.len() - 1], 20, &mut counts).len(), 0);
    }

    #[test]
    fn decimals_split_into_short_fragments() {
        let mut counts = SplitCounts::default();
        let out = split_page(1, "Gelir 3.5 milyar TL oldu", 20, &mut counts);
        assert!(out.is_empty());
        assert_eq!(counts.found, 2);
    }

    #[test]
    fn join_skips_blank_pages() {
        assert_eq!(join_pages(["ilk sayfa", "  ", "son sayfa"]), "ilk sayfa son sayfa");
        assert_eq!(join_pages(Vec::<&str>::new()), "");
    }
}
