//! Token-set similarity used to rank FAQ questions.
//!
//! Both inputs are normalised with [`default_process`] (lowercase, punctuation
//! folded to whitespace) and split into unique word sets. When one set contains
//! the other the score is 100; otherwise the sorted set differences are compared
//! with an insertion/deletion edit distance and the best of three ratios wins.
//! All lengths are measured in `char`s.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

/// Lowercases, replaces every non-alphanumeric character with a space and
/// collapses runs of whitespace.
pub fn default_process(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Insertion/deletion distance between two strings, counted in `char`s.
pub fn indel_distance(a: &str, b: &str) -> usize {
    indel::distance(a.chars(), b.chars())
}

fn normalized_similarity(dist: usize, lensum: usize) -> f64 {
    if lensum == 0 {
        return 100.0;
    }
    100.0 * (1.0 - dist as f64 / lensum as f64)
}

fn joined_len(tokens: &BTreeSet<&str>) -> usize {
    if tokens.is_empty() {
        return 0;
    }
    tokens.iter().map(|t| t.chars().count()).sum::<usize>() + tokens.len() - 1
}

fn join(tokens: &BTreeSet<&str>) -> String {
    tokens.iter().copied().collect::<Vec<_>>().join(" ")
}

/// Order- and duplicate-insensitive similarity in `[0, 100]`.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a = default_process(a);
    let b = default_process(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let tokens_a: BTreeSet<&str> = a.split(' ').collect();
    let tokens_b: BTreeSet<&str> = b.split(' ').collect();

    let intersection: BTreeSet<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: BTreeSet<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: BTreeSet<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // one side is a subset of the other
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_joined = join(&diff_ab);
    let diff_ba_joined = join(&diff_ba);
    let ab_len = diff_ab_joined.chars().count();
    let ba_len = diff_ba_joined.chars().count();

    let sect_len = joined_len(&intersection);
    let sep = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + sep + ab_len;
    let sect_ba_len = sect_len + sep + ba_len;

    let diff_ratio = normalized_similarity(
        indel_distance(&diff_ab_joined, &diff_ba_joined),
        sect_ab_len + sect_ba_len,
    );
    if sect_len == 0 {
        return diff_ratio;
    }

    // "sect" vs "sect + diff" only differs by the appended diff, so the
    // distance is just its length plus the separating space.
    let sect_ab_ratio = normalized_similarity(sep + ab_len, sect_len + sect_ab_len);
    let sect_ba_ratio = normalized_similarity(sep + ba_len, sect_len + sect_ba_len);

    diff_ratio.max(sect_ab_ratio).max(sect_ba_ratio)
}

/// Rounds to two decimals, the precision scores are reported and compared at.
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounded(a: &str, b: &str) -> f64 {
        round_score(token_set_ratio(a, b))
    }

    #[test]
    fn process_folds_case_and_punctuation() {
        assert_eq!(default_process("  How long, does IT take?! "), "how long does it take");
        assert_eq!(default_process("What's in the bag?"), "what s in the bag");
        assert_eq!(default_process("???"), "");
    }

    #[test]
    fn indel_counts_insertions_and_deletions() {
        assert_eq!(indel_distance("abc", "abd"), 2);
        assert_eq!(indel_distance("", "abc"), 3);
        assert_eq!(indel_distance("cat", "dog"), 6);
        assert_eq!(indel_distance("same", "same"), 0);
    }

    #[test]
    fn identical_token_sets_score_full() {
        assert_eq!(rounded("Hello World", "world hello!!"), 100.0);
        assert_eq!(rounded("order", "order order order"), 100.0);
        assert_eq!(rounded("fuzzy wuzzy was a bear", "fuzzy fuzzy was a bear"), 100.0);
    }

    #[test]
    fn subset_scores_full() {
        assert_eq!(rounded("delivery", "Is the delivery fast?"), 100.0);
    }

    #[test]
    fn partial_overlap_scores_proportionally() {
        assert_eq!(rounded("the cat sat", "the dog sat"), 77.78);
        assert_eq!(rounded("how long does delivery take", "Is the delivery fast?"), 59.57);
    }

    #[test]
    fn disjoint_tokens_fall_back_to_character_overlap() {
        assert_eq!(rounded("apple banana", "cherry date"), 26.09);
        assert_eq!(rounded("abc", "abd"), 66.67);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(token_set_ratio("", "abc"), 0.0);
        assert_eq!(token_set_ratio("abc", "   "), 0.0);
        assert_eq!(token_set_ratio("?!", "?!"), 0.0);
    }

    #[test]
    fn symmetric_under_argument_order() {
        let pairs = [
            ("the cat sat", "the dog sat"),
            ("apple banana", "cherry date"),
            ("when is my order arriving", "Where is my order?"),
        ];
        for (a, b) in pairs {
            assert_eq!(token_set_ratio(a, b), token_set_ratio(b, a), "{a} / {b}");
        }
    }
}
