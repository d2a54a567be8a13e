//! Edit distance and normalized similarity

/// Levenshtein distance over Unicode scalar values.
///
/// Keeps two rolling rows sized by the shorter input, so memory is
/// O(min(len(a), len(b))).
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    levenshtein_chars(&a, &b)
}

pub(crate) fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    if a == b {
        return 0;
    }

    // Columns follow the shorter string
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for (i, cl) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cs) in short.iter().enumerate() {
            let cost = if cl == cs { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Similarity in [0, 1]: `1 - distance / longer_length`, floored at 0
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    similarity_chars(&a, &b)
}

pub(crate) fn similarity_chars(a: &[char], b: &[char]) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let max_len = a.len().max(b.len());
    let distance = levenshtein_chars(a, b);

    (1.0 - distance as f64 / max_len as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_distances() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("sitting", "kitten"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("", ""), 0);
    }

    #[test]
    fn test_distance_counts_chars_not_bytes() {
        assert_eq!(levenshtein_distance("máquina", "maquina"), 1);
        assert_eq!(levenshtein_distance("ñ", "n"), 1);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
        assert_eq!(similarity("treadmill", "treadmill"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_normalized_by_longer_string() {
        // one substitution over nine characters
        let s = similarity("trradmill", "treadmill");
        assert!((s - 8.0 / 9.0).abs() < 1e-12);

        // kitten/sitting: 3 edits over 7
        let s = similarity("kitten", "sitting");
        assert!((s - 4.0 / 7.0).abs() < 1e-12);
    }
}
