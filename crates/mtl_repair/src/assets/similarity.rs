//! Filename similarity scoring
//!
//! Ratio of matching characters between two names, using greedy longest
//! matching blocks: find the longest common run, then recurse on the text to
//! its left and to its right. `ratio = 2 * M / T`, with `M` the matched
//! character count and `T` the combined length.

use std::collections::HashMap;

/// Lowercase a file name and strip a single trailing extension
///
/// A leading dot (`.hidden`) is part of the stem, not an extension.
pub fn normalize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.rfind('.') {
        Some(dot) if dot > 0 => lower[..dot].to_string(),
        _ => lower,
    }
}

/// Similarity ratio between two file names in `[0.0, 1.0]`
///
/// Case-insensitive and extension-blind. Greedy block matching depends on
/// argument order when longest runs tie, so both orders are evaluated and the
/// better one is kept; the result is symmetric.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize_name(a).chars().collect();
    let b: Vec<char> = normalize_name(b).chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matched_chars(&a, &b).max(matched_chars(&b, &a));
    2.0 * matched as f64 / total as f64
}

/// Total length of the greedy matching blocks of `a` against `b`
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b_positions.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &b_positions, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`
///
/// Returns `(start_in_a, start_in_b, length)`. Among equally long runs the one
/// starting earliest in `a` wins, then earliest in `b`.
fn longest_match(
    a: &[char],
    b_positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run_len[j] = length of the common run ending at a[i - 1], b[j]
    let mut run_len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_len = HashMap::new();
        if let Some(positions) = b_positions.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j.checked_sub(1).and_then(|p| run_len.get(&p)).copied().unwrap_or(0) + 1;
                next_run_len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_len = next_run_len;
    }

    (best_i, best_j, best_size)
}
