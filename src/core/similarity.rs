//! Ratcliff/Obershelp similarity between a keyword and a search term
//!
//! Matches the behaviour of a junk-free gestalt pattern matcher: the longest
//! common block is found first, then both unmatched sides are searched the
//! same way. The ratio is `2 * matched / (len(a) + len(b))`.

use std::collections::HashMap;

/// Divisor used for weighted metrics when the ratio is zero.
pub const ZERO_RATIO_FLOOR: f64 = 0.0001;

/// Second sequences at least this long get the popular-character heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity ratio in `[0.0, 1.0]`. Two empty strings are identical (1.0).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = Matcher::new(&a, &b).matched_chars();
    2.0 * matched as f64 / total as f64
}

/// Divide a report metric by the similarity ratio, substituting
/// `ZERO_RATIO_FLOOR` when nothing matched.
pub fn weighted(metric: f64, ratio: f64) -> f64 {
    if ratio > 0.0 {
        metric / ratio
    } else {
        metric / ZERO_RATIO_FLOOR
    }
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character of `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        // Very frequent characters in long sequences cannot seed a match
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Sum of the sizes of all matching blocks
    fn matched_chars(&self) -> usize {
        let mut matched = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given bounds. Among
    /// equally long blocks the one starting earliest in `a`, then in `b`, wins.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // Length of the match ending at (i - 1, j), keyed by j
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Grow the block over characters the index skipped as popular
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}
