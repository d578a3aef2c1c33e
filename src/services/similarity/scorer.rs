// Similarity Scorer
// Character-level matching-block ratio between two normalized strings
//
// ratio = 2*M / T, where M is the total size of the matching blocks found by
// recursively taking the longest common block and recursing on both sides,
// and T is the combined length of both strings.

use crate::services::text_processor::{normalize_text, round2};
use std::collections::HashMap;

/// Sequences at least this long get "popular" elements pruned from the index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity percentage in [0, 100], two decimals.
///
/// Both inputs are normalized first, so casing and whitespace layout never
/// affect the score. Two empty strings are identical (100.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_norm: Vec<char> = normalize_text(a).chars().collect();
    let b_norm: Vec<char> = normalize_text(b).chars().collect();
    round2(matching_ratio(&a_norm, &b_norm) * 100.0)
}

/// Raw ratio in [0, 1] over two character sequences.
pub fn matching_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = SequenceMatcher::new(a, b).matching_size();
    2.0 * matches as f64 / total as f64
}

/// A block `a[a_start..a_start+size] == b[b_start..b_start+size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each element of `b`, ascending, minus popular elements.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            b2j.entry(ch).or_default().push(j);
        }

        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    fn matching_size(&self) -> usize {
        self.matching_blocks().iter().map(|blk| blk.size).sum()
    }

    fn matching_blocks(&self) -> Vec<MatchBlock> {
        let mut blocks = Vec::new();
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((a_lo, a_hi, b_lo, b_hi)) = queue.pop() {
            let blk = self.find_longest_match(a_lo, a_hi, b_lo, b_hi);
            if blk.size == 0 {
                continue;
            }
            blocks.push(blk);
            if a_lo < blk.a_start && b_lo < blk.b_start {
                queue.push((a_lo, blk.a_start, b_lo, blk.b_start));
            }
            if blk.a_start + blk.size < a_hi && blk.b_start + blk.size < b_hi {
                queue.push((blk.a_start + blk.size, a_hi, blk.b_start + blk.size, b_hi));
            }
        }

        blocks.sort_by_key(|blk| (blk.a_start, blk.b_start));
        blocks
    }

    /// Longest block within `a[a_lo..a_hi]` x `b[b_lo..b_hi]`; earliest in `a`
    /// wins ties, then earliest in `b`.
    fn find_longest_match(&self, a_lo: usize, a_hi: usize, b_lo: usize, b_hi: usize) -> MatchBlock {
        let (a, b) = (self.a, self.b);
        let mut best_i = a_lo;
        let mut best_j = b_lo;
        let mut best_size = 0usize;

        // j2len[j] = length of the longest match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in a_lo..a_hi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < b_lo {
                        continue;
                    }
                    if j >= b_hi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Popular elements are missing from the index; grow the block across them.
        while best_i > a_lo && best_j > b_lo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < a_hi
            && best_j + best_size < b_hi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchBlock {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }
}
