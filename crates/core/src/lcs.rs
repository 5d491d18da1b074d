//! Longest common subsequence over two value slices, using deep equality as
//! the element predicate. Backing algorithm for the `lcs` array-diff option.

use crate::equal::deep_equal;
use serde_json::Value;

/// One matched pair: index into `src` and the corresponding index into `tgt`.
pub type Pair = (usize, usize);

/// Compute the LCS match-pair sequence between `src` and `tgt`, in
/// increasing order of both indices.
///
/// Standard dynamic-programming table, `O(mn)` time and space. Ties in the
/// backtrack (a cell reachable by both a diagonal match and an off-diagonal
/// step) always prefer the match, so the result favors longer matched runs
/// over earlier-appearing ones.
pub fn lcs(src: &[Value], tgt: &[Value]) -> Vec<Pair> {
    let m = src.len();
    let n = tgt.len();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let mut table = vec![vec![0u32; n + 1]; m + 1];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            table[i][j] = if deep_equal(&src[i], &tgt[j]) {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < m && j < n {
        if deep_equal(&src[i], &tgt[j]) {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}
