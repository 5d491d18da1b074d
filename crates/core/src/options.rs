//! Differ configuration.

use serde_json::Value;

/// Marshal override: encode a host value to JSON bytes.
pub type MarshalFn = Box<dyn Fn(&Value) -> Result<Vec<u8>, serde_json::Error>>;
/// Unmarshal override: decode JSON bytes to a value.
pub type UnmarshalFn = Box<dyn Fn(&[u8]) -> Result<Value, serde_json::Error>>;

/// Options controlling the differ's optimization modes and encoder overrides.
///
/// Default is the zero-cost, positional-alignment differ: no factorization,
/// no rationalization, no invertibility markers, no equivalence relaxation.
pub struct Options {
    /// Emit `copy`/`move` for subtrees that reappear unchanged or were just removed.
    pub factorize: bool,
    /// Collapse a subtree's operations into a single `replace` when that is cheaper.
    pub rationalize: bool,
    /// Interleave `test` operations so the patch can be inverted.
    pub invertible: bool,
    /// Treat permuted arrays (recursively) as equal, emitting no operations.
    pub equivalent: bool,
    /// Use LCS-based alignment for array diffing instead of positional alignment.
    pub lcs: bool,
    /// Pointer prefixes whose subtrees are never diffed.
    pub ignores: Vec<String>,
    /// Caller-supplied value encoder; defaults to `serde_json::to_vec`.
    pub marshal: Option<MarshalFn>,
    /// Caller-supplied value decoder; defaults to `serde_json::from_slice`.
    pub unmarshal: Option<UnmarshalFn>,
    /// Skip compacting the target byte view before rationalization.
    pub skip_compact: bool,
    /// Compact the target byte view in place rather than copying.
    pub in_place_compaction: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            factorize: false,
            rationalize: false,
            invertible: false,
            equivalent: false,
            lcs: false,
            ignores: Vec::new(),
            marshal: None,
            unmarshal: None,
            skip_compact: false,
            in_place_compaction: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factorize(mut self, on: bool) -> Self {
        self.factorize = on;
        self
    }

    pub fn rationalize(mut self, on: bool) -> Self {
        self.rationalize = on;
        self
    }

    pub fn invertible(mut self, on: bool) -> Self {
        self.invertible = on;
        self
    }

    pub fn equivalent(mut self, on: bool) -> Self {
        self.equivalent = on;
        self
    }

    pub fn lcs(mut self, on: bool) -> Self {
        self.lcs = on;
        self
    }

    pub fn ignores(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.ignores = paths.into_iter().collect();
        self
    }

    pub fn skip_compact(mut self, on: bool) -> Self {
        self.skip_compact = on;
        self
    }

    pub fn in_place_compaction(mut self, on: bool) -> Self {
        self.in_place_compaction = on;
        self
    }

    /// True if `pointer` is equal to, or nested under, any configured ignore path.
    pub fn is_ignored(&self, pointer: &str) -> bool {
        self.ignores.iter().any(|prefix| {
            pointer == prefix
                || pointer
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_matches_exact_and_nested() {
        let opts = Options::new().ignores(["/a/b".to_string()]);
        assert!(opts.is_ignored("/a/b"));
        assert!(opts.is_ignored("/a/b/c"));
        assert!(!opts.is_ignored("/a/bc"));
        assert!(!opts.is_ignored("/a"));
    }

    #[test]
    fn default_has_every_optimization_off() {
        let opts = Options::default();
        assert!(!opts.factorize && !opts.rationalize && !opts.invertible);
        assert!(!opts.equivalent && !opts.lcs);
    }
}
