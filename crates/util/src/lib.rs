//! jsondiff-util - small general-purpose helpers shared by the jsondiff crates.

pub mod fuzzer;
pub mod json_equal;
pub mod json_size;
pub mod sort;

// Re-exports for convenience
pub use fuzzer::{Fuzzer, Random};
pub use json_equal::deep_equal;
pub use json_size::{json_size, json_size_approx, utf8_size};
pub use sort::{insertion_sort, insertion_sort_by, insertion_sort_by_key};
