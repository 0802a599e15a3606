pub mod candidates;
pub mod money;

pub use candidates::{extract_candidates, scan_candidates, Candidate};
pub use money::{normalize, CanonicalAmount};
