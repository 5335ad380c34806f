//! Signal scoring over the latest indicator row.

pub mod scorer;

pub use scorer::{score_row, score_symbol, ScoredRow, SCORE_THRESHOLD};
