pub mod macd;
pub mod rsi;
pub mod stochastic;

pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use stochastic::stochastic_k;
