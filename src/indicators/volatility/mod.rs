pub mod bollinger;

pub use bollinger::bollinger_lower;
