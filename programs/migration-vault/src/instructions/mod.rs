pub mod initialize;
pub mod migrate;

pub use initialize::*;
pub use migrate::*;
