pub mod strategy;
pub mod vault;

pub use strategy::*;
pub use vault::*;
