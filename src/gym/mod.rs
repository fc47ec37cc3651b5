pub mod pasture;

pub use pasture::{Pasture, PastureConfig};
