mod config;
mod index;

pub use config::Config;
pub use index::IndexConfig;
