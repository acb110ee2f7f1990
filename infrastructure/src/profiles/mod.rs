//! Role profiles: allowlists plus prompt text

pub mod catalog;

pub use catalog::StaticProfileCatalog;
