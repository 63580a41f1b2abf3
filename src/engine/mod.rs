mod config;
mod errors;
mod feature_engine;
mod features;
mod percentile;
mod report;
mod summary;

pub use feature_engine::FeatureEngine;
pub use report::FeatureReport;
