mod aggregate;
mod sampler;

pub use aggregate::count_in_zones;
pub use sampler::{frames_per_sample, Analyzer, SampleSummary, DEFAULT_SAMPLE_INTERVAL_SECS};
