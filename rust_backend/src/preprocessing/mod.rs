pub mod normalizer;
pub mod pipeline;

pub use normalizer::{
    NormalizationOutcome, NormalizationReport, OccupancyNormalizer, RejectedRecord,
};
pub use pipeline::{AnalyticsPipeline, PipelineOutput, RunReport, SkippedRoom};
