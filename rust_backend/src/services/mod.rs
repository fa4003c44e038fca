//! Summary tables for the presentation layer.
//!
//! These are computed from the normalized records and the utilization table
//! after classification; nothing here feeds back into the pipeline.

pub mod insights;

pub use insights::{
    capacity_distribution, compute_insights, course_distribution, recommendation_summary,
    time_slot_utilization, CapacityDistribution, CourseCount, InsightsSummary,
    RecommendationSummary, TimeSlotUtilization,
};
