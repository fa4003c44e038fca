//! Capacity classification and scheduling recommendations.

use crate::config::ClassificationPolicy;
use crate::core::domain::CapacityLabel;

pub const RECOMMEND_ADD_CLASSES: &str = "Schedule additional classes in available slots.";
pub const RECOMMEND_REDISTRIBUTE: &str = "Redistribute classes to underutilized rooms.";
pub const RECOMMEND_MAINTAIN: &str = "Maintain current schedule.";

/// Classify a utilization rate.
///
/// Both thresholds belong to the optimal band:
/// `rate < underutilized_below` → Underutilized,
/// `rate > overutilized_above` → Overutilized, anything else → Optimal.
///
/// # Examples
///
/// ```
/// use classroom_analytics::algorithms::classification::classify;
/// use classroom_analytics::config::ClassificationPolicy;
/// use classroom_analytics::core::domain::CapacityLabel;
///
/// let policy = ClassificationPolicy::default();
/// assert_eq!(classify(0.3, &policy), CapacityLabel::Optimal);
/// assert_eq!(classify(0.70001, &policy), CapacityLabel::Overutilized);
/// ```
pub fn classify(rate: f64, policy: &ClassificationPolicy) -> CapacityLabel {
    if rate < policy.underutilized_below {
        CapacityLabel::Underutilized
    } else if rate > policy.overutilized_above {
        CapacityLabel::Overutilized
    } else {
        CapacityLabel::Optimal
    }
}

/// Fixed action for each capacity label.
pub fn recommend(label: CapacityLabel) -> &'static str {
    match label {
        CapacityLabel::Underutilized => RECOMMEND_ADD_CLASSES,
        CapacityLabel::Optimal => RECOMMEND_MAINTAIN,
        CapacityLabel::Overutilized => RECOMMEND_REDISTRIBUTE,
    }
}
