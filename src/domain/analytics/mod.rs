//! Analytics - aggregation of submitted answers into summaries.
//!
//! - `aggregator` - per-question choice, scale and text summaries
//! - `dashboard` - totals across a teacher's surveys, sections and days
//! - `participation` - response counts against section rosters
//! - `word_frequency` - word table for free-text answers

mod aggregator;
mod dashboard;
mod participation;
mod summary;
mod word_frequency;

pub use aggregator::AnalyticsAggregator;
pub use dashboard::{
    DailyResponseCount, DashboardAnalytics, DashboardPanels, DateWindow, SectionResponseCount,
    SubmissionRecord, SurveyResponseRate, DEFAULT_DASHBOARD_DAYS, MAX_DASHBOARD_DAYS,
};
pub use participation::{SectionParticipation, SurveyParticipation};
pub use summary::{
    ChoiceBucket, ChoiceSummary, QuestionSummary, ScaleBucket, ScaleSummary, Summary,
    SurveyAnalytics, TextSummary, WordWeight,
};
pub use word_frequency::{word_frequency, MAX_WORDS, MIN_WORD_LENGTH};

/// `part / total * 100`, rounded to one decimal. Zero when `total` is zero.
pub(crate) fn round_percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(part) / f64::from(total) * 1000.0).round() / 10.0
}
