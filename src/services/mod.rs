pub mod activity_aggregation;
pub mod calendar;
pub mod collectors;
pub mod daily_sync;
pub mod git_platforms;
pub mod report;
