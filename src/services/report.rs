use chrono::NaiveDate;

use crate::models::activity::RepositoryActivityLog;

/// Render the log as plain text, repositories in lexicographic order.
/// An empty log renders as an empty string.
pub fn format_report(activities: &RepositoryActivityLog, date: NaiveDate) -> String {
    if activities.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!("GitHub Activity ({})", date.format("%Y-%m-%d")), String::new()];

    for (repository, items) in activities.iter() {
        lines.push(format!("[{}]", repository));
        lines.extend(items.iter().cloned());
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Activity volume bands, each shown as a fixed calendar color
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorTier {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ColorTier {
    pub fn classify(activity_count: usize) -> Self {
        match activity_count {
            0 => ColorTier::None,
            1..=3 => ColorTier::Low,
            4..=10 => ColorTier::Medium,
            11..=20 => ColorTier::High,
            _ => ColorTier::VeryHigh,
        }
    }

    /// Google Calendar event `colorId`
    pub fn color_id(&self) -> &'static str {
        match self {
            ColorTier::None => "8", // Graphite
            ColorTier::Low => "2", // Sage
            ColorTier::Medium => "10", // Basil
            ColorTier::High => "5", // Banana
            ColorTier::VeryHigh => "11", // Tomato
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorTier::None => "none",
            ColorTier::Low => "low",
            ColorTier::Medium => "medium",
            ColorTier::High => "high",
            ColorTier::VeryHigh => "very high",
        }
    }
}
