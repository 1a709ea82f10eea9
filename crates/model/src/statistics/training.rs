use serde::Serialize;

/// Average attendance of one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekTrend {
    pub year: i32,
    pub week: u32,
    pub avg_count: u32,
}

impl WeekTrend {
    pub fn label(&self) -> String {
        format!("W {}", self.week)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrainingAnalysis {
    /// Rounded mean headcount of the last 7 days.
    pub avg_week: u32,
    /// Rounded mean headcount of the last 30 days.
    pub avg_month: u32,
    pub total_trainings: u32,
    /// At most the last 12 weeks, oldest first.
    pub weekly_trend: Vec<WeekTrend>,
}
