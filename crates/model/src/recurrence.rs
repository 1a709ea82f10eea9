use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::ids::DayId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RepeatKind {
    Daily,
    Weekly,
    Monthly,
}

/// How a template repeats after its start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceRule {
    pub kind: RepeatKind,
    /// Last day an occurrence may fall on.
    pub repeat_end_date: Option<DayId>,
    pub excluded_dates: BTreeSet<DayId>,
}

impl RecurrenceRule {
    pub fn new(kind: RepeatKind) -> Self {
        RecurrenceRule {
            kind,
            repeat_end_date: None,
            excluded_dates: BTreeSet::new(),
        }
    }

    pub fn until(mut self, end: DayId) -> Self {
        self.repeat_end_date = Some(end);
        self
    }

    pub fn excluding(mut self, dates: impl IntoIterator<Item = DayId>) -> Self {
        self.excluded_dates.extend(dates);
        self
    }

    pub fn has_ended(&self, day: DayId) -> bool {
        self.repeat_end_date.map(|end| day > end).unwrap_or(false)
    }

    pub fn is_excluded(&self, day: DayId) -> bool {
        self.excluded_dates.contains(&day)
    }

    /// Whether `day` lines up with the rule's cadence relative to `anchor`.
    /// Months without the anchor's day of month have no occurrence.
    pub fn is_on_cadence(&self, anchor: DayId, day: DayId) -> bool {
        match self.kind {
            RepeatKind::Daily => true,
            RepeatKind::Weekly => day.week_day() == anchor.week_day(),
            RepeatKind::Monthly => day.day_of_month() == anchor.day_of_month(),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    fn day(value: &str) -> DayId {
        DayId::parse(value).unwrap()
    }

    #[test]
    fn test_repeat_kind_names() {
        let names = RepeatKind::iter().map(|k| k.to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["daily", "weekly", "monthly"]);
        assert_eq!("weekly".parse::<RepeatKind>().unwrap(), RepeatKind::Weekly);
        assert!("yearly".parse::<RepeatKind>().is_err());
    }

    #[test]
    fn test_end_and_exclusions() {
        let rule = RecurrenceRule::new(RepeatKind::Daily)
            .until(day("2024-03-10"))
            .excluding([day("2024-03-05")]);
        assert!(!rule.has_ended(day("2024-03-10")));
        assert!(rule.has_ended(day("2024-03-11")));
        assert!(rule.is_excluded(day("2024-03-05")));
        assert!(!rule.is_excluded(day("2024-03-06")));
    }

    #[test]
    fn test_monthly_cadence_does_not_clamp() {
        let rule = RecurrenceRule::new(RepeatKind::Monthly);
        let anchor = day("2024-01-31");
        assert!(rule.is_on_cadence(anchor, day("2024-03-31")));
        assert!(!rule.is_on_cadence(anchor, day("2024-04-30")));
        assert!(!rule.is_on_cadence(anchor, day("2024-02-29")));
    }
}
