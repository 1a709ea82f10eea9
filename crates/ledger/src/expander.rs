use model::{
    event::{EventTemplate, Occurrence},
    ids::DayId,
    window::{DateWindow, Days},
};

/// Occurrences of one template inside a window, earliest first.
///
/// The window bounds the iteration, so the sequence is always finite. Cloning
/// restarts it from the current position.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    template: &'a EventTemplate,
    template_index: usize,
    pending: Pending,
}

#[derive(Debug, Clone)]
enum Pending {
    Empty,
    Single(Option<DayId>),
    Days(Days),
}

impl<'a> Occurrences<'a> {
    fn new(template: &'a EventTemplate, template_index: usize, window: &DateWindow) -> Self {
        let pending = if template.is_cancelled {
            Pending::Empty
        } else if template.rule.is_none() {
            let start = template.start_date;
            Pending::Single(window.contains(start).then_some(start))
        } else {
            match window.starting_from(template.start_date) {
                Some(window) => Pending::Days(window.days()),
                None => Pending::Empty,
            }
        };
        Occurrences {
            template,
            template_index,
            pending,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Self::Item> {
        let day = match &mut self.pending {
            Pending::Empty => None,
            Pending::Single(day) => day.take(),
            Pending::Days(days) => {
                let rule = self.template.rule.as_ref()?;
                let anchor = self.template.start_date;
                let day = days.find(|day| {
                    !rule.has_ended(*day)
                        && !rule.is_excluded(*day)
                        && *day >= anchor
                        && rule.is_on_cadence(anchor, *day)
                });
                if day.is_none() {
                    self.pending = Pending::Empty;
                }
                day
            }
        }?;
        Some(self.template.occurrence(day, self.template_index))
    }
}

/// Expands a single template.
pub fn expand<'a>(template: &'a EventTemplate, window: &DateWindow) -> Occurrences<'a> {
    Occurrences::new(template, 0, window)
}

/// Expands every template and merges the results by date. Occurrences on the same
/// day keep the order of their templates in `templates`.
pub fn expand_all(templates: &[EventTemplate], window: &DateWindow) -> Vec<Occurrence> {
    let mut occurrences = templates
        .iter()
        .enumerate()
        .flat_map(|(index, template)| Occurrences::new(template, index, window))
        .collect::<Vec<_>>();
    occurrences.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.template_index.cmp(&b.template_index))
    });
    occurrences
}

#[cfg(test)]
mod tests {
    use model::{
        event::OccurrenceKind,
        ids::{EventId, SubgroupId},
        recurrence::{RecurrenceRule, RepeatKind},
    };

    use super::*;

    fn day(value: &str) -> DayId {
        DayId::parse(value).unwrap()
    }

    fn window(start: &str, end: &str) -> DateWindow {
        DateWindow::new(day(start), day(end)).unwrap()
    }

    fn template(id: &str, start: &str, rule: Option<RecurrenceRule>) -> EventTemplate {
        EventTemplate {
            id: EventId::from(id),
            title: id.to_owned(),
            kind: OccurrenceKind::Event,
            start_date: day(start),
            start_time: "18:00".to_owned(),
            end_time: "20:00".to_owned(),
            subgroup_ids: vec![SubgroupId::from("g1")],
            is_cancelled: false,
            rule,
        }
    }

    fn dates(occurrences: impl IntoIterator<Item = Occurrence>) -> Vec<String> {
        occurrences
            .into_iter()
            .map(|occ| occ.date.to_string())
            .collect()
    }

    #[test]
    fn test_daily_expansion() {
        let daily = template("e1", "2024-03-01", Some(RecurrenceRule::new(RepeatKind::Daily)));
        let result = dates(expand(&daily, &window("2024-03-01", "2024-03-05")));
        assert_eq!(
            result,
            vec![
                "2024-03-01",
                "2024-03-02",
                "2024-03-03",
                "2024-03-04",
                "2024-03-05"
            ]
        );
    }

    #[test]
    fn test_weekly_with_exclusion() {
        let rule = RecurrenceRule::new(RepeatKind::Weekly).excluding([day("2024-03-11")]);
        let weekly = template("e1", "2024-03-04", Some(rule));
        let result = dates(expand(&weekly, &window("2024-03-01", "2024-03-31")));
        assert_eq!(result, vec!["2024-03-04", "2024-03-18", "2024-03-25"]);
    }

    #[test]
    fn test_monthly_on_31st_skips_short_months() {
        let monthly = template(
            "e1",
            "2024-01-31",
            Some(RecurrenceRule::new(RepeatKind::Monthly)),
        );
        assert_eq!(
            expand(&monthly, &window("2024-04-01", "2024-04-30")).count(),
            0
        );
        assert_eq!(
            dates(expand(&monthly, &window("2024-01-01", "2024-05-31"))),
            vec!["2024-01-31", "2024-03-31", "2024-05-31"]
        );
    }

    #[test]
    fn test_repeat_end_date_is_inclusive() {
        let rule = RecurrenceRule::new(RepeatKind::Daily).until(day("2024-03-03"));
        let daily = template("e1", "2024-03-01", Some(rule));
        let result = dates(expand(&daily, &window("2024-03-01", "2024-03-31")));
        assert_eq!(result, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
    }

    #[test]
    fn test_single_event() {
        let single = template("e1", "2024-03-10", None);
        assert_eq!(
            dates(expand(&single, &window("2024-03-01", "2024-03-31"))),
            vec!["2024-03-10"]
        );
        assert_eq!(expand(&single, &window("2024-04-01", "2024-04-30")).count(), 0);
        let occ = expand(&single, &window("2024-03-10", "2024-03-10"))
            .next()
            .unwrap();
        assert!(!occ.is_recurring);
        assert_eq!(occ.event_id, EventId::from("e1"));
    }

    #[test]
    fn test_cancelled_templates_yield_nothing() {
        let mut daily = template("e1", "2024-03-01", Some(RecurrenceRule::new(RepeatKind::Daily)));
        daily.is_cancelled = true;
        assert_eq!(expand(&daily, &window("2024-03-01", "2024-03-31")).count(), 0);

        let mut single = template("e2", "2024-03-01", None);
        single.is_cancelled = true;
        assert_eq!(expand(&single, &window("2024-03-01", "2024-03-31")).count(), 0);
    }

    #[test]
    fn test_window_before_start_is_empty() {
        let weekly = template("e1", "2024-05-06", Some(RecurrenceRule::new(RepeatKind::Weekly)));
        assert_eq!(expand(&weekly, &window("2024-03-01", "2024-03-31")).count(), 0);
    }

    fn grid() -> Vec<EventTemplate> {
        let excluded = [day("2024-02-12"), day("2024-03-01"), day("2024-03-15")];
        let mut templates = Vec::new();
        for (i, start) in ["2024-01-31", "2024-02-12", "2024-02-29", "2024-03-15"]
            .iter()
            .enumerate()
        {
            for kind in [RepeatKind::Daily, RepeatKind::Weekly, RepeatKind::Monthly] {
                let mut rule = RecurrenceRule::new(kind).excluding(excluded);
                if i % 2 == 0 {
                    rule = rule.until(day("2024-03-20"));
                }
                templates.push(template(&format!("r{i}-{kind}"), start, Some(rule)));
            }
            templates.push(template(&format!("s{i}"), start, None));
        }
        templates
    }

    fn windows() -> Vec<DateWindow> {
        vec![
            window("2024-01-01", "2024-01-31"),
            window("2024-02-01", "2024-02-29"),
            window("2024-02-20", "2024-04-10"),
            window("2024-03-15", "2024-03-15"),
            window("2024-04-01", "2024-04-30"),
        ]
    }

    #[test]
    fn test_occurrences_stay_inside_window() {
        for window in windows() {
            for template in grid() {
                for occ in expand(&template, &window) {
                    assert!(window.contains(occ.date), "{} in {}", occ.date, window);
                    assert!(occ.date >= template.start_date);
                }
            }
        }
    }

    #[test]
    fn test_exclusions_and_end_dates_hold() {
        for window in windows() {
            for template in grid() {
                let Some(rule) = template.rule.clone() else {
                    continue;
                };
                for occ in expand(&template, &window) {
                    assert!(!rule.is_excluded(occ.date), "{} excluded", occ.date);
                    if let Some(end) = rule.repeat_end_date {
                        assert!(occ.date <= end);
                    }
                }
            }
        }
    }

    #[test]
    fn test_expansion_is_repeatable() {
        let templates = grid();
        for window in windows() {
            assert_eq!(expand_all(&templates, &window), expand_all(&templates, &window));
            for template in &templates {
                let first = expand(template, &window);
                let restarted = first.clone();
                assert_eq!(first.collect::<Vec<_>>(), restarted.collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_expand_all_orders_by_date_then_template() {
        let templates = vec![
            template("late", "2024-03-05", None),
            template("weekly", "2024-03-04", Some(RecurrenceRule::new(RepeatKind::Weekly))),
            template("early", "2024-03-04", None),
        ];
        let occurrences = expand_all(&templates, &window("2024-03-01", "2024-03-11"));
        let order = occurrences
            .iter()
            .map(|occ| format!("{}:{}", occ.date, occ.event_id))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                "2024-03-04:weekly",
                "2024-03-04:early",
                "2024-03-05:late",
                "2024-03-11:weekly"
            ]
        );
        assert_eq!(occurrences[0].template_index, 1);
        assert!(occurrences[0].is_recurring);
    }
}
