use model::{
    attendance::EventAttendance,
    ids::DayId,
    roster::Member,
    statistics::activity::{ActivityReport, InactiveMember, LastSeen, Streak},
    window::DateWindow,
};

use super::dated_newest_first;

/// Number of latest records the monitor looks at.
pub const RECENT_RECORDS: usize = 50;
const TOP_STREAKS: usize = 3;
const INACTIVE_AFTER_DAYS: u32 = 14;
const MAX_INACTIVE: usize = 5;

/// Streaks and inactive members over the most recent records. `members` order
/// breaks ties.
pub fn activity_report(
    members: &[Member],
    records: &[EventAttendance],
    today: DayId,
) -> ActivityReport {
    let mut recent = dated_newest_first(records);
    recent.truncate(RECENT_RECORDS);

    let mut top_streaks = members
        .iter()
        .map(|member| Streak {
            member_id: member.id.clone(),
            name: member.full_name(),
            streak: recent
                .iter()
                .take_while(|(_, record)| record.present.contains(&member.id))
                .count() as u32,
        })
        .collect::<Vec<_>>();
    top_streaks.sort_by(|a, b| b.streak.cmp(&a.streak));
    top_streaks.truncate(TOP_STREAKS);

    // Older than this counts as inactive.
    let active_since = DateWindow::ending_at(today, INACTIVE_AFTER_DAYS + 1).start();
    let inactive = members
        .iter()
        .filter_map(|member| {
            let last = recent
                .iter()
                .find(|(_, record)| record.present.contains(&member.id))
                .map(|(day, _)| *day);
            let last_seen = match last {
                Some(day) if day >= active_since => return None,
                Some(day) => LastSeen::DaysAgo(day.days_until(today)),
                None => LastSeen::Never,
            };
            Some(InactiveMember {
                member_id: member.id.clone(),
                name: member.full_name(),
                last_seen,
            })
        })
        .take(MAX_INACTIVE)
        .collect();

    ActivityReport {
        top_streaks,
        inactive,
    }
}
