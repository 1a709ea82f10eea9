use std::{cmp::Ordering, collections::BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::{ClubId, CoachId, MemberId, SubgroupId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub subgroup_ids: BTreeSet<SubgroupId>,
}

impl Member {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn in_subgroup(&self, subgroup: &SubgroupId) -> bool {
        self.subgroup_ids.contains(subgroup)
    }

    pub fn in_any<'a>(&self, subgroups: impl IntoIterator<Item = &'a SubgroupId>) -> bool {
        subgroups.into_iter().any(|id| self.subgroup_ids.contains(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    pub id: CoachId,
    pub first_name: String,
    pub last_name: String,
}

impl Coach {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgroup {
    pub id: SubgroupId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
}

fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last).trim().to_owned()
}

/// Roster ordering: last name, then first name.
pub fn by_name(a: (&str, &str), b: (&str, &str)) -> Ordering {
    a.1.cmp(b.1).then_with(|| a.0.cmp(b.0))
}

pub fn sort_members(members: &mut [Member]) {
    members.sort_by(|a, b| {
        by_name(
            (&a.first_name, &a.last_name),
            (&b.first_name, &b.last_name),
        )
    });
}

pub fn sort_coaches(coaches: &mut [Coach]) {
    coaches.sort_by(|a, b| {
        by_name(
            (&a.first_name, &a.last_name),
            (&b.first_name, &b.last_name),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, first: &str, last: &str) -> Member {
        Member {
            id: MemberId::from(id),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            subgroup_ids: BTreeSet::new(),
        }
    }

    #[test]
    fn test_sort_by_last_then_first_name() {
        let mut members = vec![
            member("1", "Zoe", "Adams"),
            member("2", "Anna", "Brown"),
            member("3", "Adam", "Adams"),
        ];
        sort_members(&mut members);
        let ids = members.iter().map(|m| m.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        assert_eq!(member("1", "", "Adams").full_name(), "Adams");
        assert_eq!(member("1", "Zoe", "Adams").full_name(), "Zoe Adams");
    }
}
