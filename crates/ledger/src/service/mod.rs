pub mod cache;
pub mod clubs;
pub mod reports;
pub mod statistics;

use std::{convert::Infallible, fmt, str::FromStr};

use model::{ids::SubgroupId, roster::Member};
use storage::rows::EventRow;

/// Restricts a report to one subgroup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubgroupFilter {
    #[default]
    All,
    Only(SubgroupId),
}

impl SubgroupFilter {
    pub fn subgroup(&self) -> Option<&SubgroupId> {
        match self {
            SubgroupFilter::All => None,
            SubgroupFilter::Only(id) => Some(id),
        }
    }

    pub fn admits(&self, member: &Member) -> bool {
        match self {
            SubgroupFilter::All => true,
            SubgroupFilter::Only(id) => member.in_subgroup(id),
        }
    }

    /// Events targeted at the filtered subgroup. Without a filter every event passes.
    pub(crate) fn admits_event(&self, row: &EventRow) -> bool {
        match self {
            SubgroupFilter::All => true,
            SubgroupFilter::Only(id) => row
                .target_subgroup_ids
                .as_ref()
                .map(|targets| targets.iter().any(|target| target == id.as_str()))
                .unwrap_or(false),
        }
    }
}

impl FromStr for SubgroupFilter {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Ok(SubgroupFilter::All)
        } else {
            Ok(SubgroupFilter::Only(SubgroupId::from(value)))
        }
    }
}

impl fmt::Display for SubgroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubgroupFilter::All => write!(f, "all"),
            SubgroupFilter::Only(id) => write!(f, "{}", id),
        }
    }
}
