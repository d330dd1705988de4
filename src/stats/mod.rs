//! Aggregate counts over a defect collection.

use crate::model::{Defect, Severity, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label for the no-assignee bucket.
pub const UNASSIGNED: &str = "(unassigned)";

/// Headline counts shown above the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub open: usize,
    /// Resolved or closed.
    pub resolved: usize,
}

/// Counts for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub dimension: String,
    pub counts: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    /// `None` is the no-assignee bucket (serialized as `null`).
    pub key: Option<String>,
    pub count: usize,
}

impl BreakdownEntry {
    fn named(key: &str, count: usize) -> Self {
        Self {
            key: Some(key.to_string()),
            count,
        }
    }

    /// Display label, [`UNASSIGNED`] for the `None` bucket.
    #[must_use]
    pub fn label(&self) -> &str {
        self.key.as_deref().unwrap_or(UNASSIGNED)
    }
}

impl Breakdown {
    /// Count for `key`, zero if absent.
    #[must_use]
    pub fn count_of(&self, key: &str) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.key.as_deref() == Some(key))
            .map_or(0, |entry| entry.count)
    }

    /// Count of the no-assignee bucket, zero if absent.
    #[must_use]
    pub fn unassigned_count(&self) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.key.is_none())
            .map_or(0, |entry| entry.count)
    }
}

/// Compute the headline counts in one pass.
#[must_use]
pub fn summarize(records: &[Defect]) -> Summary {
    let mut summary = Summary {
        total: records.len(),
        ..Summary::default()
    };
    for defect in records {
        if defect.severity == Severity::Critical {
            summary.critical += 1;
        }
        if defect.status == Status::Open {
            summary.open += 1;
        }
        if defect.status.is_resolved() {
            summary.resolved += 1;
        }
    }
    summary
}

/// Count per severity, every severity listed (most severe first).
#[must_use]
pub fn breakdown_by_severity(records: &[Defect]) -> Breakdown {
    Breakdown {
        dimension: "severity".to_string(),
        counts: Severity::ALL
            .iter()
            .map(|severity| {
                let count = records.iter().filter(|d| d.severity == *severity).count();
                BreakdownEntry::named(severity.as_str(), count)
            })
            .collect(),
    }
}

/// Count per status, every status listed in workflow order.
#[must_use]
pub fn breakdown_by_status(records: &[Defect]) -> Breakdown {
    Breakdown {
        dimension: "status".to_string(),
        counts: Status::ALL
            .iter()
            .map(|status| {
                let count = records.iter().filter(|d| d.status == *status).count();
                BreakdownEntry::named(status.as_str(), count)
            })
            .collect(),
    }
}

/// Count per assignee: the no-assignee bucket first, then names sorted.
#[must_use]
pub fn breakdown_by_assignee(records: &[Defect]) -> Breakdown {
    let mut counts: BTreeMap<Option<&str>, usize> = BTreeMap::new();

    for defect in records {
        *counts.entry(defect.assignee.as_deref()).or_insert(0) += 1;
    }

    Breakdown {
        dimension: "assignee".to_string(),
        counts: counts
            .into_iter()
            .map(|(key, count)| BreakdownEntry {
                key: key.map(str::to_string),
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn defect(n: u32, severity: Severity, status: Status, assignee: Option<&str>) -> Defect {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        Defect {
            id: format!("DEF-{n}-abc"),
            title: format!("defect {n}"),
            severity,
            status,
            assignee: assignee.map(str::to_string),
            environment: "staging".to_string(),
            description: "d".to_string(),
            steps: None,
            url: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn empty_collection_is_all_zero() {
        assert_eq!(summarize(&[]), Summary::default());
        assert!(breakdown_by_assignee(&[]).counts.is_empty());
        assert_eq!(breakdown_by_severity(&[]).counts.len(), 4);
    }

    #[test]
    fn summary_counts() {
        let records = vec![
            defect(1, Severity::Critical, Status::Open, None),
            defect(2, Severity::Minor, Status::Closed, None),
        ];
        assert_eq!(
            summarize(&records),
            Summary {
                total: 2,
                critical: 1,
                open: 1,
                resolved: 1,
            }
        );
    }

    #[test]
    fn resolved_and_closed_both_count_as_resolved() {
        let records = vec![
            defect(1, Severity::Major, Status::Resolved, None),
            defect(2, Severity::Major, Status::Closed, None),
            defect(3, Severity::Major, Status::InProgress, None),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.resolved, 2);
        assert_eq!(summary.open, 0);
        assert_eq!(summary.critical, 0);
    }

    #[test]
    fn breakdowns_cover_every_record() {
        let records = vec![
            defect(1, Severity::Critical, Status::Open, Some("ana")),
            defect(2, Severity::Critical, Status::InProgress, None),
            defect(3, Severity::Trivial, Status::Open, Some("ana")),
            defect(4, Severity::Major, Status::Closed, Some("bo")),
        ];

        let by_severity = breakdown_by_severity(&records);
        assert_eq!(by_severity.count_of("critical"), 2);
        assert_eq!(by_severity.count_of("minor"), 0);
        assert_eq!(by_severity.counts[0].key.as_deref(), Some("critical"));

        let by_status = breakdown_by_status(&records);
        assert_eq!(by_status.count_of("open"), 2);
        assert_eq!(by_status.count_of("in-progress"), 1);

        let by_assignee = breakdown_by_assignee(&records);
        let keys: Vec<&str> = by_assignee.counts.iter().map(BreakdownEntry::label).collect();
        assert_eq!(keys, vec![UNASSIGNED, "ana", "bo"]);
        assert_eq!(by_assignee.count_of("ana"), 2);
        assert_eq!(by_assignee.unassigned_count(), 1);

        for breakdown in [by_severity, by_status, by_assignee] {
            let sum: usize = breakdown.counts.iter().map(|e| e.count).sum();
            assert_eq!(sum, records.len(), "{}", breakdown.dimension);
        }
    }

    #[test]
    fn assignee_named_like_unassigned_label_is_kept_apart() {
        let records = vec![
            defect(1, Severity::Minor, Status::Open, Some(UNASSIGNED)),
            defect(2, Severity::Minor, Status::Open, None),
            defect(3, Severity::Minor, Status::Open, None),
        ];

        let by_assignee = breakdown_by_assignee(&records);
        assert_eq!(by_assignee.counts.len(), 2);
        assert_eq!(by_assignee.unassigned_count(), 2);
        assert_eq!(by_assignee.count_of(UNASSIGNED), 1);
    }
}
