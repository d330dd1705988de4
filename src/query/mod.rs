//! Filtering and free-text search over a defect collection.
//!
//! [`filter`] is pure: it never reorders, copies or mutates records, it
//! only selects the ones matching every criterion.

use crate::error::DefectError;
use crate::model::{Defect, Severity, Status};
use std::fmt;
use std::str::FromStr;

/// Either every value of a dimension, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selector<T> {
    /// True if `value` passes this selector.
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selector<T>
where
    T: FromStr<Err = DefectError>,
{
    type Err = DefectError;

    /// `"all"` (any case) or a value `T` parses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            trimmed.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => write!(f, "{value}"),
        }
    }
}

/// Filter criteria, as set by the status and severity pickers and the
/// search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub status: Selector<Status>,
    pub severity: Selector<Severity>,
    /// Raw search text; trimmed and lowercased when matching.
    pub search_text: String,
}

impl Criteria {
    /// Criteria that match every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Selector::Only(status);
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Selector::Only(severity);
        self
    }

    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// True if no criterion narrows the collection.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.status == Selector::All
            && self.severity == Selector::All
            && self.search_text.trim().is_empty()
    }

    /// Does `defect` pass all three criteria?
    #[must_use]
    pub fn matches(&self, defect: &Defect) -> bool {
        self.status.accepts(&defect.status)
            && self.severity.accepts(&defect.severity)
            && matches_search(defect, &normalize_search(&self.search_text))
    }
}

fn normalize_search(text: &str) -> String {
    text.trim().to_lowercase()
}

/// `needle` must already be normalized. Empty matches everything.
fn matches_search(defect: &Defect, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(defect.title.as_str())
        || contains(defect.description.as_str())
        || defect.assignee.as_deref().is_some_and(contains)
        || defect.url.as_deref().is_some_and(contains)
}

/// Records matching `criteria`, in their original order.
#[must_use]
pub fn filter<'a>(records: &'a [Defect], criteria: &Criteria) -> Vec<&'a Defect> {
    let needle = normalize_search(&criteria.search_text);
    records
        .iter()
        .filter(|d| {
            criteria.status.accepts(&d.status)
                && criteria.severity.accepts(&d.severity)
                && matches_search(d, &needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tracing::info;

    fn init_logging() {
        crate::logging::init_test_logging();
    }

    fn defect(id: &str, title: &str, severity: Severity, status: Status) -> Defect {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Defect {
            id: id.to_string(),
            title: title.to_string(),
            severity,
            status,
            assignee: None,
            environment: "production".to_string(),
            description: "something broke".to_string(),
            steps: None,
            url: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn sample() -> Vec<Defect> {
        let mut login = defect("DEF-1-a", "Login fails", Severity::Critical, Status::Open);
        login.assignee = Some("Alice".to_string());
        let mut typo = defect("DEF-2-b", "Typo", Severity::Trivial, Status::Closed);
        typo.url = Some("https://example.com/LOGIN".to_string());
        let crash = defect("DEF-3-c", "Crash on save", Severity::Major, Status::InProgress);
        vec![login, typo, crash]
    }

    fn ids(found: &[&Defect]) -> Vec<String> {
        found.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_all_criteria_returns_everything_in_order() {
        init_logging();
        info!("test_all_criteria_returns_everything_in_order: starting");
        let records = sample();
        let found = filter(&records, &Criteria::all());
        assert_eq!(ids(&found), vec!["DEF-1-a", "DEF-2-b", "DEF-3-c"]);
        info!("test_all_criteria_returns_everything_in_order: assertions passed");
    }

    #[test]
    fn test_search_is_trimmed_and_case_insensitive() {
        init_logging();
        info!("test_search_is_trimmed_and_case_insensitive: starting");
        let records = sample();
        let found = filter(&records, &Criteria::all().with_search("  login "));
        // Title of the first, url of the second.
        assert_eq!(ids(&found), vec!["DEF-1-a", "DEF-2-b"]);

        let found = filter(&records, &Criteria::all().with_search("ALICE"));
        assert_eq!(ids(&found), vec!["DEF-1-a"]);
        info!("test_search_is_trimmed_and_case_insensitive: assertions passed");
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        init_logging();
        info!("test_criteria_are_conjunctive: starting");
        let records = sample();
        let criteria = Criteria::all()
            .with_status(Status::Open)
            .with_search("login");
        assert_eq!(ids(&filter(&records, &criteria)), vec!["DEF-1-a"]);

        let criteria = Criteria::all()
            .with_severity(Severity::Critical)
            .with_status(Status::Closed);
        assert!(filter(&records, &criteria).is_empty());
        info!("test_criteria_are_conjunctive: assertions passed");
    }

    #[test]
    fn test_absent_optionals_never_match_text() {
        init_logging();
        let records = vec![defect("DEF-9-z", "Plain", Severity::Minor, Status::Open)];
        assert!(filter(&records, &Criteria::all().with_search("none")).is_empty());
        assert_eq!(filter(&records, &Criteria::all().with_search("   ")).len(), 1);
    }

    #[test]
    fn test_matches_agrees_with_filter() {
        let records = sample();
        let criteria = Criteria::all().with_severity(Severity::Major);
        let via_matches: Vec<&Defect> = records.iter().filter(|d| criteria.matches(d)).collect();
        assert_eq!(via_matches, filter(&records, &criteria));
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("all".parse::<Selector<Status>>().unwrap(), Selector::All);
        assert_eq!("ALL".parse::<Selector<Severity>>().unwrap(), Selector::All);
        assert_eq!(
            "in-progress".parse::<Selector<Status>>().unwrap(),
            Selector::Only(Status::InProgress)
        );
        assert!("urgent".parse::<Selector<Severity>>().is_err());
        assert_eq!(Selector::Only(Severity::Major).to_string(), "major");
        assert!(Criteria::all().is_unfiltered());
        assert!(!Criteria::all().with_search("x").is_unfiltered());
    }
}
