#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use defect_tracker::model::{DEFAULT_ENVIRONMENT, Defect, DefectFields, Severity, Status};

/// Fixed base time so records built here compare deterministically.
pub fn base_time() -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0).unwrap() // 2025-01-01 00:00:00 UTC
}

/// A stored-form record with only the required fields set.
pub fn defect(title: &str) -> Defect {
    DefectBuilder::new(title).build()
}

/// Fields for `DefectStore::create` with the given title.
pub fn fields(title: &str) -> DefectFields {
    DefectFields::new(
        title,
        format!("{title} description"),
        Severity::Minor,
        Status::Open,
    )
}

/// Builder for stored-form records.
pub struct DefectBuilder {
    defect: Defect,
}

impl DefectBuilder {
    pub fn new(title: &str) -> Self {
        let base = base_time();
        Self {
            defect: Defect {
                id: format!("DEF-{}-{}", base.timestamp_millis(), slug(title)),
                title: title.to_string(),
                severity: Severity::Minor,
                status: Status::Open,
                assignee: None,
                environment: DEFAULT_ENVIRONMENT.to_string(),
                description: format!("{title} description"),
                steps: None,
                url: None,
                created_at: base,
                updated_at: base,
            },
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.defect.id = id.to_string();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.defect.severity = severity;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.defect.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: &str) -> Self {
        self.defect.assignee = Some(assignee.to_string());
        self
    }

    pub fn with_environment(mut self, environment: &str) -> Self {
        self.defect.environment = environment.to_string();
        self
    }

    pub fn with_steps(mut self, steps: &str) -> Self {
        self.defect.steps = Some(steps.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.defect.url = Some(url.to_string());
        self
    }

    pub fn edited_after(mut self, seconds: i64) -> Self {
        self.defect.updated_at = self.defect.created_at + Duration::seconds(seconds);
        self
    }

    pub fn build(self) -> Defect {
        self.defect
    }
}

/// Lowercase base36-ish suffix derived from the title, nine characters.
fn slug(title: &str) -> String {
    let mut out: String = title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(9)
        .collect();
    while out.len() < 9 {
        out.push('0');
    }
    out
}
