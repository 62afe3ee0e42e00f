//! Append-only record of submitted profiles.
//!
//! One JSON object per line. Writing is best effort: callers go through
//! [`AuditLog::record`], which downgrades failures to a warning.

use crate::engine::Recommendation;
use crate::error::AuditWriteError;
use crate::profile::{ActivityLevel, DietaryRestriction, Region, UserProfile};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: String,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub region: Region,
    pub dietary_restriction: DietaryRestriction,
    pub diet_label: String,
    pub estimated_calories: i64,
    pub model_fingerprint: Option<String>,
}

impl AuditRecord {
    pub fn new(profile: &UserProfile, recommendation: &Recommendation, model_fingerprint: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            age: profile.age,
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            activity_level: profile.activity_level,
            region: profile.region,
            dietary_restriction: profile.dietary_restriction,
            diet_label: recommendation.diet_label.clone(),
            estimated_calories: recommendation.estimated_calories,
            model_fingerprint: model_fingerprint.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line, creating the file and its directory if needed.
    pub fn append(&self, record: &AuditRecord) -> Result<(), AuditWriteError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(&line)?;
        Ok(())
    }

    /// Fire-and-forget variant of [`append`](Self::append).
    pub fn record(&self, record: &AuditRecord) {
        match self.append(record) {
            Ok(()) => debug!(path = %self.path.display(), "audit record appended"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "could not write audit record"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal_plan::MacroTarget;
    use crate::metrics::BmiCategory;

    fn profile() -> UserProfile {
        UserProfile {
            age: 30,
            height_cm: 160.0,
            weight_kg: 60.0,
            activity_level: ActivityLevel::Medium,
            region: Region::South,
            dietary_restriction: DietaryRestriction::Vegetarian,
        }
    }

    fn recommendation() -> Recommendation {
        Recommendation {
            diet_label: "Low Carb".to_string(),
            plan_label: "Low Carb".to_string(),
            breakfast: "Greek yogurt with berries".to_string(),
            lunch: "Tuna lettuce wraps".to_string(),
            dinner: "Baked salmon with asparagus".to_string(),
            snacks: "Hard-boiled eggs".to_string(),
            macros: MacroTarget {
                calories: 2040,
                protein_g: 136,
                carbs_g: 113,
                fats_g: 90,
            },
            estimated_calories: 2040,
            bmi: 23.4,
            bmi_category: BmiCategory::NormalWeight,
            advisory_message: None,
        }
    }

    #[test]
    fn appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("logs/user_inputs.jsonl"));
        let record = AuditRecord::new(&profile(), &recommendation(), Some("abc123"));

        log.append(&record).unwrap();
        log.append(&record).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: AuditRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.region, Region::South);
        assert_eq!(parsed.model_fingerprint.as_deref(), Some("abc123"));
    }

    #[test]
    fn unwritable_path_is_an_error_but_record_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // The log path is an existing directory, so opening it for append fails.
        let log = AuditLog::new(dir.path());
        let record = AuditRecord::new(&profile(), &recommendation(), None);

        assert!(matches!(log.append(&record), Err(AuditWriteError::Io(_))));
        log.record(&record);
    }
}
