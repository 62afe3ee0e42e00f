//! One recommendation request: metrics, classification, meal selection.

use crate::classifier::{DietClassifier, ForestClassifier};
use crate::error::{RequestError, StartupError};
use crate::meal_plan::{MacroTarget, MealTable};
use crate::metrics::{self, BmiCategory};
use crate::profile::UserProfile;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Where the reference data comes from. `None` means the embedded copy.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSources {
    pub model: Option<PathBuf>,
    pub meals: Option<PathBuf>,
    pub default_label: String,
}

/// Output bundle for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Label predicted by the classifier.
    pub diet_label: String,
    /// Meal table entry actually used.
    pub plan_label: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snacks: String,
    pub macros: MacroTarget,
    pub estimated_calories: i64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub advisory_message: Option<String>,
}

/// Immutable after construction; reference data is loaded once and shared by
/// every request.
pub struct RecommendationEngine {
    classifier: Box<dyn DietClassifier>,
    meals: MealTable,
}

impl RecommendationEngine {
    pub fn new(classifier: Box<dyn DietClassifier>, meals: MealTable) -> Self {
        Self { classifier, meals }
    }

    /// Loads the model bundle and meal table, failing on the first problem.
    pub fn from_sources(sources: &ReferenceSources) -> Result<Self, StartupError> {
        let classifier = match &sources.model {
            Some(path) => ForestClassifier::load(path)?,
            None => ForestClassifier::embedded()?,
        };
        let meals = match &sources.meals {
            Some(path) => MealTable::load(path, &sources.default_label)?,
            None => MealTable::embedded(&sources.default_label)?,
        };
        Ok(Self::new(Box::new(classifier), meals))
    }

    pub fn meal_table(&self) -> &MealTable {
        &self.meals
    }

    pub fn model_fingerprint(&self) -> Option<&str> {
        self.classifier.fingerprint()
    }

    /// # Errors
    ///
    /// [`RequestError::InvalidInput`] for non-positive height or weight,
    /// [`RequestError::Classify`] if the model cannot label the profile.
    /// Nothing is returned for a failed request.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        profile: &UserProfile,
        rng: &mut R,
    ) -> Result<Recommendation, RequestError> {
        let health = metrics::compute(
            profile.weight_kg,
            profile.height_cm,
            profile.age,
            profile.activity_level,
        )?;
        let diet_label = self.classifier.classify(profile)?;
        debug!(
            bmi = health.bmi,
            calories = health.estimated_calories,
            diet_label = %diet_label,
            "profile evaluated"
        );

        let plan = self.meals.select(&diet_label, health.estimated_calories, rng);
        let bmi_category = BmiCategory::from_bmi(health.bmi);

        Ok(Recommendation {
            diet_label,
            plan_label: plan.plan_label,
            breakfast: plan.breakfast,
            lunch: plan.lunch,
            dinner: plan.dinner,
            snacks: plan.snacks,
            macros: plan.macros,
            estimated_calories: health.estimated_calories,
            bmi: health.bmi,
            bmi_category,
            advisory_message: bmi_category.advisory().map(str::to_string),
        })
    }
}
