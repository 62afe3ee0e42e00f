//! Meal plan selection from the static reference table.

use crate::error::StartupError;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

const EMBEDDED_MEALS: &str = include_str!("../data/meal_recommendations.json");

pub const DEFAULT_DIET_LABEL: &str = "Balanced Diet";
pub const NO_MEAL_AVAILABLE: &str = "No meal available";

/// Calorie deviations up to this many kcal keep the baseline macros.
pub const RESCALE_THRESHOLD_KCAL: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTarget {
    pub calories: i64,
    #[serde(rename = "protein")]
    pub protein_g: i64,
    #[serde(rename = "carbs")]
    pub carbs_g: i64,
    #[serde(rename = "fats")]
    pub fats_g: i64,
}

impl MacroTarget {
    /// Rescales proportionally to `calories` when it differs from the baseline
    /// by more than [`RESCALE_THRESHOLD_KCAL`]; otherwise returns `self`.
    pub fn adjusted_to(self, calories: i64) -> Self {
        if (calories - self.calories).abs() <= RESCALE_THRESHOLD_KCAL || self.calories == 0 {
            return self;
        }

        let factor = calories as f64 / self.calories as f64;
        let scale = |grams: i64| (grams as f64 * factor).floor() as i64;
        Self {
            calories,
            protein_g: scale(self.protein_g),
            carbs_g: scale(self.carbs_g),
            fats_g: scale(self.fats_g),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    #[serde(default)]
    pub breakfast: Vec<String>,
    #[serde(default)]
    pub lunch: Vec<String>,
    #[serde(default)]
    pub dinner: Vec<String>,
    #[serde(default)]
    pub snacks: Vec<String>,
    pub macros: MacroTarget,
}

/// One meal per slot plus the calorie-adjusted macro target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    /// Table entry the meals came from; differs from the requested label on fallback.
    pub plan_label: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snacks: String,
    pub macros: MacroTarget,
}

fn pick<R: Rng + ?Sized>(options: &[String], rng: &mut R) -> String {
    options
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| NO_MEAL_AVAILABLE.to_string())
}

/// Diet label to plan mapping with a default entry that is guaranteed to exist.
#[derive(Debug, Clone)]
pub struct MealTable {
    plans: BTreeMap<String, DietPlan>,
    default_label: String,
    default_plan: DietPlan,
}

impl MealTable {
    /// # Errors
    ///
    /// Returns [`StartupError::MissingDefaultLabel`] if `default_label` has no entry.
    pub fn new(plans: BTreeMap<String, DietPlan>, default_label: impl Into<String>) -> Result<Self, StartupError> {
        let default_label = default_label.into();
        let Some(default_plan) = plans.get(&default_label).cloned() else {
            return Err(StartupError::MissingDefaultLabel(default_label));
        };
        Ok(Self {
            plans,
            default_label,
            default_plan,
        })
    }

    pub fn from_json(bytes: &[u8], origin: &Path, default_label: &str) -> Result<Self, StartupError> {
        let plans: BTreeMap<String, DietPlan> =
            serde_json::from_slice(bytes).map_err(|source| StartupError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        let table = Self::new(plans, default_label)?;

        info!(
            origin = %origin.display(),
            diets = table.plans.len(),
            default = %table.default_label,
            "meal table loaded"
        );
        Ok(table)
    }

    pub fn load(path: &Path, default_label: &str) -> Result<Self, StartupError> {
        let bytes = std::fs::read(path).map_err(|source| StartupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes, path, default_label)
    }

    /// The table compiled into the binary.
    pub fn embedded(default_label: &str) -> Result<Self, StartupError> {
        Self::from_json(EMBEDDED_MEALS.as_bytes(), Path::new("<embedded meal table>"), default_label)
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.plans.keys().map(String::as_str)
    }

    /// Entry for `label`, or the default entry if the table does not know it.
    pub fn plan_for(&self, label: &str) -> (&str, &DietPlan) {
        if let Some((key, plan)) = self.plans.get_key_value(label) {
            return (key.as_str(), plan);
        }
        warn!(label, fallback = %self.default_label, "diet label not in meal table, using default");
        (self.default_label.as_str(), &self.default_plan)
    }

    /// Draws one meal per slot and adjusts the macro target toward `calories`.
    pub fn select<R: Rng + ?Sized>(&self, label: &str, calories: i64, rng: &mut R) -> MealPlan {
        let (plan_label, plan) = self.plan_for(label);
        MealPlan {
            plan_label: plan_label.to_string(),
            breakfast: pick(&plan.breakfast, rng),
            lunch: pick(&plan.lunch, rng),
            dinner: pick(&plan.dinner, rng),
            snacks: pick(&plan.snacks, rng),
            macros: plan.macros.adjusted_to(calories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn macros(calories: i64, protein_g: i64, carbs_g: i64, fats_g: i64) -> MacroTarget {
        MacroTarget {
            calories,
            protein_g,
            carbs_g,
            fats_g,
        }
    }

    fn plan(meals: &[&str], macros: MacroTarget) -> DietPlan {
        let meals: Vec<String> = meals.iter().map(|m| m.to_string()).collect();
        DietPlan {
            breakfast: meals.clone(),
            lunch: meals.clone(),
            dinner: meals.clone(),
            snacks: meals,
            macros,
        }
    }

    #[test]
    fn deviation_of_exactly_300_keeps_baseline() {
        let baseline = macros(2000, 80, 250, 70);
        assert_eq!(baseline.adjusted_to(2300), baseline);
        assert_eq!(baseline.adjusted_to(1700), baseline);
        assert_eq!(baseline.adjusted_to(2000), baseline);
    }

    #[test]
    fn deviation_of_301_rescales() {
        let baseline = macros(2000, 80, 250, 70);
        // factor 1.1505
        assert_eq!(baseline.adjusted_to(2301), macros(2301, 92, 287, 80));
        // factor 0.8495
        assert_eq!(baseline.adjusted_to(1699), macros(1699, 67, 212, 59));
    }

    #[test]
    fn rescaling_keeps_macro_ratios() {
        let scaled = macros(2000, 80, 250, 70).adjusted_to(3000);
        assert_eq!(scaled, macros(3000, 120, 375, 105));
        assert_eq!(scaled.carbs_g * 80, scaled.protein_g * 250);
    }

    #[test]
    fn zero_calorie_baseline_is_left_alone() {
        let baseline = macros(0, 10, 10, 10);
        assert_eq!(baseline.adjusted_to(2500), baseline);
    }

    #[test]
    fn empty_slot_yields_sentinel() {
        let mut plans = BTreeMap::new();
        plans.insert("Sparse".to_string(), plan(&[], macros(2000, 80, 250, 70)));
        let table = MealTable::new(plans, "Sparse").unwrap();

        let meal_plan = table.select("Sparse", 2000, &mut StdRng::seed_from_u64(1));
        assert_eq!(meal_plan.breakfast, NO_MEAL_AVAILABLE);
        assert_eq!(meal_plan.snacks, NO_MEAL_AVAILABLE);
    }

    #[test]
    fn unknown_label_falls_back_to_default() {
        let mut plans = BTreeMap::new();
        plans.insert("Keto".to_string(), plan(&["Bacon"], macros(1800, 120, 30, 140)));
        plans.insert("Balanced Diet".to_string(), plan(&["Oats"], macros(2000, 100, 250, 67)));
        let table = MealTable::new(plans, "Balanced Diet").unwrap();

        let meal_plan = table.select("Paleo", 2000, &mut StdRng::seed_from_u64(1));
        assert_eq!(meal_plan.plan_label, "Balanced Diet");
        assert_eq!(meal_plan.lunch, "Oats");

        let meal_plan = table.select("Keto", 1800, &mut StdRng::seed_from_u64(1));
        assert_eq!(meal_plan.plan_label, "Keto");
        assert_eq!(meal_plan.dinner, "Bacon");
    }

    #[test]
    fn missing_default_is_a_startup_error() {
        let mut plans = BTreeMap::new();
        plans.insert("Keto".to_string(), plan(&["Bacon"], macros(1800, 120, 30, 140)));
        let err = MealTable::new(plans, "Balanced Diet").unwrap_err();
        assert!(matches!(err, StartupError::MissingDefaultLabel(ref l) if l == "Balanced Diet"));
    }

    #[test]
    fn picks_come_from_the_slot_and_repeat_under_a_seed() {
        let table = MealTable::embedded(DEFAULT_DIET_LABEL).unwrap();
        let (_, low_carb) = table.plan_for("Low Carb");

        let first = table.select("Low Carb", 1800, &mut StdRng::seed_from_u64(42));
        let second = table.select("Low Carb", 1800, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert!(low_carb.breakfast.contains(&first.breakfast));
        assert!(low_carb.lunch.contains(&first.lunch));
        assert!(low_carb.dinner.contains(&first.dinner));
        assert!(low_carb.snacks.contains(&first.snacks));
    }

    #[test]
    fn every_option_is_reachable() {
        let table = MealTable::embedded(DEFAULT_DIET_LABEL).unwrap();
        let (_, balanced) = table.plan_for(DEFAULT_DIET_LABEL);
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(table.select(DEFAULT_DIET_LABEL, 2000, &mut rng).breakfast);
        }
        assert_eq!(seen.len(), balanced.breakfast.len());
    }

    #[test]
    fn embedded_table_covers_every_model_class() {
        let table = MealTable::embedded(DEFAULT_DIET_LABEL).unwrap();
        let labels: Vec<&str> = table.labels().collect();
        for class in ["Balanced Diet", "High Protein", "Low Carb"] {
            assert!(labels.contains(&class), "{class} missing from {labels:?}");
        }
    }
}
