//! Command-line and environment configuration.

use crate::engine::ReferenceSources;
use crate::meal_plan::DEFAULT_DIET_LABEL;
use crate::profile::{
    ActivityLevel, DietaryRestriction, Region, UserProfile, AGE_RANGE, HEIGHT_RANGE_CM, WEIGHT_RANGE_KG,
};
use clap::{Args, Parser};
use std::ops::RangeInclusive;
use std::path::PathBuf;

pub const DEFAULT_AUDIT_LOG: &str = "logs/user_inputs.jsonl";

#[derive(Debug, Clone, Parser)]
#[command(name = "diet-planner", version)]
#[command(about = "Diet type, meal plan and macro targets from basic personal metrics")]
pub struct Config {
    /// Model bundle (JSON). Uses the built-in model when omitted.
    #[arg(long, env = "DIET_PLANNER_MODEL")]
    pub model: Option<PathBuf>,

    /// Meal/macro reference table (JSON). Uses the built-in table when omitted.
    #[arg(long, env = "DIET_PLANNER_MEALS")]
    pub meals: Option<PathBuf>,

    /// Meal plan used when the predicted diet type has no table entry
    #[arg(long, env = "DIET_PLANNER_DEFAULT_LABEL", default_value = DEFAULT_DIET_LABEL)]
    pub default_label: String,

    /// Append-only log of submitted profiles
    #[arg(long, env = "DIET_PLANNER_AUDIT_LOG", default_value = DEFAULT_AUDIT_LOG)]
    pub audit_log: PathBuf,

    /// Do not write the audit log
    #[arg(long)]
    pub no_audit: bool,

    /// Also save each report under <DIR>/<date>/
    #[arg(long, env = "DIET_PLANNER_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// Seed for meal selection, for reproducible plans
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the recommendation as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub profile: ProfileArgs,
}

/// Form values given on the command line. When all six are present the tool
/// runs once without prompting.
#[derive(Debug, Clone, Default, Args)]
pub struct ProfileArgs {
    /// Age in years (10-100)
    #[arg(long, value_parser = parse_age)]
    pub age: Option<u32>,

    /// Height in cm (100-250)
    #[arg(long, value_parser = parse_height)]
    pub height: Option<f64>,

    /// Weight in kg (30-200)
    #[arg(long, value_parser = parse_weight)]
    pub weight: Option<f64>,

    /// Low, Medium or High
    #[arg(long)]
    pub activity: Option<ActivityLevel>,

    /// North, South, East or West
    #[arg(long)]
    pub region: Option<Region>,

    /// None, Vegetarian or Vegan
    #[arg(long)]
    pub restriction: Option<DietaryRestriction>,
}

impl ProfileArgs {
    pub fn complete(&self) -> Option<UserProfile> {
        Some(UserProfile {
            age: self.age?,
            height_cm: self.height?,
            weight_kg: self.weight?,
            activity_level: self.activity?,
            region: self.region?,
            dietary_restriction: self.restriction?,
        })
    }

    pub fn any(&self) -> bool {
        self.age.is_some()
            || self.height.is_some()
            || self.weight.is_some()
            || self.activity.is_some()
            || self.region.is_some()
            || self.restriction.is_some()
    }
}

impl Config {
    pub fn reference_sources(&self) -> ReferenceSources {
        ReferenceSources {
            model: self.model.clone(),
            meals: self.meals.clone(),
            default_label: self.default_label.clone(),
        }
    }

    pub fn audit_path(&self) -> Option<&PathBuf> {
        (!self.no_audit).then_some(&self.audit_log)
    }
}

pub fn parse_bounded(input: &str, range: &RangeInclusive<f64>, unit: &str) -> Result<f64, String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", input.trim()))?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "{value} is outside {}-{} {unit}",
            range.start(),
            range.end()
        ))
    }
}

pub fn parse_height(input: &str) -> Result<f64, String> {
    parse_bounded(input, &HEIGHT_RANGE_CM, "cm")
}

pub fn parse_weight(input: &str) -> Result<f64, String> {
    parse_bounded(input, &WEIGHT_RANGE_KG, "kg")
}

pub fn parse_age(input: &str) -> Result<u32, String> {
    let age: u32 = input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number of years", input.trim()))?;
    if AGE_RANGE.contains(&age) {
        Ok(age)
    } else {
        Err(format!("{age} is outside {}-{} years", AGE_RANGE.start(), AGE_RANGE.end()))
    }
}
