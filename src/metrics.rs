//! Health metrics: BMI, estimated daily calories, and the BMI category.
//!
//! BMR uses the simplified Harris-Benedict form without a sex term:
//! `10 * weight_kg + 6.25 * height_cm - 5 * age`. Daily calories are BMR
//! times the activity factor, floored to whole kcal.

use crate::error::InvalidInput;
use crate::profile::ActivityLevel;
use serde::{Deserialize, Serialize};

pub const UNDERWEIGHT_BELOW: f64 = 18.5;
pub const OVERWEIGHT_FROM: f64 = 25.0;
pub const OBESE_FROM: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub bmi: f64,
    pub estimated_calories: i64,
}

pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age)
}

pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    weight_kg / (height_cm / 100.0).powi(2)
}

/// # Errors
///
/// Returns [`InvalidInput`] if height or weight is not a positive finite number.
pub fn compute(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    activity_level: ActivityLevel,
) -> Result<HealthMetrics, InvalidInput> {
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(InvalidInput::Height(height_cm));
    }
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(InvalidInput::Weight(weight_kg));
    }

    let bmr = basal_metabolic_rate(weight_kg, height_cm, age);
    let calories = (bmr * activity_level.factor()).floor() as i64;

    Ok(HealthMetrics {
        bmi: body_mass_index(weight_kg, height_cm),
        estimated_calories: calories,
    })
}

/// Same as [`compute`] but with the activity level given as free text.
/// Unrecognized labels use the High factor.
pub fn compute_from_label(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    activity_label: &str,
) -> Result<HealthMetrics, InvalidInput> {
    compute(weight_kg, height_cm, age, ActivityLevel::from_label(activity_label))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW {
            Self::Underweight
        } else if bmi < OVERWEIGHT_FROM {
            Self::NormalWeight
        } else if bmi < OBESE_FROM {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::NormalWeight => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }

    pub fn advisory(self) -> Option<&'static str> {
        match self {
            Self::Underweight => {
                Some("Consider focusing on nutrient-dense foods to help reach a healthy weight.")
            }
            Self::Overweight | Self::Obese => Some(
                "This diet plan is designed to support gradual weight loss while providing essential nutrients.",
            ),
            Self::NormalWeight => None,
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
