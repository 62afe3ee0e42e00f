//! The six personal inputs a recommendation is computed from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Accepted ranges for the interactive form and the CLI flags.
pub const AGE_RANGE: RangeInclusive<u32> = 10..=100;
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 100.0..=250.0;
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 30.0..=200.0;

pub const DEFAULT_AGE: u32 = 25;
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Lenient mapping used by the calorie formula: anything that is not
    /// exactly "Low" or "Medium" counts as High.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            _ => Self::High,
        }
    }

    /// Multiplier applied to BMR to estimate daily energy expenditure.
    pub fn factor(self) -> f64 {
        match self {
            Self::Low => 1.2,
            Self::Medium => 1.55,
            Self::High => 1.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietaryRestriction {
    None,
    Vegetarian,
    Vegan,
}

impl DietaryRestriction {
    pub const ALL: [Self; 3] = [Self::None, Self::Vegetarian, Self::Vegan];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
        }
    }
}

// Strict, case-insensitive parsing for user input. Typos are rejected here;
// the lenient High fallback only applies to `ActivityLevel::from_label`.
fn parse_choice<T: Copy>(input: &str, options: &[T], name: fn(T) -> &'static str) -> Result<T, String> {
    let wanted = input.trim();
    options
        .iter()
        .copied()
        .find(|option| name(*option).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let names: Vec<&str> = options.iter().map(|o| name(*o)).collect();
            format!("'{wanted}' is not one of {}", names.join(", "))
        })
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s, &Self::ALL, Self::as_str)
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s, &Self::ALL, Self::as_str)
    }
}

impl FromStr for DietaryRestriction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s, &Self::ALL, Self::as_str)
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted form. Created per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub region: Region,
    pub dietary_restriction: DietaryRestriction,
}

impl UserProfile {
    /// Numeric value of a model feature, by training-time column name.
    pub fn numeric_feature(&self, name: &str) -> Option<f64> {
        match name {
            "age" => Some(f64::from(self.age)),
            "height" => Some(self.height_cm),
            "weight" => Some(self.weight_kg),
            _ => None,
        }
    }

    /// Categorical value of a model feature, by training-time column name.
    pub fn categorical_feature(&self, name: &str) -> Option<&'static str> {
        match name {
            "activity_level" => Some(self.activity_level.as_str()),
            "region" => Some(self.region.as_str()),
            "dietary_restriction" => Some(self.dietary_restriction.as_str()),
            _ => None,
        }
    }

    /// Profile block written at the top of saved reports.
    pub fn summary(&self) -> String {
        format!(
            "Age: {} years\nHeight: {:.0} cm\nWeight: {:.0} kg\nActivity Level: {}\nRegion: {}\nDietary Restriction: {}",
            self.age, self.height_cm, self.weight_kg, self.activity_level, self.region, self.dietary_restriction
        )
    }
}
