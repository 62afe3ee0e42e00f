//! Diet recommendation from basic personal metrics.
//!
//! - `metrics`: BMI, BMR-based calorie estimate, BMI category
//! - `classifier`: feature encoding and random-forest diet-type model
//! - `meal_plan`: reference meal table, random meal pick, macro rescaling
//! - `engine`: one stateless request through the three steps above
//! - `audit`, `report`, `cli`, `config`, `logging`: the tool around it

pub mod audit;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod meal_plan;
pub mod metrics;
pub mod profile;
pub mod report;

pub use classifier::{DietClassifier, ForestClassifier};
pub use engine::{Recommendation, RecommendationEngine, ReferenceSources};
pub use error::{AuditWriteError, ClassifyError, InvalidInput, RequestError, StartupError};
pub use meal_plan::{MacroTarget, MealPlan, MealTable};
pub use metrics::{BmiCategory, HealthMetrics};
pub use profile::{ActivityLevel, DietaryRestriction, Region, UserProfile};
