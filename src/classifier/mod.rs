//! Diet-type classification.
//!
//! [`DietClassifier`] is the seam the engine depends on. The shipped
//! implementation, [`ForestClassifier`], reads a JSON model bundle (class
//! labels, training feature order, scaler and one-hot parameters, and a
//! random forest) once at startup.

pub mod encoder;
pub mod forest;

use crate::error::{ClassifyError, StartupError};
use crate::profile::UserProfile;
use encoder::{FeatureEncoder, OneHotParams, ScalerParams};
use forest::RandomForest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const EMBEDDED_MODEL: &str = include_str!("../../data/diet_model.json");

/// Maps a profile to one diet-type label.
pub trait DietClassifier: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if the profile cannot be encoded or the model fails.
    fn classify(&self, profile: &UserProfile) -> Result<String, ClassifyError>;

    /// Identifies the loaded model, if the implementation has one.
    fn fingerprint(&self) -> Option<&str> {
        None
    }
}

/// On-disk layout of the model bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub classes: Vec<String>,
    pub feature_names: Vec<String>,
    pub scaler: ScalerParams,
    pub encoder: OneHotParams,
    pub forest: RandomForest,
}

#[derive(Debug, Clone)]
pub struct ForestClassifier {
    encoder: FeatureEncoder,
    forest: RandomForest,
    classes: Vec<String>,
    fingerprint: String,
}

impl ForestClassifier {
    /// Validates a bundle and prepares it for inference.
    pub fn from_bundle(bundle: ModelBundle, fingerprint: String) -> Result<Self, StartupError> {
        if bundle.classes.is_empty() {
            return Err(StartupError::InvalidBundle("no class labels".to_string()));
        }
        bundle
            .forest
            .validate(bundle.classes.len(), bundle.feature_names.len())
            .map_err(StartupError::InvalidBundle)?;
        let encoder = FeatureEncoder::new(bundle.scaler, bundle.encoder, bundle.feature_names)
            .map_err(StartupError::InvalidBundle)?;

        Ok(Self {
            encoder,
            forest: bundle.forest,
            classes: bundle.classes,
            fingerprint,
        })
    }

    /// Parses bundle bytes; `origin` only labels diagnostics.
    pub fn from_json(bytes: &[u8], origin: &Path) -> Result<Self, StartupError> {
        let bundle: ModelBundle = serde_json::from_slice(bytes).map_err(|source| StartupError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        let fingerprint = format!("{:x}", md5::compute(bytes));
        let classifier = Self::from_bundle(bundle, fingerprint)?;

        info!(
            origin = %origin.display(),
            classes = classifier.classes.len(),
            features = classifier.encoder.feature_names().len(),
            trees = classifier.forest.trees.len(),
            fingerprint = %classifier.fingerprint,
            "diet model loaded"
        );
        Ok(classifier)
    }

    pub fn load(path: &Path) -> Result<Self, StartupError> {
        let bytes = std::fs::read(path).map_err(|source| StartupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes, path)
    }

    /// The model compiled into the binary.
    pub fn embedded() -> Result<Self, StartupError> {
        Self::from_json(EMBEDDED_MODEL.as_bytes(), Path::new("<embedded diet model>"))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl DietClassifier for ForestClassifier {
    fn classify(&self, profile: &UserProfile) -> Result<String, ClassifyError> {
        let x = self.encoder.encode(profile)?;
        let class = self.forest.predict(&x, self.classes.len())?;
        self.classes.get(class).cloned().ok_or_else(|| {
            ClassifyError::Classification(format!("model predicted unknown class index {class}"))
        })
    }

    fn fingerprint(&self) -> Option<&str> {
        Some(&self.fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ActivityLevel, DietaryRestriction, Region};

    fn profile(
        age: u32,
        height_cm: f64,
        weight_kg: f64,
        activity_level: ActivityLevel,
        region: Region,
        dietary_restriction: DietaryRestriction,
    ) -> UserProfile {
        UserProfile {
            age,
            height_cm,
            weight_kg,
            activity_level,
            region,
            dietary_restriction,
        }
    }

    #[test]
    fn embedded_model_reproduces_its_training_rows() {
        let model = ForestClassifier::embedded().unwrap();
        let rows = [
            (profile(25, 170.0, 70.0, ActivityLevel::Low, Region::North, DietaryRestriction::None), "Balanced Diet"),
            (profile(30, 160.0, 60.0, ActivityLevel::Medium, Region::South, DietaryRestriction::Vegetarian), "Low Carb"),
            (profile(45, 180.0, 80.0, ActivityLevel::High, Region::East, DietaryRestriction::Vegan), "High Protein"),
            (profile(50, 175.0, 75.0, ActivityLevel::Medium, Region::West, DietaryRestriction::None), "Balanced Diet"),
        ];
        for (row, expected) in rows {
            assert_eq!(model.classify(&row).unwrap(), expected, "{row:?}");
        }
    }

    #[test]
    fn embedded_model_has_a_stable_fingerprint() {
        let a = ForestClassifier::embedded().unwrap();
        let b = ForestClassifier::embedded().unwrap();
        assert_eq!(a.fingerprint().unwrap().len(), 32);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.classes(), ["Balanced Diet", "High Protein", "Low Carb"]);
    }

    #[test]
    fn malformed_bundle_fails_startup() {
        let err = ForestClassifier::from_json(b"{\"classes\": []", Path::new("model.json")).unwrap_err();
        assert!(matches!(err, StartupError::Parse { .. }));
        assert!(err.to_string().contains("model.json"));
    }

    #[test]
    fn bundle_without_classes_is_invalid() {
        let json = br#"{
            "classes": [],
            "feature_names": ["age"],
            "scaler": {"features": ["age"], "mean": [0.0], "scale": [1.0]},
            "encoder": {"features": [], "categories": []},
            "forest": {"trees": [{"nodes": [{"kind": "leaf", "value": []}]}]}
        }"#;
        let err = ForestClassifier::from_json(json, Path::new("model.json")).unwrap_err();
        assert!(matches!(err, StartupError::InvalidBundle(_)));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ForestClassifier::load(Path::new("/nonexistent/diet_model.json")).unwrap_err();
        assert!(matches!(err, StartupError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/diet_model.json"));
    }
}
