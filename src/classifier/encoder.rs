//! Turns a [`UserProfile`] into the model's fixed-order feature vector.
//!
//! Numeric columns are standardized with the training-time mean and scale,
//! categorical columns are one-hot encoded as `<feature>_<category>` with
//! unknown categories left all-zero, and the result is reindexed onto the
//! training feature order. Columns the model expects but the encoders did not
//! produce are filled with 0.

use crate::error::ClassifyError;
use crate::profile::UserProfile;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard-scaler parameters as stored in the model bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub features: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// One-hot encoder parameters as stored in the model bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotParams {
    pub features: Vec<String>,
    pub categories: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
struct StandardScaler {
    features: Vec<String>,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    fn from_params(params: ScalerParams) -> Result<Self, String> {
        let n = params.features.len();
        if params.mean.len() != n || params.scale.len() != n {
            return Err(format!(
                "scaler has {} features but {} means and {} scales",
                n,
                params.mean.len(),
                params.scale.len()
            ));
        }
        // A zero scale means the column was constant at fit time; it is left unscaled.
        let scale = params
            .scale
            .iter()
            .map(|&s| if s == 0.0 { 1.0 } else { s })
            .collect::<Vec<_>>();
        Ok(Self {
            features: params.features,
            mean: Array1::from_vec(params.mean),
            scale: Array1::from_vec(scale),
        })
    }

    fn transform(&self, profile: &UserProfile) -> Result<Vec<(String, f64)>, ClassifyError> {
        let mut columns = Vec::with_capacity(self.features.len());
        for (i, name) in self.features.iter().enumerate() {
            let raw = profile.numeric_feature(name).ok_or_else(|| {
                ClassifyError::Encoding(format!("scaler expects unknown numeric feature '{name}'"))
            })?;
            let value = (raw - self.mean[i]) / self.scale[i];
            if !value.is_finite() {
                return Err(ClassifyError::Encoding(format!(
                    "feature '{name}' scaled to a non-finite value from {raw}"
                )));
            }
            columns.push((name.clone(), value));
        }
        Ok(columns)
    }
}

#[derive(Debug, Clone)]
struct OneHotEncoder {
    features: Vec<String>,
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    fn from_params(params: OneHotParams) -> Result<Self, String> {
        if params.features.len() != params.categories.len() {
            return Err(format!(
                "one-hot encoder has {} features but {} category lists",
                params.features.len(),
                params.categories.len()
            ));
        }
        Ok(Self {
            features: params.features,
            categories: params.categories,
        })
    }

    fn transform(&self, profile: &UserProfile) -> Result<Vec<(String, f64)>, ClassifyError> {
        let mut columns = Vec::new();
        for (feature, categories) in self.features.iter().zip(&self.categories) {
            let value = profile.categorical_feature(feature).ok_or_else(|| {
                ClassifyError::Encoding(format!(
                    "encoder expects unknown categorical feature '{feature}'"
                ))
            })?;
            // An unseen category matches nothing and encodes as all zeros.
            for category in categories {
                let hot = if category == value { 1.0 } else { 0.0 };
                columns.push((format!("{feature}_{category}"), hot));
            }
        }
        Ok(columns)
    }
}

/// Scaler, one-hot encoder and training column order, applied together.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    scaler: StandardScaler,
    one_hot: OneHotEncoder,
    feature_names: Vec<String>,
}

impl FeatureEncoder {
    /// Builds the encoder, rejecting inconsistent parameter shapes.
    pub fn new(
        scaler: ScalerParams,
        one_hot: OneHotParams,
        feature_names: Vec<String>,
    ) -> Result<Self, String> {
        if feature_names.is_empty() {
            return Err("model bundle lists no feature names".to_string());
        }
        Ok(Self {
            scaler: StandardScaler::from_params(scaler)?,
            one_hot: OneHotEncoder::from_params(one_hot)?,
            feature_names,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// # Errors
    ///
    /// Returns [`ClassifyError::Encoding`] when the encoders reference a
    /// feature the profile does not have, or scaling yields a non-finite value.
    pub fn encode(&self, profile: &UserProfile) -> Result<Array1<f64>, ClassifyError> {
        let mut columns: HashMap<String, f64> = self.scaler.transform(profile)?.into_iter().collect();
        columns.extend(self.one_hot.transform(profile)?);

        Ok(self
            .feature_names
            .iter()
            .map(|name| columns.get(name).copied().unwrap_or(0.0))
            .collect())
    }
}
