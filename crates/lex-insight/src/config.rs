//! Configuration for the insight engine.
//!
//! [`AnalysisConfig`] carries every threshold and scan cap the analyzers use.
//! It can be built with the fluent [`AnalysisConfigBuilder`], deserialized from
//! JSON, or overlaid from environment variables with [`AnalysisConfig::from_env`].

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`AnalysisConfig::correlation_threshold`].
pub const ENV_CORRELATION_THRESHOLD: &str = "CORRELATION_THRESHOLD";
/// Environment variable overriding [`AnalysisConfig::outlier_z_threshold`].
pub const ENV_OUTLIER_Z_THRESHOLD: &str = "OUTLIER_Z_SCORE_THRESHOLD";
/// Environment variable overriding [`AnalysisConfig::categorical_numeric_variance_threshold`].
pub const ENV_CATEGORICAL_VARIANCE_THRESHOLD: &str = "CATEGORICAL_VARIANCE_THRESHOLD";

const DEFAULT_SOURCE_NAME: &str = "dataset";

/// Thresholds and caps for one analysis run.
///
/// # Example
///
/// ```rust,ignore
/// use lex_insight::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .correlation_threshold(0.8)
///     .source_name("sales.csv")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// `|r|` above this marks a strong correlation.
    /// Default: 0.7
    pub correlation_threshold: f64,

    /// `|z|` above this marks a z-score outlier.
    /// Default: 3.0
    pub outlier_z_threshold: f64,

    /// Coefficient of variation of group means above this marks a
    /// categorical-numeric relationship.
    /// Default: 0.3
    pub categorical_numeric_variance_threshold: f64,

    /// Text columns considered by the relationship detector.
    /// Default: 5
    pub max_categorical_columns_scanned: usize,

    /// Numeric columns considered by the relationship detector.
    /// Default: 5
    pub max_numeric_columns_scanned: usize,

    /// Numeric columns that receive an outlier insight.
    /// Default: 5
    pub max_numeric_columns_for_insights: usize,

    /// Maximum number of relationship entries kept.
    /// Default: 10
    pub relationship_result_cap: usize,

    /// Name recorded in the report metadata.
    /// Default: "dataset"
    pub source_name: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            correlation_threshold: 0.7,
            outlier_z_threshold: 3.0,
            categorical_numeric_variance_threshold: 0.3,
            max_categorical_columns_scanned: 5,
            max_numeric_columns_scanned: 5,
            max_numeric_columns_for_insights: 5,
            relationship_result_cap: 10,
            source_name: DEFAULT_SOURCE_NAME.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Defaults overlaid with the threshold environment variables.
    pub fn from_env() -> Result<Self, ConfigValidationError> {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay thresholds from a variable lookup. Unset variables keep the
    /// current value; unparsable ones are an error.
    pub fn overlay_env<F>(mut self, lookup: F) -> Result<Self, ConfigValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| -> Result<Option<f64>, ConfigValidationError> {
            match lookup(key) {
                None => Ok(None),
                Some(raw) => raw.trim().parse::<f64>().map(Some).map_err(|_| {
                    ConfigValidationError::InvalidEnvValue {
                        variable: key.to_string(),
                        value: raw,
                    }
                }),
            }
        };

        if let Some(value) = parse(ENV_CORRELATION_THRESHOLD)? {
            self.correlation_threshold = value;
        }
        if let Some(value) = parse(ENV_OUTLIER_Z_THRESHOLD)? {
            self.outlier_z_threshold = value;
        }
        if let Some(value) = parse(ENV_CATEGORICAL_VARIANCE_THRESHOLD)? {
            self.categorical_numeric_variance_threshold = value;
        }
        Ok(self)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "correlation_threshold".to_string(),
                value: self.correlation_threshold,
            });
        }

        if !self.outlier_z_threshold.is_finite() || self.outlier_z_threshold <= 0.0 {
            return Err(ConfigValidationError::NonPositive {
                field: "outlier_z_threshold".to_string(),
                value: self.outlier_z_threshold,
            });
        }

        if !self.categorical_numeric_variance_threshold.is_finite()
            || self.categorical_numeric_variance_threshold <= 0.0
        {
            return Err(ConfigValidationError::NonPositive {
                field: "categorical_numeric_variance_threshold".to_string(),
                value: self.categorical_numeric_variance_threshold,
            });
        }

        for (field, value) in [
            ("max_categorical_columns_scanned", self.max_categorical_columns_scanned),
            ("max_numeric_columns_scanned", self.max_numeric_columns_scanned),
            ("max_numeric_columns_for_insights", self.max_numeric_columns_for_insights),
            ("relationship_result_cap", self.relationship_result_cap),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCap(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be a positive finite number)")]
    NonPositive { field: String, value: f64 },

    #[error("Invalid cap '{0}': must be at least 1")]
    ZeroCap(String),

    #[error("Environment variable {variable}='{value}' is not a number")]
    InvalidEnvValue { variable: String, value: String },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    correlation_threshold: Option<f64>,
    outlier_z_threshold: Option<f64>,
    categorical_numeric_variance_threshold: Option<f64>,
    max_categorical_columns_scanned: Option<usize>,
    max_numeric_columns_scanned: Option<usize>,
    max_numeric_columns_for_insights: Option<usize>,
    relationship_result_cap: Option<usize>,
    source_name: Option<String>,
}

impl AnalysisConfigBuilder {
    /// Set the strong-correlation threshold (0.0 - 1.0).
    pub fn correlation_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = Some(threshold);
        self
    }

    /// Set the z-score outlier threshold.
    pub fn outlier_z_threshold(mut self, threshold: f64) -> Self {
        self.outlier_z_threshold = Some(threshold);
        self
    }

    /// Set the categorical-numeric relationship threshold.
    pub fn categorical_numeric_variance_threshold(mut self, threshold: f64) -> Self {
        self.categorical_numeric_variance_threshold = Some(threshold);
        self
    }

    pub fn max_categorical_columns_scanned(mut self, count: usize) -> Self {
        self.max_categorical_columns_scanned = Some(count);
        self
    }

    pub fn max_numeric_columns_scanned(mut self, count: usize) -> Self {
        self.max_numeric_columns_scanned = Some(count);
        self
    }

    pub fn max_numeric_columns_for_insights(mut self, count: usize) -> Self {
        self.max_numeric_columns_for_insights = Some(count);
        self
    }

    pub fn relationship_result_cap(mut self, cap: usize) -> Self {
        self.relationship_result_cap = Some(cap);
        self
    }

    /// Set the name recorded in the report metadata (usually the file name).
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            correlation_threshold: self
                .correlation_threshold
                .unwrap_or(defaults.correlation_threshold),
            outlier_z_threshold: self
                .outlier_z_threshold
                .unwrap_or(defaults.outlier_z_threshold),
            categorical_numeric_variance_threshold: self
                .categorical_numeric_variance_threshold
                .unwrap_or(defaults.categorical_numeric_variance_threshold),
            max_categorical_columns_scanned: self
                .max_categorical_columns_scanned
                .unwrap_or(defaults.max_categorical_columns_scanned),
            max_numeric_columns_scanned: self
                .max_numeric_columns_scanned
                .unwrap_or(defaults.max_numeric_columns_scanned),
            max_numeric_columns_for_insights: self
                .max_numeric_columns_for_insights
                .unwrap_or(defaults.max_numeric_columns_for_insights),
            relationship_result_cap: self
                .relationship_result_cap
                .unwrap_or(defaults.relationship_result_cap),
            source_name: self.source_name.unwrap_or(defaults.source_name),
        };

        config.validate()?;
        Ok(config)
    }
}
