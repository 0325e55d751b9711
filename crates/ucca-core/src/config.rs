use crate::error::{Result, UccaError};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EnumerationConfig
// ---------------------------------------------------------------------------

/// Enumerator configuration, fixed at construction and never mutated
/// mid-run. All fields carry serde defaults so the host can supply partial
/// configuration documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumerationConfig {
    /// Largest combination the generator emits. Must be at least 2;
    /// practically kept at 4 or below.
    #[serde(default = "default_max_combination_size")]
    pub max_combination_size: usize,
    #[serde(default = "default_true")]
    pub enable_provide_withhold: bool,
    #[serde(default = "default_true")]
    pub enable_timing_order: bool,
    #[serde(default = "default_true")]
    pub enable_class_level: bool,
    #[serde(default = "default_true")]
    pub enable_instance_level: bool,
    /// Candidates scoring below this are dropped. Must lie in [0, 1].
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
    #[serde(default = "default_true")]
    pub apply_hazard_relevance: bool,
    /// Reserved for future temporal-analysis extensions; currently unused.
    #[serde(default)]
    pub temporal_analysis: bool,
    /// Hard cap on generated base candidates. The systematic generator's
    /// cost is combinatorial in controllers and actions; hitting this cap
    /// aborts the run rather than returning a partial result.
    #[serde(default = "default_combination_budget")]
    pub combination_budget: usize,
}

fn default_max_combination_size() -> usize {
    3
}

fn default_score_threshold() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_combination_budget() -> usize {
    20_000
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            max_combination_size: default_max_combination_size(),
            enable_provide_withhold: true,
            enable_timing_order: true,
            enable_class_level: true,
            enable_instance_level: true,
            score_threshold: default_score_threshold(),
            apply_hazard_relevance: true,
            temporal_analysis: false,
            combination_budget: default_combination_budget(),
        }
    }
}

impl EnumerationConfig {
    /// Preset for aerospace analyses: pairwise-plus-one combinations and a
    /// raised reporting bar, matching the review capacity of a flight-safety
    /// board.
    pub fn aerospace() -> Self {
        Self {
            max_combination_size: 3,
            score_threshold: 0.6,
            ..Self::default()
        }
    }

    /// Range-check the configuration. Rejection happens here, at
    /// construction time, so the pipeline itself never sees out-of-range
    /// values.
    pub fn validated(self) -> Result<Self> {
        if self.max_combination_size < 2 {
            return Err(UccaError::InvalidConfig(format!(
                "max_combination_size must be at least 2, got {}",
                self.max_combination_size
            )));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(UccaError::InvalidConfig(format!(
                "score_threshold must lie in [0, 1], got {}",
                self.score_threshold
            )));
        }
        if self.combination_budget == 0 {
            return Err(UccaError::InvalidConfig(
                "combination_budget must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EnumerationConfig::default().validated().is_ok());
    }

    #[test]
    fn aerospace_preset_is_valid() {
        let config = EnumerationConfig::aerospace().validated().unwrap();
        assert_eq!(config.max_combination_size, 3);
        assert_eq!(config.score_threshold, 0.6);
        assert!(config.enable_timing_order);
        assert!(!config.temporal_analysis);
    }

    #[test]
    fn rejects_max_size_below_two() {
        let config = EnumerationConfig {
            max_combination_size: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validated(),
            Err(UccaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        let config = EnumerationConfig {
            score_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validated().is_err());

        let config = EnumerationConfig {
            score_threshold: -0.1,
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn rejects_zero_budget() {
        let config = EnumerationConfig {
            combination_budget: 0,
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: EnumerationConfig =
            serde_yaml::from_str("max_combination_size: 4\n").unwrap();
        assert_eq!(config.max_combination_size, 4);
        assert_eq!(config.score_threshold, 0.5);
        assert!(config.enable_class_level);
        assert_eq!(config.combination_budget, 20_000);
    }

    #[test]
    fn config_yaml_roundtrip() {
        let config = EnumerationConfig::aerospace();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: EnumerationConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
