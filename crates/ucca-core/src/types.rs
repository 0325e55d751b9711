use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// InteractionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    /// Combinations of actions jointly provided or jointly withheld.
    ProvideWithhold,
    /// Combinations where relative timing or ordering causes the hazard.
    TimingOrder,
}

impl InteractionType {
    pub fn all() -> &'static [InteractionType] {
        &[InteractionType::ProvideWithhold, InteractionType::TimingOrder]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::ProvideWithhold => "provide_withhold",
            InteractionType::TimingOrder => "timing_order",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InteractionType {
    type Err = crate::error::UccaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provide_withhold" => Ok(InteractionType::ProvideWithhold),
            "timing_order" => Ok(InteractionType::TimingOrder),
            _ => Err(crate::error::UccaError::InvalidConfig(format!(
                "unknown interaction type '{s}': must be provide_withhold or timing_order"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// AbstractionLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstractionLevel {
    /// Defined over an action equivalence class; expanded by the refiner.
    ClassLevel,
    /// Defined over concrete controllers.
    InstanceLevel,
}

impl AbstractionLevel {
    pub fn all() -> &'static [AbstractionLevel] {
        &[AbstractionLevel::ClassLevel, AbstractionLevel::InstanceLevel]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbstractionLevel::ClassLevel => "class_level",
            AbstractionLevel::InstanceLevel => "instance_level",
        }
    }
}

impl fmt::Display for AbstractionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AbstractionLevel {
    type Err = crate::error::UccaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class_level" => Ok(AbstractionLevel::ClassLevel),
            "instance_level" => Ok(AbstractionLevel::InstanceLevel),
            _ => Err(crate::error::UccaError::InvalidConfig(format!(
                "unknown abstraction level '{s}': must be class_level or instance_level"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// TimingTag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingTag {
    Early,
    Late,
}

impl TimingTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TimingTag::Early => "early",
            TimingTag::Late => "late",
        }
    }
}

impl fmt::Display for TimingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
