//! Core types for the insight generator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a generated insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Derived from budget transactions
    Budget,
    /// Derived from investment positions
    Investment,
    /// Composite financial-health summary
    General,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Budget => "budget",
            InsightKind::Investment => "investment",
            InsightKind::General => "general",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budget" => Ok(InsightKind::Budget),
            "investment" => Ok(InsightKind::Investment),
            "general" => Ok(InsightKind::General),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// Priority of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Numeric rank for sorting (higher = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A prioritized, human-readable observation derived from aggregated data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub impact: String,
}

impl Insight {
    pub fn new(
        kind: InsightKind,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
        impact: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            priority,
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            impact: impact.into(),
        }
    }
}
