use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ─── AlertKind ───────────────────────────────────────────────────────

/// The alert-type discriminant stored on a record (no payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    AbsolutePrice,
    PercentageChange,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::AbsolutePrice => "absolute_price",
            AlertKind::PercentageChange => "percentage_change",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absolute_price" | "absolute" => Ok(AlertKind::AbsolutePrice),
            "percentage_change" | "percentage" => Ok(AlertKind::PercentageChange),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid alert type: {}. Supported: absolute_price, percentage_change",
                s
            ))),
        }
    }
}

// ─── AlertDirection ──────────────────────────────────────────────────

/// Which way a percentage-change alert watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Increase,
    Decrease,
    Both,
}

impl AlertDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::Increase => "increase",
            AlertDirection::Decrease => "decrease",
            AlertDirection::Both => "both",
        }
    }
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increase" | "up" => Ok(AlertDirection::Increase),
            "decrease" | "down" => Ok(AlertDirection::Decrease),
            "both" => Ok(AlertDirection::Both),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid alert direction: {}. Supported: increase, decrease, both",
                s
            ))),
        }
    }
}

// ─── PatternType ─────────────────────────────────────────────────────

/// The chart formations the detectors recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    HeadAndShoulders,
    DoubleTop,
    DoubleBottom,
    AscendingTriangle,
    DescendingTriangle,
    SymmetricTriangle,
    BullishFlag,
    BearishFlag,
    BullishPennant,
    BearishPennant,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::HeadAndShoulders => "head_and_shoulders",
            PatternType::DoubleTop => "double_top",
            PatternType::DoubleBottom => "double_bottom",
            PatternType::AscendingTriangle => "ascending_triangle",
            PatternType::DescendingTriangle => "descending_triangle",
            PatternType::SymmetricTriangle => "symmetric_triangle",
            PatternType::BullishFlag => "bullish_flag",
            PatternType::BearishFlag => "bearish_flag",
            PatternType::BullishPennant => "bullish_pennant",
            PatternType::BearishPennant => "bearish_pennant",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "head_and_shoulders" => Ok(PatternType::HeadAndShoulders),
            "double_top" => Ok(PatternType::DoubleTop),
            "double_bottom" => Ok(PatternType::DoubleBottom),
            "ascending_triangle" => Ok(PatternType::AscendingTriangle),
            "descending_triangle" => Ok(PatternType::DescendingTriangle),
            "symmetric_triangle" => Ok(PatternType::SymmetricTriangle),
            "bullish_flag" => Ok(PatternType::BullishFlag),
            "bearish_flag" => Ok(PatternType::BearishFlag),
            "bullish_pennant" => Ok(PatternType::BullishPennant),
            "bearish_pennant" => Ok(PatternType::BearishPennant),
            _ => Err(AppError::InvalidInput(format!("Invalid pattern type: {}", s))),
        }
    }
}

// ─── PatternDirection ────────────────────────────────────────────────

/// Bias a recognized formation implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl PatternDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternDirection::Bullish => "bullish",
            PatternDirection::Bearish => "bearish",
            PatternDirection::Neutral => "neutral",
        }
    }
}

impl fmt::Display for PatternDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── TrendDirection ──────────────────────────────────────────────────

/// Slope sign a trendline fit is asked to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Ascending,
    Descending,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Ascending => "ascending",
            TrendDirection::Descending => "descending",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
