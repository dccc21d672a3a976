use serde::{Deserialize, Serialize};

use crate::enums::{PatternDirection, PatternType};
use crate::models::{Candle, PatternData};

pub mod series;

mod flag;
mod reversal;
mod triangle;

pub use flag::{detect_bearish_flag, detect_bearish_pennant, detect_bullish_flag, detect_bullish_pennant};
pub use reversal::{detect_double_bottom, detect_double_top, detect_head_and_shoulders};
pub use triangle::{detect_ascending_triangle, detect_descending_triangle, detect_symmetric_triangle};

/// A detector's positive result, before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern_type: PatternType,
    pub confidence_score: f64,
    pub price_at_identification: f64,
    pub pattern_data: PatternData,
}

pub type Detector = fn(&[Candle]) -> Option<PatternMatch>;

/// Fixed invocation order. Detectors are independent; the order only
/// makes result ordering deterministic.
pub const DETECTORS: &[Detector] = &[
    detect_head_and_shoulders,
    detect_double_top,
    detect_double_bottom,
    detect_ascending_triangle,
    detect_descending_triangle,
    detect_symmetric_triangle,
    detect_bullish_flag,
    detect_bearish_flag,
    detect_bullish_pennant,
    detect_bearish_pennant,
];

/// Runs every detector over the same candle window. A detector that
/// panics counts as "no match" and must not take down its siblings.
pub fn detect_all(candles: &[Candle]) -> Vec<PatternMatch> {
    DETECTORS
        .iter()
        .filter_map(|detector| {
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| detector(candles))) {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!("Pattern detector panicked; treating as no match");
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

pub(crate) fn highs(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.high).collect()
}

pub(crate) fn lows(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.low).collect()
}

/// PatternData covering the whole analyzed window.
pub(crate) fn window_data(
    candles: &[Candle],
    key_levels: Vec<f64>,
    direction: PatternDirection,
) -> PatternData {
    let first = &candles[0];
    let last = &candles[candles.len() - 1];
    PatternData {
        start_price: first.close,
        end_price: last.close,
        start_timestamp: first.timestamp,
        end_timestamp: last.timestamp,
        key_levels,
        direction,
    }
}
