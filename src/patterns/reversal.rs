//! Reversal formations: head & shoulders, double top, double bottom.
//! All three work off strict local extrema of the close series.

use crate::enums::{PatternDirection, PatternType};
use crate::models::Candle;
use crate::patterns::series::{find_peaks, find_troughs};
use crate::patterns::{closes, window_data, PatternMatch};

const HEAD_AND_SHOULDERS_MIN_CANDLES: usize = 20;
const DOUBLE_MIN_CANDLES: usize = 15;

/// Shoulders may differ from each other by at most 10%.
const SHOULDER_TOLERANCE: f64 = 0.10;
/// The twin extremes of a double top/bottom must sit within 2%.
const TWIN_TOLERANCE: f64 = 0.02;

/// Three consecutive peaks where the middle one is strictly highest and
/// the outer two sit within tolerance of each other.
pub fn detect_head_and_shoulders(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < HEAD_AND_SHOULDERS_MIN_CANDLES {
        return None;
    }

    let closes = closes(candles);
    let peaks = find_peaks(&closes);
    if peaks.len() < 3 {
        return None;
    }

    for window in peaks.windows(3) {
        let left = closes[window[0]];
        let head = closes[window[1]];
        let right = closes[window[2]];

        if head > left && head > right && ((left - right).abs() / left) <= SHOULDER_TOLERANCE {
            return Some(PatternMatch {
                pattern_type: PatternType::HeadAndShoulders,
                confidence_score: 80.0,
                price_at_identification: *closes.last()?,
                pattern_data: window_data(
                    candles,
                    vec![left, head, right],
                    PatternDirection::Bearish,
                ),
            });
        }
    }

    None
}

/// Two consecutive peaks within 2% of each other.
pub fn detect_double_top(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < DOUBLE_MIN_CANDLES {
        return None;
    }

    let closes = closes(candles);
    let peaks = find_peaks(&closes);
    if peaks.len() < 2 {
        return None;
    }

    for window in peaks.windows(2) {
        let first = closes[window[0]];
        let second = closes[window[1]];

        if ((first - second).abs() / first) <= TWIN_TOLERANCE {
            return Some(PatternMatch {
                pattern_type: PatternType::DoubleTop,
                confidence_score: 75.0,
                price_at_identification: *closes.last()?,
                pattern_data: window_data(
                    candles,
                    vec![first, second],
                    PatternDirection::Bearish,
                ),
            });
        }
    }

    None
}

/// Two consecutive troughs within 2% of each other.
pub fn detect_double_bottom(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < DOUBLE_MIN_CANDLES {
        return None;
    }

    let closes = closes(candles);
    let troughs = find_troughs(&closes);
    if troughs.len() < 2 {
        return None;
    }

    for window in troughs.windows(2) {
        let first = closes[window[0]];
        let second = closes[window[1]];

        if ((first - second).abs() / first) <= TWIN_TOLERANCE {
            return Some(PatternMatch {
                pattern_type: PatternType::DoubleBottom,
                confidence_score: 75.0,
                price_at_identification: *closes.last()?,
                pattern_data: window_data(
                    candles,
                    vec![first, second],
                    PatternDirection::Bullish,
                ),
            });
        }
    }

    None
}
