//! Triangle formations. Flat boundaries come from the global extreme of
//! the window; sloped boundaries from an OLS fit over highs or lows.

use crate::enums::{PatternDirection, PatternType, TrendDirection};
use crate::models::Candle;
use crate::patterns::series::{find_convergence, fit_trendline};
use crate::patterns::{closes, highs, lows, window_data, PatternMatch};

const TRIANGLE_MIN_CANDLES: usize = 20;

/// The flat side must hold within 2% of the latest touch.
const FLAT_TOLERANCE: f64 = 0.02;

/// Flat resistance at the window high with an ascending support line.
pub fn detect_ascending_triangle(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < TRIANGLE_MIN_CANDLES {
        return None;
    }

    let highs = highs(candles);
    let lows = lows(candles);

    let resistance = highs.iter().cloned().fold(f64::MIN, f64::max);
    let last_high = *highs.last()?;
    if ((resistance - last_high).abs() / resistance) > FLAT_TOLERANCE {
        return None;
    }

    let support = fit_trendline(&lows, TrendDirection::Ascending)?;

    Some(PatternMatch {
        pattern_type: PatternType::AscendingTriangle,
        confidence_score: 85.0,
        price_at_identification: *closes(candles).last()?,
        pattern_data: window_data(
            candles,
            vec![resistance, support.start, support.end],
            PatternDirection::Bullish,
        ),
    })
}

/// Flat support at the window low with a descending resistance line.
pub fn detect_descending_triangle(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < TRIANGLE_MIN_CANDLES {
        return None;
    }

    let highs = highs(candles);
    let lows = lows(candles);

    let support = lows.iter().cloned().fold(f64::MAX, f64::min);
    let last_low = *lows.last()?;
    if ((support - last_low).abs() / support) > FLAT_TOLERANCE {
        return None;
    }

    let resistance = fit_trendline(&highs, TrendDirection::Descending)?;

    Some(PatternMatch {
        pattern_type: PatternType::DescendingTriangle,
        confidence_score: 85.0,
        price_at_identification: *closes(candles).last()?,
        pattern_data: window_data(
            candles,
            vec![support, resistance.start, resistance.end],
            PatternDirection::Bearish,
        ),
    })
}

/// Descending resistance and ascending support that actually meet
/// within the window's index domain.
pub fn detect_symmetric_triangle(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < TRIANGLE_MIN_CANDLES {
        return None;
    }

    let highs = highs(candles);
    let lows = lows(candles);

    let resistance = fit_trendline(&highs, TrendDirection::Descending)?;
    let support = fit_trendline(&lows, TrendDirection::Ascending)?;
    find_convergence(&resistance, &support, candles.len())?;

    Some(PatternMatch {
        pattern_type: PatternType::SymmetricTriangle,
        confidence_score: 80.0,
        price_at_identification: *closes(candles).last()?,
        pattern_data: window_data(
            candles,
            vec![resistance.start, resistance.end, support.start, support.end],
            PatternDirection::Neutral,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::testutil::candles_from_hl;

    #[test]
    fn ascending_triangle_on_flat_top_rising_lows() {
        let highs = vec![100.0; 20];
        let lows: Vec<f64> = (0..20).map(|i| 80.0 + 0.5 * i as f64).collect();
        let m = detect_ascending_triangle(&candles_from_hl(&highs, &lows)).unwrap();
        assert_eq!(m.confidence_score, 85.0);
        assert_eq!(m.pattern_data.direction, PatternDirection::Bullish);
        assert_eq!(m.pattern_data.key_levels[0], 100.0);
    }

    #[test]
    fn ascending_triangle_needs_resistance_near_last_high() {
        // Last high has fallen well away from the window high.
        let mut highs = vec![100.0; 20];
        highs[19] = 90.0;
        let lows: Vec<f64> = (0..20).map(|i| 80.0 + 0.5 * i as f64).collect();
        assert!(detect_ascending_triangle(&candles_from_hl(&highs, &lows)).is_none());
    }

    #[test]
    fn descending_triangle_on_flat_bottom_falling_highs() {
        let highs: Vec<f64> = (0..20).map(|i| 120.0 - 0.5 * i as f64).collect();
        let lows = vec![80.0; 20];
        let m = detect_descending_triangle(&candles_from_hl(&highs, &lows)).unwrap();
        assert_eq!(m.confidence_score, 85.0);
        assert_eq!(m.pattern_data.direction, PatternDirection::Bearish);
        assert_eq!(m.pattern_data.key_levels[0], 80.0);
    }

    #[test]
    fn symmetric_triangle_on_converging_lines() {
        let highs: Vec<f64> = (0..20).map(|i| 110.0 - 0.6 * i as f64).collect();
        let lows: Vec<f64> = (0..20).map(|i| 90.0 + 0.6 * i as f64).collect();
        let m = detect_symmetric_triangle(&candles_from_hl(&highs, &lows)).unwrap();
        assert_eq!(m.confidence_score, 80.0);
        assert_eq!(m.pattern_data.direction, PatternDirection::Neutral);
    }

    #[test]
    fn symmetric_triangle_rejects_lines_meeting_past_the_window() {
        // Converging, but the crossing lands just outside the domain.
        let highs: Vec<f64> = (0..20).map(|i| 110.0 - 0.5 * i as f64).collect();
        let lows: Vec<f64> = (0..20).map(|i| 90.0 + 0.5 * i as f64).collect();
        assert!(detect_symmetric_triangle(&candles_from_hl(&highs, &lows)).is_none());
    }

    #[test]
    fn triangles_need_twenty_candles() {
        let highs = vec![100.0; 19];
        let lows: Vec<f64> = (0..19).map(|i| 80.0 + 0.5 * i as f64).collect();
        assert!(detect_ascending_triangle(&candles_from_hl(&highs, &lows)).is_none());
    }
}
