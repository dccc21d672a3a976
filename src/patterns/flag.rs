//! Continuation formations: flags and pennants. The window splits in
//! half: the first half must carry the pole trend, the second half the
//! consolidation channel.

use crate::enums::{PatternDirection, PatternType, TrendDirection};
use crate::models::Candle;
use crate::patterns::series::{find_convergence, fit_trendline};
use crate::patterns::{closes, highs, lows, window_data, PatternMatch};

const FLAG_MIN_CANDLES: usize = 15;

fn split(candles: &[Candle]) -> (&[Candle], &[Candle]) {
    candles.split_at(candles.len() / 2)
}

/// Ascending pole, then a channel drifting against it: both the highs
/// and the lows of the consolidation slope down.
pub fn detect_bullish_flag(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < FLAG_MIN_CANDLES {
        return None;
    }

    let (pole, consolidation) = split(candles);
    fit_trendline(&closes(pole), TrendDirection::Ascending)?;

    let upper = fit_trendline(&highs(consolidation), TrendDirection::Descending)?;
    let lower = fit_trendline(&lows(consolidation), TrendDirection::Descending)?;

    Some(PatternMatch {
        pattern_type: PatternType::BullishFlag,
        confidence_score: 75.0,
        price_at_identification: *closes(candles).last()?,
        pattern_data: window_data(
            candles,
            vec![upper.start, upper.end, lower.start, lower.end],
            PatternDirection::Bullish,
        ),
    })
}

/// Descending pole with an upward-drifting consolidation channel.
pub fn detect_bearish_flag(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < FLAG_MIN_CANDLES {
        return None;
    }

    let (pole, consolidation) = split(candles);
    fit_trendline(&closes(pole), TrendDirection::Descending)?;

    let upper = fit_trendline(&highs(consolidation), TrendDirection::Ascending)?;
    let lower = fit_trendline(&lows(consolidation), TrendDirection::Ascending)?;

    Some(PatternMatch {
        pattern_type: PatternType::BearishFlag,
        confidence_score: 75.0,
        price_at_identification: *closes(candles).last()?,
        pattern_data: window_data(
            candles,
            vec![upper.start, upper.end, lower.start, lower.end],
            PatternDirection::Bearish,
        ),
    })
}

/// Ascending pole, then swing lines squeezing toward a crossing inside
/// the consolidation window.
pub fn detect_bullish_pennant(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < FLAG_MIN_CANDLES {
        return None;
    }

    let (pole, consolidation) = split(candles);
    fit_trendline(&closes(pole), TrendDirection::Ascending)?;

    let upper = fit_trendline(&highs(consolidation), TrendDirection::Descending)?;
    let lower = fit_trendline(&lows(consolidation), TrendDirection::Ascending)?;
    find_convergence(&upper, &lower, consolidation.len())?;

    Some(PatternMatch {
        pattern_type: PatternType::BullishPennant,
        confidence_score: 80.0,
        price_at_identification: *closes(candles).last()?,
        pattern_data: window_data(
            candles,
            vec![upper.start, upper.end, lower.start, lower.end],
            PatternDirection::Bullish,
        ),
    })
}

/// Descending pole with the same converging consolidation.
pub fn detect_bearish_pennant(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < FLAG_MIN_CANDLES {
        return None;
    }

    let (pole, consolidation) = split(candles);
    fit_trendline(&closes(pole), TrendDirection::Descending)?;

    let upper = fit_trendline(&highs(consolidation), TrendDirection::Descending)?;
    let lower = fit_trendline(&lows(consolidation), TrendDirection::Ascending)?;
    find_convergence(&upper, &lower, consolidation.len())?;

    Some(PatternMatch {
        pattern_type: PatternType::BearishPennant,
        confidence_score: 80.0,
        price_at_identification: *closes(candles).last()?,
        pattern_data: window_data(
            candles,
            vec![upper.start, upper.end, lower.start, lower.end],
            PatternDirection::Bearish,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::testutil::{candles_from_closes, candles_from_hl};

    #[test]
    fn bullish_flag_on_rising_pole_and_sagging_channel() {
        let mut closes: Vec<f64> = (0..8).map(|i| 100.0 + i as f64).collect();
        closes.extend((0..8).map(|i| 107.5 - 0.5 * i as f64));
        let m = detect_bullish_flag(&candles_from_closes(&closes)).unwrap();
        assert_eq!(m.confidence_score, 75.0);
        assert_eq!(m.pattern_data.direction, PatternDirection::Bullish);
    }

    #[test]
    fn bullish_flag_rejects_flat_pole() {
        let mut closes = vec![100.0; 8];
        closes.extend((0..8).map(|i| 107.5 - 0.5 * i as f64));
        assert!(detect_bullish_flag(&candles_from_closes(&closes)).is_none());
    }

    #[test]
    fn bearish_flag_on_falling_pole_and_rising_channel() {
        let mut closes: Vec<f64> = (0..8).map(|i| 110.0 - i as f64).collect();
        closes.extend((0..8).map(|i| 101.0 + 0.5 * i as f64));
        let m = detect_bearish_flag(&candles_from_closes(&closes)).unwrap();
        assert_eq!(m.confidence_score, 75.0);
        assert_eq!(m.pattern_data.direction, PatternDirection::Bearish);
    }

    #[test]
    fn bullish_pennant_on_converging_consolidation() {
        let mut highs: Vec<f64> = (0..8).map(|i| 101.0 + i as f64).collect();
        let mut lows: Vec<f64> = (0..8).map(|i| 99.0 + i as f64).collect();
        highs.extend((0..8).map(|i| 112.0 - i as f64));
        lows.extend((0..8).map(|i| 100.0 + i as f64));
        let m = detect_bullish_pennant(&candles_from_hl(&highs, &lows)).unwrap();
        assert_eq!(m.confidence_score, 80.0);
        assert_eq!(m.pattern_data.direction, PatternDirection::Bullish);
    }

    #[test]
    fn pennant_rejects_non_converging_swing_lines() {
        // Consolidation narrows too slowly to cross inside the window.
        let mut highs: Vec<f64> = (0..8).map(|i| 101.0 + i as f64).collect();
        let mut lows: Vec<f64> = (0..8).map(|i| 99.0 + i as f64).collect();
        highs.extend((0..8).map(|i| 120.0 - 0.1 * i as f64));
        lows.extend((0..8).map(|i| 100.0 + 0.1 * i as f64));
        assert!(detect_bullish_pennant(&candles_from_hl(&highs, &lows)).is_none());
    }

    #[test]
    fn bearish_pennant_on_falling_pole() {
        let mut highs: Vec<f64> = (0..8).map(|i| 121.0 - i as f64).collect();
        let mut lows: Vec<f64> = (0..8).map(|i| 119.0 - i as f64).collect();
        highs.extend((0..8).map(|i| 112.0 - i as f64));
        lows.extend((0..8).map(|i| 100.0 + i as f64));
        let m = detect_bearish_pennant(&candles_from_hl(&highs, &lows)).unwrap();
        assert_eq!(m.pattern_data.direction, PatternDirection::Bearish);
    }

    #[test]
    fn flags_need_fifteen_candles() {
        let mut closes: Vec<f64> = (0..7).map(|i| 100.0 + i as f64).collect();
        closes.extend((0..7).map(|i| 106.5 - 0.5 * i as f64));
        assert!(detect_bullish_flag(&candles_from_closes(&closes)).is_none());
    }
}
