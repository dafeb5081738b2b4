use serde::Serialize;
use toto_db::models::{Draw, Temperature};

use crate::history::{occurrences, POOL_SIZE};

const RECENT_SHARE: f64 = 0.3;
const MIN_RECENT: usize = 10;
const MAX_RECENT: usize = 30;

/// Tirages examinés pour la série chaude / l'absence froide, indépendamment de la fenêtre.
pub const STREAK_DRAWS: usize = 10;
const STREAK_HOT_COUNT: u32 = 3;
const HOT_RATIO: f64 = 1.5;
const HOT_MIN_RATE: f64 = 0.10;
const RATIO_WITHOUT_BASELINE: f64 = 10.0;

const BONUS_SCALE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureReading {
    pub temperature: Temperature,
    pub recent_count: u32,
    pub recent_rate: f64,
    pub historical_rate: f64,
    pub hot_ratio: f64,
    pub streak_count: u32,
}

/// Taille de la sous-fenêtre récente : 30 % de la fenêtre, bornée à [10, 30].
pub fn recent_span(window: usize) -> usize {
    ((window as f64 * RECENT_SHARE).round() as usize).clamp(MIN_RECENT, MAX_RECENT)
}

pub fn bonus(temperature: Temperature) -> f64 {
    match temperature {
        Temperature::Hot => BONUS_SCALE * 0.3,
        Temperature::Cold => BONUS_SCALE * 0.7,
        Temperature::Neutral => BONUS_SCALE * 0.1,
    }
}

/// Classe chaque numéro (index = numéro - 1).
///
/// `window` sert aux taux récent / historique, `history` complet aux
/// 10 derniers tirages.
pub fn classify(history: &[Draw], window: &[Draw], include_additional: bool) -> Vec<TemperatureReading> {
    let split = recent_span(window.len()).min(window.len());
    let (recent, rest) = window.split_at(split);
    let streak = &history[..STREAK_DRAWS.min(history.len())];

    let recent_counts = occurrences(recent, include_additional);
    let rest_counts = occurrences(rest, include_additional);
    let streak_counts = occurrences(streak, include_additional);

    (0..POOL_SIZE)
        .map(|idx| {
            let recent_count = recent_counts[idx];
            let recent_rate = rate(recent_count, recent.len());
            let historical_rate = rate(rest_counts[idx], rest.len());
            let hot_ratio = if historical_rate > 0.0 {
                recent_rate / historical_rate
            } else if recent_count > 0 {
                RATIO_WITHOUT_BASELINE
            } else {
                0.0
            };

            let streak_count = streak_counts[idx];
            let temperature = if streak_count >= STREAK_HOT_COUNT
                || (hot_ratio > HOT_RATIO && recent_rate > HOT_MIN_RATE)
            {
                Temperature::Hot
            } else if streak_count == 0 {
                Temperature::Cold
            } else {
                Temperature::Neutral
            };

            TemperatureReading {
                temperature,
                recent_count,
                recent_rate,
                historical_rate,
                hot_ratio,
                streak_count,
            }
        })
        .collect()
}

fn rate(count: u32, draws: usize) -> f64 {
    if draws == 0 {
        0.0
    } else {
        count as f64 / draws as f64
    }
}
