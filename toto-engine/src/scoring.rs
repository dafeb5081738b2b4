use std::cmp::Ordering;

use serde::Serialize;
use toto_db::models::Temperature;

use crate::decay::DecayRegime;
use crate::temperature::{bonus, TemperatureReading};

// Mélange fréquence / compatibilité par régime.
const RECENT_BLEND: (f64, f64) = (1.5, 0.3);
const SIGMOID_BLEND: (f64, f64) = (0.8, 1.2);
const BLOCKS_BLEND: (f64, f64) = (1.0, 1.0);

// Bonus de motif du régime par blocs.
const PATTERN_FREQUENCY_THRESHOLD: f64 = 2.0;
const PATTERN_FREQUENCY_BONUS: f64 = 0.5;
const PATTERN_COMPAT_THRESHOLD: f64 = 1.5;
const PATTERN_COMPAT_BONUS: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueScore {
    pub value: u8,
    pub frequency_score: f64,
    pub compatibility_score: f64,
    pub temperature: Temperature,
    pub composite_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub number: u8,
    pub score: f64,
}

pub fn composite(
    regime: DecayRegime,
    frequency: f64,
    compatibility: f64,
    temperature_bonus: f64,
) -> f64 {
    let blended = match regime {
        DecayRegime::Recent => frequency * RECENT_BLEND.0 + compatibility * RECENT_BLEND.1,
        DecayRegime::Sigmoid => frequency * SIGMOID_BLEND.0 + compatibility * SIGMOID_BLEND.1,
        DecayRegime::Blocks => {
            let mut pattern = 0.0;
            if frequency > PATTERN_FREQUENCY_THRESHOLD {
                pattern += PATTERN_FREQUENCY_BONUS;
            }
            if compatibility > PATTERN_COMPAT_THRESHOLD {
                pattern += PATTERN_COMPAT_BONUS;
            }
            frequency * BLOCKS_BLEND.0 + compatibility * BLOCKS_BLEND.1 + pattern
        }
    };
    blended + temperature_bonus
}

/// Assemble les scores des 49 numéros (index = numéro - 1).
/// Sans classement de température, le bonus est nul.
pub fn score_values(
    regime: DecayRegime,
    frequency: &[f64],
    compatibility: &[f64],
    readings: &[TemperatureReading],
    use_temperature: bool,
) -> Vec<ValueScore> {
    frequency
        .iter()
        .zip(compatibility)
        .zip(readings)
        .enumerate()
        .map(|(idx, ((&f, &c), reading))| {
            let temperature_bonus = if use_temperature { bonus(reading.temperature) } else { 0.0 };
            ValueScore {
                value: (idx + 1) as u8,
                frequency_score: f,
                compatibility_score: c,
                temperature: reading.temperature,
                composite_score: composite(regime, f, c, temperature_bonus),
            }
        })
        .collect()
}

/// Score décroissant, puis numéro croissant en cas d'égalité.
pub fn by_rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.score.total_cmp(&a.score).then(a.number.cmp(&b.number))
}

/// Classe les numéros hors bases.
pub fn rank_candidates(scores: &[ValueScore], anchors: &[u8]) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = scores
        .iter()
        .filter(|s| !anchors.contains(&s.value))
        .map(|s| Candidate { number: s.value, score: s.composite_score })
        .collect();
    ranked.sort_by(by_rank);
    ranked
}
