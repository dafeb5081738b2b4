use serde::{Deserialize, Serialize};

use crate::config::DecayShape;

/// Fenêtre maximale du régime « récent ».
pub const RECENT_MAX_WINDOW: usize = 10;
/// Fenêtre maximale du régime sigmoïde ; au-delà, régime par blocs.
pub const SIGMOID_MAX_WINDOW: usize = 30;

const RECENT_SCALE: f64 = 2.0;
const RECENT_FACTOR: f64 = 0.98;
const SIGMOID_CENTER: f64 = 0.3;
const SIGMOID_STEEPNESS: f64 = 10.0;

pub const BLOCK_WEIGHTS: [f64; 4] = [2.0, 1.5, 1.0, 0.6];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayRegime {
    Recent,
    Sigmoid,
    Blocks,
}

impl DecayRegime {
    /// Seuils durs sur la taille de la fenêtre.
    pub fn for_window(window: usize) -> Self {
        if window <= RECENT_MAX_WINDOW {
            DecayRegime::Recent
        } else if window <= SIGMOID_MAX_WINDOW {
            DecayRegime::Sigmoid
        } else {
            DecayRegime::Blocks
        }
    }
}

impl std::fmt::Display for DecayRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecayRegime::Recent => write!(f, "récent (0.98^i)"),
            DecayRegime::Sigmoid => write!(f, "sigmoïde"),
            DecayRegime::Blocks => write!(f, "4 blocs"),
        }
    }
}

/// Poids de décroissance par position (0 = tirage le plus récent) pour une fenêtre donnée.
#[derive(Debug, Clone, Copy)]
pub struct DecaySchedule {
    regime: DecayRegime,
    window: usize,
    block_size: usize,
}

impl DecaySchedule {
    pub fn new(window: usize, shape: DecayShape) -> Self {
        let regime = match shape {
            DecayShape::Auto => DecayRegime::for_window(window),
            DecayShape::Recent => DecayRegime::Recent,
            DecayShape::Sigmoid => DecayRegime::Sigmoid,
            DecayShape::Blocks => DecayRegime::Blocks,
        };
        Self {
            regime,
            window,
            block_size: (window / BLOCK_WEIGHTS.len()).max(1),
        }
    }

    pub fn regime(&self) -> DecayRegime {
        self.regime
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// (bloc, index local) ; None pour les tirages de queue qui ne tombent dans aucun bloc.
    pub fn block_of(&self, i: usize) -> Option<(usize, usize)> {
        let block = i / self.block_size;
        (block < BLOCK_WEIGHTS.len()).then_some((block, i % self.block_size))
    }

    pub fn weight(&self, i: usize) -> f64 {
        match self.regime {
            DecayRegime::Recent => RECENT_SCALE * RECENT_FACTOR.powi(i as i32),
            DecayRegime::Sigmoid => {
                let span = self.window.saturating_sub(1).max(1) as f64;
                let position = i as f64 / span;
                1.0 / (1.0 + ((position - SIGMOID_CENTER) * SIGMOID_STEEPNESS).exp())
            }
            DecayRegime::Blocks => match self.block_of(i) {
                Some((block, local)) => BLOCK_WEIGHTS[block] / (local + 1) as f64,
                None => 0.0,
            },
        }
    }

    /// Bonus de position du régime par blocs, ajouté à chaque apparition.
    pub fn positional_bonus(&self, i: usize, number: u8) -> f64 {
        if self.regime != DecayRegime::Blocks {
            return 0.0;
        }
        match self.block_of(i) {
            Some((0, _)) if number >= 30 => 0.3,
            Some((1, _)) if (20..=35).contains(&number) => 0.2,
            Some((2 | 3, _)) if number <= 25 => 0.1,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_thresholds() {
        assert_eq!(DecayRegime::for_window(0), DecayRegime::Recent);
        assert_eq!(DecayRegime::for_window(10), DecayRegime::Recent);
        assert_eq!(DecayRegime::for_window(11), DecayRegime::Sigmoid);
        assert_eq!(DecayRegime::for_window(30), DecayRegime::Sigmoid);
        assert_eq!(DecayRegime::for_window(31), DecayRegime::Blocks);
        assert_eq!(DecayRegime::for_window(100), DecayRegime::Blocks);
    }

    #[test]
    fn test_recent_strictly_decreasing() {
        for window in 1..=10 {
            let schedule = DecaySchedule::new(window, DecayShape::Auto);
            for i in 1..10 {
                assert!(schedule.weight(i - 1) > schedule.weight(i), "w={} i={}", window, i);
            }
        }
        let schedule = DecaySchedule::new(10, DecayShape::Auto);
        assert!((schedule.weight(0) - 2.0).abs() < 1e-12);
        assert!((schedule.weight(1) - 1.96).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_centered_at_thirty_percent() {
        let schedule = DecaySchedule::new(21, DecayShape::Auto);
        assert_eq!(schedule.regime(), DecayRegime::Sigmoid);
        // i / 20 = 0.3 => poids 0.5
        assert!((schedule.weight(6) - 0.5).abs() < 1e-12);
        assert!(schedule.weight(0) > 0.95);
        assert!(schedule.weight(20) < 0.001);
    }

    #[test]
    fn test_blocks_weights_and_tail() {
        let schedule = DecaySchedule::new(50, DecayShape::Auto);
        assert_eq!(schedule.regime(), DecayRegime::Blocks);
        // 50 / 4 = 12 tirages par bloc
        assert!((schedule.weight(0) - 2.0).abs() < 1e-12);
        assert!((schedule.weight(1) - 1.0).abs() < 1e-12);
        assert!((schedule.weight(12) - 1.5).abs() < 1e-12);
        assert!((schedule.weight(24) - 1.0).abs() < 1e-12);
        assert!((schedule.weight(36) - 0.6).abs() < 1e-12);
        assert_eq!(schedule.block_of(48), None);
        assert_eq!(schedule.weight(49), 0.0);
    }

    #[test]
    fn test_positional_bonus() {
        let schedule = DecaySchedule::new(40, DecayShape::Auto);
        assert_eq!(schedule.positional_bonus(0, 30), 0.3);
        assert_eq!(schedule.positional_bonus(0, 29), 0.0);
        assert_eq!(schedule.positional_bonus(10, 20), 0.2);
        assert_eq!(schedule.positional_bonus(10, 36), 0.0);
        assert_eq!(schedule.positional_bonus(25, 25), 0.1);
        assert_eq!(schedule.positional_bonus(35, 1), 0.1);
        assert_eq!(schedule.positional_bonus(35, 26), 0.0);

        let recent = DecaySchedule::new(5, DecayShape::Auto);
        assert_eq!(recent.positional_bonus(0, 40), 0.0);
    }

    #[test]
    fn test_forced_shape_overrides_threshold() {
        let schedule = DecaySchedule::new(100, DecayShape::Recent);
        assert_eq!(schedule.regime(), DecayRegime::Recent);
        let schedule = DecaySchedule::new(1, DecayShape::Sigmoid);
        assert!(schedule.weight(0).is_finite());
    }
}
