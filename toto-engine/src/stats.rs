use serde::Serialize;
use toto_db::models::{Draw, NumberStats, MAX_NUMBER};

use crate::temperature;

/// Bornes hautes des tranches basse (1-16) et moyenne (17-33) ; la haute va de 34 à 49.
pub const LOW_MAX: u8 = 16;
pub const MID_MAX: u8 = 33;

/// Répartition bas / moyen / haut. Indicateur seulement, la sélection ne l'utilise pas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RangeMix {
    pub low: usize,
    pub mid: usize,
    pub high: usize,
}

impl RangeMix {
    pub fn of(values: impl IntoIterator<Item = u8>) -> Self {
        let mut mix = Self::default();
        for n in values {
            match n {
                0..=LOW_MAX => mix.low += 1,
                n if n <= MID_MAX => mix.mid += 1,
                _ => mix.high += 1,
            }
        }
        mix
    }

    pub fn total(&self) -> usize {
        self.low + self.mid + self.high
    }

    /// Parts en pourcentage (bas, moyen, haut) ; zéros si vide.
    pub fn shares(&self) -> (f64, f64, f64) {
        let total = self.total();
        if total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let pct = |c: usize| c as f64 * 100.0 / total as f64;
        (pct(self.low), pct(self.mid), pct(self.high))
    }
}

/// Répartition de tous les numéros sortis sur les `window` derniers tirages.
pub fn range_distribution(history: &[Draw], window: usize, include_additional: bool) -> RangeMix {
    RangeMix::of(
        history[..window.min(history.len())]
            .iter()
            .flat_map(|d| d.values(include_additional)),
    )
}

/// Fréquence, écart courant et température de chaque numéro sur les `window` derniers tirages.
///
/// `gap` = nombre de tirages depuis la dernière sortie ; vaut la taille de la
/// fenêtre si le numéro n'y apparaît pas.
pub fn compute_stats(history: &[Draw], window: usize, include_additional: bool) -> Vec<NumberStats> {
    let draws = &history[..window.min(history.len())];
    let readings = temperature::classify(history, draws, include_additional);

    let mut stats: Vec<NumberStats> = (1..=MAX_NUMBER)
        .zip(&readings)
        .map(|(n, reading)| NumberStats {
            number: n,
            frequency: 0,
            gap: draws.len() as u32,
            temperature: reading.temperature,
        })
        .collect();

    let mut seen = vec![false; stats.len()];
    for (i, draw) in draws.iter().enumerate() {
        for n in draw.values(include_additional) {
            let idx = (n - 1) as usize;
            stats[idx].frequency += 1;
            if !seen[idx] {
                seen[idx] = true;
                stats[idx].gap = i as u32;
            }
        }
    }

    stats
}
