use toto_db::models::Draw;

use crate::decay::DecaySchedule;
use crate::history::POOL_SIZE;

/// Score de fréquence pondéré par l'ancienneté.
/// `window` doit déjà être tronqué à la fenêtre (draws[0] = le plus récent).
pub fn frequency_scores(window: &[Draw], schedule: &DecaySchedule, include_additional: bool) -> Vec<f64> {
    let mut scores = vec![0.0f64; POOL_SIZE];

    for (i, draw) in window.iter().enumerate() {
        let weight = schedule.weight(i);
        for n in draw.values(include_additional) {
            scores[(n - 1) as usize] += weight + schedule.positional_bonus(i, n);
        }
    }

    scores
}
