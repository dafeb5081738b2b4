use toto_db::models::Draw;

use crate::config::CompatibilityWeighting;
use crate::decay::DecaySchedule;
use crate::history::POOL_SIZE;

/// Score de co-occurrence avec les numéros de base.
///
/// Pour chaque tirage contenant au moins une base, chaque autre numéro non-base
/// du tirage reçoit le poids du tirage une fois par base présente.
/// Sans base, tous les scores sont nuls.
pub fn compatibility_scores(
    window: &[Draw],
    anchors: &[u8],
    schedule: &DecaySchedule,
    weighting: CompatibilityWeighting,
    include_additional: bool,
) -> Vec<f64> {
    let mut scores = vec![0.0f64; POOL_SIZE];
    if anchors.is_empty() {
        return scores;
    }

    for (i, draw) in window.iter().enumerate() {
        let present = anchors
            .iter()
            .filter(|&&a| draw.contains(a, include_additional))
            .count();
        if present == 0 {
            continue;
        }

        let weight = match weighting {
            CompatibilityWeighting::Decayed => schedule.weight(i),
            CompatibilityWeighting::Raw => 1.0,
        };

        for n in draw.values(include_additional).filter(|n| !anchors.contains(n)) {
            scores[(n - 1) as usize] += weight * present as f64;
        }
    }

    scores
}
