use std::collections::BTreeMap;

use serde::Serialize;
use toto_db::models::{Draw, PICK_COUNT};
use tracing::debug;

use crate::cold::{cold_numbers, filter_cold};
use crate::compatibility::compatibility_scores;
use crate::config::EngineConfig;
use crate::decay::{DecayRegime, DecaySchedule};
use crate::error::{EngineError, Result};
use crate::frequency::frequency_scores;
use crate::history::{validate_anchors, DrawHistory, POOL_SIZE};
use crate::scoring::{rank_candidates, score_values, ValueScore};
use crate::selector::{Pick, TierPlan, TieredSelector};
use crate::stats::RangeMix;
use crate::temperature;

/// Grille prédite et détail des scores des 49 numéros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// 6 numéros distincts, triés.
    pub values: [u8; PICK_COUNT],
    /// Fenêtre réellement analysée.
    pub window: usize,
    pub regime: DecayRegime,
    pub anchors: Vec<u8>,
    pub picks: Vec<Pick>,
    pub scores: BTreeMap<u8, ValueScore>,
    /// Numéros froids au moment de la prédiction.
    pub cold: Vec<u8>,
    /// Répartition bas / moyen / haut de `values`.
    pub range_mix: RangeMix,
}

/// Prédit une grille à partir de l'historique (le plus récent en premier).
///
/// Fonction pure : mêmes entrées, même résultat.
pub fn predict(draws: &[Draw], anchors: &[u8], config: &EngineConfig) -> Result<PredictionResult> {
    config.validate()?;
    let history = DrawHistory::new(draws)?;
    let anchors = validate_anchors(anchors)?;

    let window_len = config.effective_window(history.len());
    let window = history.recent(window_len);
    let schedule = DecaySchedule::new(window_len, config.decay);
    let regime = schedule.regime();
    debug!(window = window_len, available = history.len(), %regime, "fenêtre d'analyse");

    let frequency = frequency_scores(window, &schedule, config.include_additional);
    let compatibility = if config.compatibility {
        compatibility_scores(
            window,
            &anchors,
            &schedule,
            config.compatibility_weighting,
            config.include_additional,
        )
    } else {
        vec![0.0; POOL_SIZE]
    };
    let readings = temperature::classify(history.draws(), window, config.include_additional);
    let scores = score_values(regime, &frequency, &compatibility, &readings, config.temperature);

    let ranked = rank_candidates(&scores, &anchors);
    let cold = cold_numbers(history.draws(), config.cold_lookback, config.include_additional);
    let filtered = filter_cold(&ranked, &cold, config.max_cold_allowed);
    debug!(
        ranked = ranked.len(),
        cold = cold.len(),
        kept = filtered.len(),
        "filtre des numéros froids"
    );

    let picks = TieredSelector::new(TierPlan::for_regime(regime), &filtered, &ranked, &anchors).run();
    let needed = PICK_COUNT - anchors.len();
    if picks.len() != needed {
        return Err(EngineError::SelectionUnderflow { needed, picked: picks.len() });
    }

    let mut values = [0u8; PICK_COUNT];
    for (slot, n) in values
        .iter_mut()
        .zip(anchors.iter().copied().chain(picks.iter().map(|p| p.number)))
    {
        *slot = n;
    }
    values.sort();

    Ok(PredictionResult {
        values,
        window: window_len,
        regime,
        anchors,
        picks,
        scores: scores.into_iter().map(|s| (s.value, s)).collect(),
        cold,
        range_mix: RangeMix::of(values),
    })
}
