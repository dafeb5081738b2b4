use serde::Serialize;
use toto_db::models::Draw;

use crate::check::{check_ticket, PrizeGroup, TicketCheck};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::predict::predict;

/// Historique minimal avant un tirage test.
pub const MIN_TRAINING_DRAWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestCase {
    pub date: String,
    pub predicted: [u8; 6],
    pub check: TicketCheck,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BacktestReport {
    pub tests: usize,
    /// hits[k] = nombre de tirages avec k bons numéros.
    pub hits: [usize; 7],
    pub additional_hits: usize,
    /// Gains par groupe, G1 en premier.
    pub prizes: [usize; 7],
}

impl BacktestReport {
    pub fn record(&mut self, case: &BacktestCase) {
        self.tests += 1;
        self.hits[case.check.matched.len()] += 1;
        if case.check.additional_hit {
            self.additional_hits += 1;
        }
        if let Some(group) = case.check.group {
            self.prizes[group.index()] += 1;
        }
    }

    pub fn average_hits(&self) -> f64 {
        if self.tests == 0 {
            return 0.0;
        }
        let total: usize = self.hits.iter().enumerate().map(|(k, &c)| k * c).sum();
        total as f64 / self.tests as f64
    }

    pub fn prize_count(&self, group: PrizeGroup) -> usize {
        self.prizes[group.index()]
    }

    pub fn winning_tests(&self) -> usize {
        self.prizes.iter().sum()
    }
}

/// Indices des tirages testables, du plus récent au plus ancien, au plus `max_tests`.
pub fn test_points(draws: &[Draw], max_tests: usize) -> std::ops::Range<usize> {
    let testable = draws.len().saturating_sub(MIN_TRAINING_DRAWS);
    0..testable.min(max_tests)
}

/// Prédit le tirage `t` à partir des seuls tirages strictement antérieurs.
///
/// draws[0] = le plus récent : l'historique d'entraînement est draws[t+1..].
pub fn evaluate_case(
    draws: &[Draw],
    t: usize,
    anchors: &[u8],
    config: &EngineConfig,
) -> Result<BacktestCase> {
    let target = &draws[t];
    let prediction = predict(&draws[t + 1..], anchors, config)?;
    let check = check_ticket(&prediction.values, target)?;
    Ok(BacktestCase {
        date: target.date.clone(),
        predicted: prediction.values,
        check,
    })
}

pub fn run_backtest(
    draws: &[Draw],
    anchors: &[u8],
    config: &EngineConfig,
    max_tests: usize,
) -> Result<BacktestReport> {
    let mut report = BacktestReport::default();
    for t in test_points(draws, max_tests) {
        let case = evaluate_case(draws, t, anchors, config)?;
        report.record(&case);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::make_test_draws;

    #[test]
    fn test_points_leave_training_history() {
        let draws = make_test_draws(30);
        assert_eq!(test_points(&draws, 100), 0..20);
        assert_eq!(test_points(&draws, 5), 0..5);
        assert!(test_points(&make_test_draws(8), 100).is_empty());
    }

    #[test]
    fn test_no_future_leak() {
        // Modifier les tirages plus récents que t ne change pas la prédiction de t
        let draws = make_test_draws(80);
        let config = EngineConfig::default();
        let before = evaluate_case(&draws, 5, &[], &config).unwrap();

        let mut altered = draws.clone();
        for d in altered.iter_mut().take(5) {
            d.numbers = [1, 2, 3, 4, 5, 6];
            d.additional = 7;
        }
        let after = evaluate_case(&altered, 5, &[], &config).unwrap();
        assert_eq!(before.predicted, after.predicted);
    }

    #[test]
    fn test_report_counts() {
        let draws = make_test_draws(60);
        let report = run_backtest(&draws, &[], &EngineConfig::with_window(20), 25).unwrap();
        assert_eq!(report.tests, 25);
        assert_eq!(report.hits.iter().sum::<usize>(), 25);
        assert!(report.average_hits() >= 0.0 && report.average_hits() <= 6.0);
        assert!(report.winning_tests() <= report.tests);
    }

    #[test]
    fn test_record_prize() {
        let mut report = BacktestReport::default();
        let case = BacktestCase {
            date: "2025-10-30".into(),
            predicted: [1, 5, 31, 34, 21, 40],
            check: TicketCheck {
                matched: vec![1, 5, 31, 34],
                additional_hit: true,
                group: Some(PrizeGroup::Group4),
            },
        };
        report.record(&case);
        assert_eq!(report.hits[4], 1);
        assert_eq!(report.additional_hits, 1);
        assert_eq!(report.prize_count(PrizeGroup::Group4), 1);
        assert!((report.average_hits() - 4.0).abs() < 1e-12);
    }
}
