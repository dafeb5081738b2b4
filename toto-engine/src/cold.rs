use toto_db::models::{Draw, MAX_NUMBER};
use tracing::debug;

use crate::history::occurrences;
use crate::scoring::Candidate;

/// Numéros absents des `lookback` derniers tirages, triés.
pub fn cold_numbers(history: &[Draw], lookback: usize, include_additional: bool) -> Vec<u8> {
    let recent = &history[..lookback.min(history.len())];
    let counts = occurrences(recent, include_additional);
    (1..=MAX_NUMBER)
        .filter(|&n| counts[(n - 1) as usize] == 0)
        .collect()
}

/// Laisse passer au plus `max_cold_allowed` numéros froids, dans l'ordre du classement.
/// Les suivants sont retirés ; l'ordre relatif est conservé.
pub fn filter_cold(ranked: &[Candidate], cold: &[u8], max_cold_allowed: usize) -> Vec<Candidate> {
    let mut kept = Vec::with_capacity(ranked.len());
    let mut cold_kept = 0usize;

    for candidate in ranked {
        if cold.binary_search(&candidate.number).is_ok() {
            if cold_kept < max_cold_allowed {
                kept.push(*candidate);
                cold_kept += 1;
            } else {
                debug!(number = candidate.number, "numéro froid écarté");
            }
        } else {
            kept.push(*candidate);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(numbers: [u8; 6], additional: u8) -> Draw {
        Draw { date: "2025-10-31".into(), numbers, additional }
    }

    fn ranked(numbers: &[u8]) -> Vec<Candidate> {
        numbers
            .iter()
            .enumerate()
            .map(|(i, &number)| Candidate { number, score: 10.0 - i as f64 })
            .collect()
    }

    #[test]
    fn test_cold_numbers_lookback() {
        let mut history = vec![draw([1, 2, 3, 4, 5, 6], 7); 20];
        history.push(draw([10, 11, 12, 13, 14, 15], 16));

        let cold = cold_numbers(&history, 20, false);
        assert!(!cold.contains(&1));
        assert!(cold.contains(&7));
        assert!(cold.contains(&10));
        assert_eq!(cold.len(), 43);

        let cold = cold_numbers(&history, 20, true);
        assert!(!cold.contains(&7));

        // lookback plus long que l'historique
        let cold = cold_numbers(&history, 100, false);
        assert!(!cold.contains(&10));
    }

    #[test]
    fn test_cold_numbers_empty_history() {
        assert_eq!(cold_numbers(&[], 20, false).len(), 49);
    }

    #[test]
    fn test_filter_keeps_first_cold_only() {
        let candidates = ranked(&[8, 30, 12, 41, 3, 44]);
        let cold = vec![12, 41, 44];
        let kept = filter_cold(&candidates, &cold, 1);
        let numbers: Vec<u8> = kept.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![8, 30, 12, 3]);
    }

    #[test]
    fn test_filter_zero_allowed() {
        let candidates = ranked(&[8, 30, 12, 41, 3]);
        let kept = filter_cold(&candidates, &[12, 41], 0);
        let numbers: Vec<u8> = kept.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![8, 30, 3]);
    }

    #[test]
    fn test_filter_no_cold_passthrough() {
        let candidates = ranked(&[5, 4, 3]);
        assert_eq!(filter_cold(&candidates, &[], 1), candidates);
    }
}
