use toto_db::models::{validate_draw, validate_number, Draw, MAX_NUMBER, PICK_COUNT};

use crate::error::{EngineError, Result};

/// Nombre de numéros tirables, taille des vecteurs de score.
pub const POOL_SIZE: usize = MAX_NUMBER as usize;

/// Vue immuable sur l'historique. draws[0] = tirage le plus récent.
#[derive(Debug, Clone, Copy)]
pub struct DrawHistory<'a> {
    draws: &'a [Draw],
}

impl<'a> DrawHistory<'a> {
    /// Vérifie chaque tirage avant toute analyse.
    pub fn new(draws: &'a [Draw]) -> Result<Self> {
        for (i, draw) in draws.iter().enumerate() {
            validate_draw(&draw.numbers, draw.additional).map_err(|e| {
                EngineError::InvalidInput(format!("tirage #{} ({}) : {}", i, draw.date, e))
            })?;
        }
        Ok(Self { draws })
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn draws(&self) -> &'a [Draw] {
        self.draws
    }

    /// Les `n` tirages les plus récents, borné à l'historique disponible.
    pub fn recent(&self, n: usize) -> &'a [Draw] {
        &self.draws[..n.min(self.draws.len())]
    }
}

/// Numéros de base : au plus 6, distincts, dans 1-49. Retourne une copie triée.
pub fn validate_anchors(anchors: &[u8]) -> Result<Vec<u8>> {
    if anchors.len() > PICK_COUNT {
        return Err(EngineError::InvalidInput(format!(
            "{} numéros de base fournis (maximum {})",
            anchors.len(),
            PICK_COUNT
        )));
    }
    let mut sorted = anchors.to_vec();
    sorted.sort();
    for &a in &sorted {
        validate_number(a).map_err(|e| EngineError::InvalidInput(e.to_string()))?;
    }
    if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(EngineError::InvalidInput(format!(
            "numéro de base en double : {}",
            pair[0]
        )));
    }
    Ok(sorted)
}

/// Compte les apparitions de chaque numéro (index = numéro - 1).
pub fn occurrences(draws: &[Draw], include_additional: bool) -> Vec<u32> {
    let mut counts = vec![0u32; POOL_SIZE];
    for draw in draws {
        for n in draw.values(include_additional) {
            counts[(n - 1) as usize] += 1;
        }
    }
    counts
}

/// Historique synthétique déterministe et valide, le plus récent en premier.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i * 7) % POOL_SIZE;
            let mut numbers = [0u8; 6];
            for (k, slot) in numbers.iter_mut().enumerate() {
                *slot = ((base + k * 8) % POOL_SIZE + 1) as u8;
            }
            Draw {
                date: format!("{:04}-{:02}-{:02}", 2025 - i / 336, 12 - (i / 28) % 12, 28 - i % 28),
                numbers,
                additional: ((base + 44) % POOL_SIZE + 1) as u8,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_test_draws_valid() {
        let draws = make_test_draws(200);
        assert!(DrawHistory::new(&draws).is_ok());
    }

    #[test]
    fn test_invalid_record_rejected() {
        let mut draws = make_test_draws(5);
        draws[3].additional = draws[3].numbers[0];
        let err = DrawHistory::new(&draws).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        let mut draws = make_test_draws(5);
        draws[0].numbers[2] = 50;
        assert!(DrawHistory::new(&draws).is_err());
    }

    #[test]
    fn test_recent_clamps() {
        let draws = make_test_draws(12);
        let history = DrawHistory::new(&draws).unwrap();
        assert_eq!(history.recent(5).len(), 5);
        assert_eq!(history.recent(10_000).len(), 12);
        assert_eq!(history.recent(0).len(), 0);
    }

    #[test]
    fn test_validate_anchors() {
        assert_eq!(validate_anchors(&[]).unwrap(), Vec::<u8>::new());
        assert_eq!(validate_anchors(&[22, 10, 16]).unwrap(), vec![10, 16, 22]);
        assert!(validate_anchors(&[1, 2, 3, 4, 5, 6]).is_ok());
        assert!(validate_anchors(&[1, 2, 3, 4, 5, 6, 7]).is_err());
        assert!(validate_anchors(&[0]).is_err());
        assert!(validate_anchors(&[50]).is_err());
        assert!(validate_anchors(&[10, 10]).is_err());
    }

    #[test]
    fn test_occurrences() {
        let draws = vec![
            Draw { date: "2025-10-31".into(), numbers: [1, 5, 31, 34, 38, 45], additional: 21 },
            Draw { date: "2025-10-24".into(), numbers: [8, 17, 23, 29, 35, 45], additional: 1 },
        ];
        let counts = occurrences(&draws, false);
        assert_eq!(counts[44], 2);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[20], 0);

        let counts = occurrences(&draws, true);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[20], 1);
    }
}
