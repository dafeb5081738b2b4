use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Plus grand numéro tirable (1-49).
pub const MAX_NUMBER: u8 = 49;

/// Nombre de numéros principaux par tirage, et taille d'une grille.
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    /// Date ISO (YYYY-MM-DD)
    pub date: String,
    pub numbers: [u8; 6],
    pub additional: u8,
}

impl Draw {
    /// Numéros du tirage, avec le complémentaire en dernier si demandé.
    pub fn values(&self, include_additional: bool) -> impl Iterator<Item = u8> + '_ {
        self.numbers
            .iter()
            .copied()
            .chain(include_additional.then_some(self.additional))
    }

    pub fn contains(&self, number: u8, include_additional: bool) -> bool {
        self.numbers.contains(&number) || (include_additional && self.additional == number)
    }

    pub fn sorted_numbers(&self) -> [u8; 6] {
        let mut sorted = self.numbers;
        sorted.sort();
        sorted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Temperature {
    Hot,
    Cold,
    Neutral,
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Temperature::Hot => write!(f, "HOT"),
            Temperature::Cold => write!(f, "COLD"),
            Temperature::Neutral => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
    pub temperature: Temperature,
}

pub fn validate_number(n: u8) -> Result<()> {
    if n < 1 || n > MAX_NUMBER {
        bail!("Numéro {} hors limites (1-{})", n, MAX_NUMBER);
    }
    Ok(())
}

pub fn validate_draw(numbers: &[u8; 6], additional: u8) -> Result<()> {
    for &n in numbers {
        validate_number(n)?;
    }
    validate_number(additional)
        .map_err(|_| anyhow::anyhow!("Complémentaire {} hors limites (1-{})", additional, MAX_NUMBER))?;
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    if numbers.contains(&additional) {
        bail!("Le complémentaire {} figure déjà parmi les numéros", additional);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(numbers: [u8; 6], additional: u8) -> Draw {
        Draw {
            date: "2025-10-30".to_string(),
            numbers,
            additional,
        }
    }

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 7).is_ok());
        assert!(validate_draw(&[49, 48, 47, 46, 45, 44], 1).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 50], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 50).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 0).is_err());
    }

    #[test]
    fn test_validate_draw_duplicates() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6], 7).is_err());
    }

    #[test]
    fn test_validate_draw_additional_among_numbers() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 6).is_err());
    }

    #[test]
    fn test_values_with_and_without_additional() {
        let d = draw([8, 17, 23, 29, 35, 42], 15);
        assert_eq!(d.values(false).collect::<Vec<_>>(), vec![8, 17, 23, 29, 35, 42]);
        assert_eq!(d.values(true).collect::<Vec<_>>(), vec![8, 17, 23, 29, 35, 42, 15]);
        assert!(d.contains(15, true));
        assert!(!d.contains(15, false));
    }

    #[test]
    fn test_sorted_numbers() {
        let d = draw([42, 8, 35, 17, 29, 23], 15);
        assert_eq!(d.sorted_numbers(), [8, 17, 23, 29, 35, 42]);
    }

    #[test]
    fn test_temperature_display() {
        assert_eq!(Temperature::Hot.to_string(), "HOT");
        assert_eq!(Temperature::Cold.to_string(), "COLD");
        assert_eq!(Temperature::Neutral.to_string(), "-");
    }
}
