use serde::Serialize;
use toto_db::models::Draw;

use crate::error::{EngineError, Result};
use crate::history::validate_anchors;

/// Rang de gain TOTO, du groupe 1 (6 bons numéros) au groupe 7 (3 bons numéros).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PrizeGroup {
    Group1,
    Group2,
    Group3,
    Group4,
    Group5,
    Group6,
    Group7,
}

impl PrizeGroup {
    pub const ALL: [PrizeGroup; 7] = [
        PrizeGroup::Group1,
        PrizeGroup::Group2,
        PrizeGroup::Group3,
        PrizeGroup::Group4,
        PrizeGroup::Group5,
        PrizeGroup::Group6,
        PrizeGroup::Group7,
    ];

    pub fn from_hits(matched: usize, additional_hit: bool) -> Option<Self> {
        match (matched, additional_hit) {
            (6, _) => Some(PrizeGroup::Group1),
            (5, true) => Some(PrizeGroup::Group2),
            (5, false) => Some(PrizeGroup::Group3),
            (4, true) => Some(PrizeGroup::Group4),
            (4, false) => Some(PrizeGroup::Group5),
            (3, true) => Some(PrizeGroup::Group6),
            (3, false) => Some(PrizeGroup::Group7),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for PrizeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "G{}", self.index() + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketCheck {
    pub matched: Vec<u8>,
    pub additional_hit: bool,
    pub group: Option<PrizeGroup>,
}

/// Compare une grille de 6 numéros à un tirage.
pub fn check_ticket(ticket: &[u8], draw: &Draw) -> Result<TicketCheck> {
    if ticket.len() != 6 {
        return Err(EngineError::InvalidInput(format!(
            "une grille contient 6 numéros, {} fournis",
            ticket.len()
        )));
    }
    let ticket = validate_anchors(ticket)?;

    let matched: Vec<u8> = ticket
        .iter()
        .copied()
        .filter(|&n| draw.numbers.contains(&n))
        .collect();
    let additional_hit = ticket.contains(&draw.additional);
    let group = PrizeGroup::from_hits(matched.len(), additional_hit);

    Ok(TicketCheck { matched, additional_hit, group })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw() -> Draw {
        Draw {
            date: "2025-10-30".into(),
            numbers: [1, 5, 31, 34, 38, 45],
            additional: 21,
        }
    }

    #[test]
    fn test_jackpot() {
        let check = check_ticket(&[45, 38, 34, 31, 5, 1], &draw()).unwrap();
        assert_eq!(check.matched, vec![1, 5, 31, 34, 38, 45]);
        assert_eq!(check.group, Some(PrizeGroup::Group1));
    }

    #[test]
    fn test_additional_upgrades_group() {
        let check = check_ticket(&[1, 5, 31, 34, 21, 40], &draw()).unwrap();
        assert_eq!(check.matched.len(), 4);
        assert!(check.additional_hit);
        assert_eq!(check.group, Some(PrizeGroup::Group4));

        let check = check_ticket(&[1, 5, 31, 34, 22, 40], &draw()).unwrap();
        assert_eq!(check.group, Some(PrizeGroup::Group5));
    }

    #[test]
    fn test_no_prize() {
        let check = check_ticket(&[1, 5, 21, 2, 3, 4], &draw()).unwrap();
        assert_eq!(check.matched, vec![1, 5]);
        assert!(check.additional_hit);
        assert_eq!(check.group, None);
    }

    #[test]
    fn test_invalid_ticket() {
        assert!(check_ticket(&[1, 2, 3], &draw()).is_err());
        assert!(check_ticket(&[1, 1, 2, 3, 4, 5], &draw()).is_err());
        assert!(check_ticket(&[1, 2, 3, 4, 5, 50], &draw()).is_err());
    }

    #[test]
    fn test_group_display_and_order() {
        assert_eq!(PrizeGroup::Group1.to_string(), "G1");
        assert_eq!(PrizeGroup::Group7.to_string(), "G7");
        assert!(PrizeGroup::Group1 < PrizeGroup::Group2);
        assert_eq!(PrizeGroup::from_hits(2, true), None);
    }
}
