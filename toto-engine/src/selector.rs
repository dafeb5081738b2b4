//! Sélection par paliers.
//!
//! Les candidats filtrés sont découpés en quatre paliers selon leur rang
//! (TIER1 → TIER2 → TIER3 → REMAINDER). Chaque palier fournit au plus son
//! quota de numéros, sous contraintes de parité et d'écart. Si les paliers
//! sont épuisés avant d'atteindre 6 numéros, les candidats filtrés restants
//! sont repris sous la seule contrainte de parité, puis le classement complet
//! (au-delà du plafond de froids), parité toujours imposée. Les contraintes ne
//! sont entièrement levées qu'en dernier recours.

use std::ops::Range;

use serde::Serialize;
use toto_db::models::PICK_COUNT;
use tracing::{debug, warn};

use crate::decay::DecayRegime;
use crate::scoring::Candidate;

const TIER2_SHARE: f64 = 0.35;
const TIER3_SHARE: f64 = 0.30;

/// Plafond pair / impair, relevé à 4 pour les deux dernières places.
const PARITY_CAP: usize = 3;
const PARITY_CAP_LAST_SLOTS: usize = 4;
const LAST_SLOTS: usize = 2;

const MIN_SPACING: u8 = 2;
/// L'écart minimal n'est imposé que tant qu'il reste au moins 4 places.
const SPACING_MIN_REMAINING: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
    Remainder,
    /// Complément pris dans le classement complet, au-delà du filtre des froids.
    Relaxed,
}

impl Tier {
    const ORDERED: [Tier; 4] = [Tier::Tier1, Tier::Tier2, Tier::Tier3, Tier::Remainder];

    fn next(self) -> Option<Tier> {
        match self {
            Tier::Tier1 => Some(Tier::Tier2),
            Tier::Tier2 => Some(Tier::Tier3),
            Tier::Tier3 => Some(Tier::Remainder),
            Tier::Remainder | Tier::Relaxed => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Tier1 => write!(f, "T1"),
            Tier::Tier2 => write!(f, "T2"),
            Tier::Tier3 => write!(f, "T3"),
            Tier::Remainder => write!(f, "reste"),
            Tier::Relaxed => write!(f, "complément"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pick {
    pub number: u8,
    pub tier: Tier,
}

/// Quotas et contraintes propres à chaque régime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierPlan {
    pub tier1_share: f64,
    pub tier1_target: usize,
    pub tier2_target: usize,
    pub spacing: bool,
}

impl TierPlan {
    pub fn for_regime(regime: DecayRegime) -> Self {
        match regime {
            DecayRegime::Recent => Self { tier1_share: 0.20, tier1_target: 2, tier2_target: 3, spacing: false },
            DecayRegime::Sigmoid => Self { tier1_share: 0.20, tier1_target: 2, tier2_target: 2, spacing: true },
            DecayRegime::Blocks => Self { tier1_share: 0.15, tier1_target: 2, tier2_target: 1, spacing: false },
        }
    }

    fn target(&self, tier: Tier) -> usize {
        match tier {
            Tier::Tier1 => self.tier1_target,
            Tier::Tier2 => self.tier2_target,
            Tier::Tier3 | Tier::Remainder | Tier::Relaxed => usize::MAX,
        }
    }
}

/// Bornes des quatre paliers. Une égalité de score n'est jamais coupée par une frontière.
pub fn tier_bounds(candidates: &[Candidate], tier1_share: f64) -> [Range<usize>; 4] {
    let n = candidates.len();
    let size = |share: f64| ((n as f64 * share).floor() as usize).max(1);

    let cut1 = extend_ties(candidates, size(tier1_share).min(n));
    let cut2 = extend_ties(candidates, (cut1 + size(TIER2_SHARE)).min(n));
    let cut3 = extend_ties(candidates, (cut2 + size(TIER3_SHARE)).min(n));

    [0..cut1, cut1..cut2, cut2..cut3, cut3..n]
}

fn extend_ties(candidates: &[Candidate], mut cut: usize) -> usize {
    while cut > 0 && cut < candidates.len() && candidates[cut].score == candidates[cut - 1].score {
        cut += 1;
    }
    cut
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Scanning(Tier),
    /// Reprise de tous les candidats filtrés restants, parité seule.
    Sweep,
    Relaxed,
    Done,
}

pub struct TieredSelector<'a> {
    plan: TierPlan,
    filtered: &'a [Candidate],
    ranked: &'a [Candidate],
    anchors: &'a [u8],
    bounds: [Range<usize>; 4],
    picks: Vec<Pick>,
    even: usize,
    odd: usize,
    state: State,
}

impl<'a> TieredSelector<'a> {
    /// `filtered` : candidats après filtre des froids ; `ranked` : classement complet,
    /// utilisé seulement en dernier recours.
    pub fn new(plan: TierPlan, filtered: &'a [Candidate], ranked: &'a [Candidate], anchors: &'a [u8]) -> Self {
        let even = anchors.iter().filter(|&&a| a % 2 == 0).count();
        Self {
            plan,
            filtered,
            ranked,
            anchors,
            bounds: tier_bounds(filtered, plan.tier1_share),
            picks: Vec::with_capacity(PICK_COUNT),
            even,
            odd: anchors.len() - even,
            state: State::Scanning(Tier::Tier1),
        }
    }

    pub fn run(mut self) -> Vec<Pick> {
        loop {
            self.state = match self.state {
                State::Scanning(tier) => {
                    self.scan(tier);
                    if self.is_full() {
                        State::Done
                    } else {
                        tier.next().map_or(State::Sweep, State::Scanning)
                    }
                }
                State::Sweep => {
                    self.sweep();
                    if self.is_full() {
                        State::Done
                    } else {
                        State::Relaxed
                    }
                }
                State::Relaxed => {
                    self.relax();
                    State::Done
                }
                State::Done => break,
            };
        }
        self.picks
    }

    fn needed(&self) -> usize {
        PICK_COUNT.saturating_sub(self.anchors.len())
    }

    fn is_full(&self) -> bool {
        self.picks.len() >= self.needed()
    }

    fn remaining_slots(&self) -> usize {
        PICK_COUNT.saturating_sub(self.anchors.len() + self.picks.len())
    }

    fn is_taken(&self, number: u8) -> bool {
        self.anchors.contains(&number) || self.picks.iter().any(|p| p.number == number)
    }

    fn parity_allows(&self, number: u8) -> bool {
        let cap = if self.remaining_slots() <= LAST_SLOTS { PARITY_CAP_LAST_SLOTS } else { PARITY_CAP };
        let same_parity = if number % 2 == 0 { self.even } else { self.odd };
        same_parity < cap
    }

    fn admissible(&self, number: u8) -> bool {
        if !self.parity_allows(number) {
            return false;
        }

        let remaining = self.remaining_slots();
        if self.plan.spacing && remaining >= SPACING_MIN_REMAINING {
            let too_close = self
                .anchors
                .iter()
                .copied()
                .chain(self.picks.iter().map(|p| p.number))
                .any(|s| s.abs_diff(number) <= MIN_SPACING);
            if too_close {
                return false;
            }
        }
        true
    }

    fn push(&mut self, number: u8, tier: Tier) {
        if number % 2 == 0 {
            self.even += 1;
        } else {
            self.odd += 1;
        }
        self.picks.push(Pick { number, tier });
    }

    fn scan(&mut self, tier: Tier) {
        let index = Tier::ORDERED.iter().position(|&t| t == tier).unwrap_or(Tier::ORDERED.len() - 1);
        let range = self.bounds[index].clone();
        let target = self.plan.target(tier);
        let filtered = self.filtered;
        let mut taken = 0usize;

        for candidate in &filtered[range.clone()] {
            if self.is_full() || taken >= target {
                break;
            }
            if self.is_taken(candidate.number) || !self.admissible(candidate.number) {
                continue;
            }
            self.push(candidate.number, tier);
            taken += 1;
        }

        debug!(?tier, candidates = range.len(), taken, total = self.picks.len(), "palier parcouru");
    }

    /// Parcourt `pool` dans l'ordre du classement ; recommence tant qu'un passage
    /// ajoute un numéro, le plafond de parité pouvant passer à 4 en cours de route.
    fn fill_with_parity(&mut self, pool: &[Candidate], tier: Tier) -> usize {
        let start = self.picks.len();
        loop {
            let before = self.picks.len();
            for candidate in pool {
                if self.is_full() {
                    return self.picks.len() - start;
                }
                if !self.is_taken(candidate.number) && self.parity_allows(candidate.number) {
                    self.push(candidate.number, tier);
                }
            }
            if self.picks.len() == before {
                return self.picks.len() - start;
            }
        }
    }

    fn sweep(&mut self) {
        let filtered = self.filtered;
        let taken = self.fill_with_parity(filtered, Tier::Remainder);
        debug!(taken, total = self.picks.len(), "candidats restants repris sans contrainte d'écart");
    }

    fn relax(&mut self) {
        let missing = self.needed() - self.picks.len();
        debug!(missing, "candidats filtrés épuisés, plafond de froids levé");
        let ranked = self.ranked;

        // Seulement si le filtre des froids a laissé trop peu de candidats.
        let taken = self.fill_with_parity(ranked, Tier::Relaxed);
        if taken > 0 {
            warn!(taken, "plafond de numéros froids dépassé faute de candidats");
        }

        for candidate in ranked {
            if self.is_full() {
                return;
            }
            if !self.is_taken(candidate.number) {
                warn!(number = candidate.number, "équilibre pair / impair rompu faute de candidats");
                self.push(candidate.number, Tier::Relaxed);
            }
        }
    }
}
