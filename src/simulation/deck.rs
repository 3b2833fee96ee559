use crate::requirement::Requirement;
use crate::rng::TrialRng;

/// Category of a drawn card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    OnlyA,
    OnlyB,
    Both,
    /// Land that produces neither tracked color
    Generic,
    NonLand,
}

impl CardKind {
    /// Named land categories in the order the index space is partitioned
    pub const TRACKED: [CardKind; 3] = [CardKind::OnlyA, CardKind::OnlyB, CardKind::Both];

    pub fn is_land(self) -> bool {
        !matches!(self, CardKind::NonLand)
    }
}

/// Remaining composition of one shuffled deck.
///
/// Cards are not materialised: a draw picks a position in `[1, cards]` and
/// maps it onto cumulative category counts (A-only, B-only, both, then the
/// untracked lands). Positions past every land are spells.
pub struct Deck {
    lands: u32,
    cards: u32,
    tracked: [u32; 3],
    rng: TrialRng,
}

impl Deck {
    pub fn new(requirement: &Requirement, seed: u64) -> Self {
        Deck {
            lands: requirement.land_count,
            cards: requirement.deck_size,
            tracked: requirement.land_split,
            rng: TrialRng::new(seed),
        }
    }

    pub fn remaining_cards(&self) -> u32 {
        self.cards
    }

    pub fn remaining_lands(&self) -> u32 {
        self.lands
    }

    pub fn remaining_tracked(&self) -> [u32; 3] {
        self.tracked
    }

    pub fn is_empty(&self) -> bool {
        self.cards == 0
    }

    /// Draw one card without replacement.
    ///
    /// Callers must not draw from an empty deck.
    #[inline]
    pub fn draw_card(&mut self) -> CardKind {
        debug_assert!(self.cards > 0, "draw from an empty deck");
        let index = self.rng.draw_index(self.cards);
        self.cards -= 1;

        let mut cutoff = 0;
        for (slot, kind) in CardKind::TRACKED.iter().enumerate() {
            cutoff += self.tracked[slot];
            if index <= cutoff {
                self.tracked[slot] -= 1;
                self.lands -= 1;
                return *kind;
            }
        }
        if index <= self.lands {
            self.lands -= 1;
            CardKind::Generic
        } else {
            CardKind::NonLand
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(split: [u32; 3]) -> Requirement {
        Requirement::new(40, 17, 3, [1, 1], split, 0).expect("valid requirement")
    }

    #[test]
    fn test_draining_deck_accounts_for_every_land() {
        let req = requirement([5, 4, 3]);
        for seed in 0..20 {
            let mut deck = Deck::new(&req, seed);
            let mut counts = [0u32; 5];
            while !deck.is_empty() {
                let kind = deck.draw_card();
                let slot = match kind {
                    CardKind::OnlyA => 0,
                    CardKind::OnlyB => 1,
                    CardKind::Both => 2,
                    CardKind::Generic => 3,
                    CardKind::NonLand => 4,
                };
                counts[slot] += 1;
            }
            assert_eq!(deck.remaining_cards(), 0);
            assert_eq!(deck.remaining_lands(), 0);
            assert_eq!(deck.remaining_tracked(), [0, 0, 0]);
            assert_eq!(counts, [5, 4, 3, 5, 23]);
        }
    }

    #[test]
    fn test_each_draw_decrements_counters() {
        let req = requirement([6, 6, 0]);
        let mut deck = Deck::new(&req, 42);
        for _ in 0..10 {
            let cards = deck.remaining_cards();
            let lands = deck.remaining_lands();
            let kind = deck.draw_card();
            assert_eq!(deck.remaining_cards(), cards - 1);
            let expected_lands = if kind.is_land() { lands - 1 } else { lands };
            assert_eq!(deck.remaining_lands(), expected_lands);
        }
    }

    #[test]
    fn test_all_lands_tracked_never_yields_generic() {
        let req = requirement([17, 0, 0]);
        let mut deck = Deck::new(&req, 7);
        while !deck.is_empty() {
            let kind = deck.draw_card();
            assert!(matches!(kind, CardKind::OnlyA | CardKind::NonLand));
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let req = requirement([3, 3, 3]);
        let mut deck1 = Deck::new(&req, 99);
        let mut deck2 = Deck::new(&req, 99);
        for _ in 0..40 {
            assert_eq!(deck1.draw_card(), deck2.draw_card());
        }
    }
}
