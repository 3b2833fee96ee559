use crate::config::CARDS_IN_HAND;
use crate::requirement::Requirement;
use crate::rng::TrialRng;
use crate::simulation::deck::{CardKind, Deck};

/// Lands held, bucketed by the colors they produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandState {
    pub only_a: u32,
    pub only_b: u32,
    pub both: u32,
    pub generic: u32,
    /// Total lands; can drop below the bucket sum after a mulligan truncation
    pub lands: u32,
}

impl HandState {
    #[inline]
    pub fn record(&mut self, kind: CardKind) {
        match kind {
            CardKind::OnlyA => self.only_a += 1,
            CardKind::OnlyB => self.only_b += 1,
            CardKind::Both => self.both += 1,
            CardKind::Generic => self.generic += 1,
            CardKind::NonLand => return,
        }
        self.lands += 1;
    }

    /// Keep hands with 2-5 lands
    pub fn is_keepable(&self) -> bool {
        (2..=5).contains(&self.lands)
    }

    /// Cut a mulliganed hand down to `hand_size` cards.
    ///
    /// Dual lands are kept first. If the single-color lands don't fit in what
    /// is left, each color keeps a share proportional to its requirement,
    /// rounded down.
    pub fn truncate(&mut self, hand_size: u32, color_requirement: [u32; 2]) {
        self.lands = self.lands.min(hand_size);
        self.both = self.both.min(self.lands);
        let remaining = self.lands - self.both;
        if self.only_a + self.only_b > remaining {
            let [req_a, req_b] = color_requirement.map(u64::from);
            let total = (req_a + req_b).max(1);
            let share = |req: u64| (u64::from(remaining) * req / total) as u32;
            self.only_a = self.only_a.min(share(req_a));
            self.only_b = self.only_b.min(share(req_b));
        }
    }

    /// Can the dual lands cover whatever the single-color lands leave short?
    pub fn pays_colors(&self, color_requirement: [u32; 2]) -> bool {
        let short_a = color_requirement[0].saturating_sub(self.only_a);
        let short_b = color_requirement[1].saturating_sub(self.only_b);
        self.both >= short_a + short_b
    }
}

/// Opening hand after the mulligan loop, with the deck it was dealt from
pub struct OpeningHand {
    pub deck: Deck,
    pub hand: HandState,
    /// Cards the player keeps: 7, or fewer after mulligans
    pub hand_size: u32,
}

/// Deal 7 cards from a fresh deck until a keepable hand or the floor is reached.
///
/// Each attempt takes a new deck seed from `stream`. The kept hand is truncated
/// to its size when a mulligan was taken.
pub fn deal_opening_hand(
    requirement: &Requirement,
    stream: &mut TrialRng,
    mulligan_floor: u32,
) -> OpeningHand {
    let mut hand_size = CARDS_IN_HAND + 1;
    loop {
        let mut deck = Deck::new(requirement, stream.next_seed());
        let mut hand = HandState::default();
        for _ in 0..CARDS_IN_HAND {
            hand.record(deck.draw_card());
        }
        hand_size -= 1;

        if hand.is_keepable() || hand_size <= mulligan_floor {
            if hand_size < CARDS_IN_HAND {
                hand.truncate(hand_size, requirement.color_requirement);
            }
            return OpeningHand {
                deck,
                hand,
                hand_size,
            };
        }
    }
}
