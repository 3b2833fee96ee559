pub mod deck;
pub mod estimator;
pub mod hand;

pub use deck::{CardKind, Deck};
pub use estimator::{estimate, run_trial, Estimate, TrialOutcome, TrialSettings};
pub use hand::{deal_opening_hand, HandState, OpeningHand};
