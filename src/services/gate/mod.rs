pub mod promotion;
pub mod tripwire;

pub use promotion::{active_run, promote, rollback_to, validate_run, PromotionOutcome};
pub use tripwire::{TripwireCase, TripwireConstraint, TripwireReport};
