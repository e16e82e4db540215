pub mod installment;
pub mod presale;
pub mod property;
pub mod schedule;

pub use installment::{Installment, InstallmentLedger, InstallmentStatus};
pub use presale::{Presale, PresaleBook, PresaleState, SweepReport};
pub use property::{PropertyStage, PropertyUnit};
pub use schedule::{generate_schedule, split_installment, Frequency, ScheduleMode, ScheduleRequest};

/// Round a monetary amount to 2 decimals
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tolerance for monetary comparisons
pub(crate) const AMOUNT_EPSILON: f64 = 0.005;
