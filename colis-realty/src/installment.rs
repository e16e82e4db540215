use crate::AMOUNT_EPSILON;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Pending,
    Partial,
    Paid,
    Late,
    Cancelled,
}

/// A registered settlement against an installment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPayment {
    pub id: Uuid,
    pub payment_date: NaiveDate,
    pub amount: f64,
    pub reference: Option<String>,
}

/// One expected payment of a property sale ("échéance")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: Uuid,
    pub name: String,
    pub partner_id: Uuid,
    pub property_id: Uuid,
    /// Expected amount for this line, not the total property value
    pub amount: f64,
    /// Absent when the schedule was generated by number, without dates
    pub due_date: Option<NaiveDate>,
    pub cancelled: bool,
    pub note: Option<String>,
    pub payments: Vec<InstallmentPayment>,
}

impl Installment {
    pub fn new(
        name: impl Into<String>,
        partner_id: Uuid,
        property_id: Uuid,
        amount: f64,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            partner_id,
            property_id,
            amount,
            due_date,
            cancelled: false,
            note: None,
            payments: Vec::new(),
        }
    }

    pub fn paid_amount(&self) -> f64 {
        self.payments.iter().map(|payment| payment.amount).sum()
    }

    pub fn residual(&self) -> f64 {
        (self.amount - self.paid_amount()).max(0.0)
    }

    pub fn is_paid(&self) -> bool {
        self.residual() <= AMOUNT_EPSILON
    }

    /// Payment status of the line as of `today`
    pub fn status(&self, today: NaiveDate) -> InstallmentStatus {
        if self.cancelled {
            return InstallmentStatus::Cancelled;
        }
        let overdue = self.due_date.map(|due| due < today).unwrap_or(false);
        if self.paid_amount() <= AMOUNT_EPSILON {
            if overdue {
                InstallmentStatus::Late
            } else {
                InstallmentStatus::Pending
            }
        } else if self.is_paid() {
            InstallmentStatus::Paid
        } else if overdue {
            InstallmentStatus::Late
        } else {
            InstallmentStatus::Partial
        }
    }

    pub fn register_payment(
        &mut self,
        amount: f64,
        payment_date: NaiveDate,
        reference: Option<String>,
    ) -> Result<(), InstallmentError> {
        if self.cancelled {
            return Err(InstallmentError::LineCancelled(self.id));
        }
        if amount <= 0.0 {
            return Err(InstallmentError::NonPositiveAmount);
        }
        self.payments.push(InstallmentPayment {
            id: Uuid::new_v4(),
            payment_date,
            amount,
            reference,
        });
        Ok(())
    }
}

/// Installment lines of all ongoing sales
#[derive(Debug, Default)]
pub struct InstallmentLedger {
    lines: HashMap<Uuid, Installment>,
}

impl InstallmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, line: Installment) -> Uuid {
        let id = line.id;
        self.lines.insert(id, line);
        id
    }

    pub fn insert_all(&mut self, lines: Vec<Installment>) -> Vec<Uuid> {
        lines.into_iter().map(|line| self.insert(line)).collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&Installment> {
        self.lines.get(&id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut Installment, InstallmentError> {
        self.lines
            .get_mut(&id)
            .ok_or(InstallmentError::NotFound(id))
    }

    /// Lines of one property, due-date order, undated lines last
    pub fn for_property(&self, property_id: Uuid) -> Vec<&Installment> {
        let mut lines: Vec<&Installment> = self
            .lines
            .values()
            .filter(|line| line.property_id == property_id)
            .collect();
        lines.sort_by_key(|line| (line.due_date.is_none(), line.due_date));
        lines
    }

    /// Scheduled/paid/residual totals over a property's lines, cancelled
    /// lines excluded
    pub fn totals(&self, property_id: Uuid) -> (f64, f64, f64) {
        let mut scheduled = 0.0;
        let mut paid = 0.0;
        for line in self.lines.values() {
            if line.property_id == property_id && !line.cancelled {
                scheduled += line.amount;
                paid += line.paid_amount();
            }
        }
        (scheduled, paid, (scheduled - paid).max(0.0))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InstallmentError {
    #[error("Installment not found: {0}")]
    NotFound(Uuid),

    #[error("Installment is cancelled: {0}")]
    LineCancelled(Uuid),

    #[error("Payment amount must be strictly positive")]
    NonPositiveAmount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn line(amount: f64, due_in_days: i64) -> Installment {
        let today = chrono::Utc::now().date_naive();
        Installment::new(
            "Installment 1/1",
            Uuid::new_v4(),
            Uuid::new_v4(),
            amount,
            Some(today + Duration::days(due_in_days)),
        )
    }

    #[test]
    fn test_status_progression() {
        let today = chrono::Utc::now().date_naive();
        let mut line = line(1000.0, 10);
        assert_eq!(line.status(today), InstallmentStatus::Pending);

        line.register_payment(400.0, today, None).unwrap();
        assert_eq!(line.status(today), InstallmentStatus::Partial);
        assert_eq!(line.residual(), 600.0);

        line.register_payment(600.0, today, Some("VIR-1".to_string()))
            .unwrap();
        assert_eq!(line.status(today), InstallmentStatus::Paid);
        assert_eq!(line.residual(), 0.0);
    }

    #[test]
    fn test_overdue_lines_are_late() {
        let today = chrono::Utc::now().date_naive();
        let mut line = line(1000.0, -3);
        assert_eq!(line.status(today), InstallmentStatus::Late);

        // A partial payment on an overdue line is still late
        line.register_payment(100.0, today, None).unwrap();
        assert_eq!(line.status(today), InstallmentStatus::Late);
    }

    #[test]
    fn test_payment_validation() {
        let today = chrono::Utc::now().date_naive();
        let mut line = line(1000.0, 5);
        assert!(matches!(
            line.register_payment(0.0, today, None),
            Err(InstallmentError::NonPositiveAmount)
        ));

        line.cancelled = true;
        assert!(matches!(
            line.register_payment(100.0, today, None),
            Err(InstallmentError::LineCancelled(_))
        ));
        assert_eq!(line.status(today), InstallmentStatus::Cancelled);
    }

    #[test]
    fn test_ledger_totals_skip_cancelled_lines() {
        let today = chrono::Utc::now().date_naive();
        let property_id = Uuid::new_v4();
        let partner_id = Uuid::new_v4();
        let mut ledger = InstallmentLedger::new();

        let mut first = Installment::new("1/2", partner_id, property_id, 500.0, Some(today));
        first.register_payment(200.0, today, None).unwrap();
        ledger.insert(first);

        let mut cancelled = Installment::new("old", partner_id, property_id, 900.0, None);
        cancelled.cancelled = true;
        ledger.insert(cancelled);

        let (scheduled, paid, residual) = ledger.totals(property_id);
        assert_eq!(scheduled, 500.0);
        assert_eq!(paid, 200.0);
        assert_eq!(residual, 300.0);
    }
}
