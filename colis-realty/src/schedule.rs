use crate::installment::Installment;
use crate::round2;
use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Dated lines stepping by the frequency from the first due date
    ByCalendar {
        first_due_date: NaiveDate,
        frequency: Frequency,
    },
    /// Undated lines, count only
    ByNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub partner_id: Uuid,
    pub property_id: Uuid,
    pub final_price: f64,
    pub down_payment: f64,
    pub installments: u32,
    pub mode: ScheduleMode,
}

/// Manual split of one line into two
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    pub amount1: f64,
    pub date1: Option<NaiveDate>,
    pub label1: Option<String>,
    pub amount2: f64,
    pub date2: Option<NaiveDate>,
    pub label2: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Installments must be a positive integer")]
    InvalidInstallmentCount,

    #[error("Down payment cannot exceed the total amount")]
    DownPaymentExceedsTotal,

    #[error("Cannot split a paid installment")]
    SplitOnPaidLine,

    #[error("Split amounts must be strictly positive")]
    NonPositiveSplitAmount,

    #[error("Split total must equal the line amount (or residual if partially paid): {expected}")]
    SplitMismatch { expected: f64 },
}

/// Generate the installment lines of a sale.
///
/// The base amount (final price minus down payment) is spread evenly; the
/// last line carries the rounding tail so the lines sum exactly to the
/// base. The optional down payment becomes a leading "Reservation" line.
pub fn generate_schedule(request: &ScheduleRequest) -> Result<Vec<Installment>, ScheduleError> {
    if request.installments == 0 {
        return Err(ScheduleError::InvalidInstallmentCount);
    }
    let base = request.final_price - request.down_payment;
    if base < 0.0 {
        return Err(ScheduleError::DownPaymentExceedsTotal);
    }

    let mut lines = Vec::new();
    let first_due_date = match request.mode {
        ScheduleMode::ByCalendar { first_due_date, .. } => Some(first_due_date),
        ScheduleMode::ByNumber => None,
    };

    if request.down_payment > 0.0 {
        lines.push(Installment::new(
            "Reservation",
            request.partner_id,
            request.property_id,
            request.down_payment.abs(),
            first_due_date,
        ));
    }

    let count = request.installments;
    let amount_each = round2(base / f64::from(count));
    let tail = round2(base - amount_each * f64::from(count - 1));

    let mut current_date = first_due_date;
    for i in 1..=count {
        let amount = if i == count { tail } else { amount_each };
        lines.push(Installment::new(
            format!("Installment {i}/{count}"),
            request.partner_id,
            request.property_id,
            amount,
            current_date,
        ));
        if let ScheduleMode::ByCalendar { frequency, .. } = request.mode {
            current_date = current_date.map(|date| next_due_date(date, frequency));
        }
    }

    tracing::info!(
        lines = lines.len(),
        total = request.final_price,
        "generated payment schedule"
    );
    Ok(lines)
}

fn next_due_date(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Weekly => date + Duration::weeks(1),
        Frequency::Monthly => date.checked_add_months(Months::new(1)).unwrap_or(date),
        Frequency::Quarterly => date.checked_add_months(Months::new(3)).unwrap_or(date),
    }
}

/// Replace a line with two new lines of the same sale.
///
/// Partially paid lines split over their residual; the original is
/// cancelled rather than deleted so the audit trail survives.
pub fn split_installment(
    original: &mut Installment,
    request: &SplitRequest,
) -> Result<[Installment; 2], ScheduleError> {
    if original.is_paid() {
        return Err(ScheduleError::SplitOnPaidLine);
    }
    if request.amount1 <= 0.0 || request.amount2 <= 0.0 {
        return Err(ScheduleError::NonPositiveSplitAmount);
    }

    let base = if original.paid_amount() > 0.0 {
        original.residual()
    } else {
        original.amount
    };
    if round2(request.amount1 + request.amount2) != round2(base) {
        return Err(ScheduleError::SplitMismatch {
            expected: round2(base),
        });
    }

    original.cancelled = true;

    let first = Installment::new(
        request
            .label1
            .clone()
            .unwrap_or_else(|| format!("{} (1/2)", original.name)),
        original.partner_id,
        original.property_id,
        request.amount1,
        request.date1,
    );
    let second = Installment::new(
        request
            .label2
            .clone()
            .unwrap_or_else(|| format!("{} (2/2)", original.name)),
        original.partner_id,
        original.property_id,
        request.amount2,
        request.date2,
    );
    Ok([first, second])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(final_price: f64, down_payment: f64, installments: u32) -> ScheduleRequest {
        ScheduleRequest {
            partner_id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            final_price,
            down_payment,
            installments,
            mode: ScheduleMode::ByCalendar {
                first_due_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                frequency: Frequency::Monthly,
            },
        }
    }

    #[test]
    fn test_lines_sum_exactly_to_the_price() {
        let lines = generate_schedule(&request(1000.0, 0.0, 3)).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].amount, 333.33);
        assert_eq!(lines[1].amount, 333.33);
        // The last line carries the rounding tail
        assert_eq!(lines[2].amount, 333.34);
        let total: f64 = lines.iter().map(|line| line.amount).sum();
        assert!((total - 1000.0).abs() < 0.001);
    }

    #[test]
    fn test_down_payment_becomes_reservation_line() {
        let lines = generate_schedule(&request(1000.0, 250.0, 3)).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].name, "Reservation");
        assert_eq!(lines[0].amount, 250.0);
        assert_eq!(lines[1].amount, 250.0);
        assert_eq!(lines[1].name, "Installment 1/3");
    }

    #[test]
    fn test_monthly_dates_step_from_the_first_due_date() {
        let lines = generate_schedule(&request(300.0, 0.0, 3)).unwrap();
        let dates: Vec<NaiveDate> = lines.iter().filter_map(|line| line.due_date).collect();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        // Clamped to the shorter month
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2025, 3, 28).unwrap());
    }

    #[test]
    fn test_by_number_mode_leaves_lines_undated() {
        let mut request = request(900.0, 0.0, 3);
        request.mode = ScheduleMode::ByNumber;
        let lines = generate_schedule(&request).unwrap();
        assert!(lines.iter().all(|line| line.due_date.is_none()));
    }

    #[test]
    fn test_schedule_validation() {
        assert!(matches!(
            generate_schedule(&request(1000.0, 0.0, 0)),
            Err(ScheduleError::InvalidInstallmentCount)
        ));
        assert!(matches!(
            generate_schedule(&request(1000.0, 1200.0, 3)),
            Err(ScheduleError::DownPaymentExceedsTotal)
        ));
    }

    #[test]
    fn test_split_replaces_the_line() {
        let mut line = Installment::new("Installment 2/4", Uuid::new_v4(), Uuid::new_v4(), 500.0, None);
        let [first, second] = split_installment(
            &mut line,
            &SplitRequest {
                amount1: 200.0,
                date1: None,
                label1: None,
                amount2: 300.0,
                date2: None,
                label2: Some("Solde".to_string()),
            },
        )
        .unwrap();

        assert!(line.cancelled);
        assert_eq!(first.name, "Installment 2/4 (1/2)");
        assert_eq!(first.amount, 200.0);
        assert_eq!(second.name, "Solde");
        assert_eq!(second.amount, 300.0);
    }

    #[test]
    fn test_split_of_partially_paid_line_uses_residual() {
        let today = chrono::Utc::now().date_naive();
        let mut line = Installment::new("Installment 1/1", Uuid::new_v4(), Uuid::new_v4(), 500.0, None);
        line.register_payment(100.0, today, None).unwrap();

        // 500 total would be wrong: only the 400 residual may be split
        let wrong = split_installment(
            &mut line,
            &SplitRequest {
                amount1: 250.0,
                date1: None,
                label1: None,
                amount2: 250.0,
                date2: None,
                label2: None,
            },
        );
        assert!(matches!(wrong, Err(ScheduleError::SplitMismatch { .. })));

        let ok = split_installment(
            &mut line,
            &SplitRequest {
                amount1: 150.0,
                date1: None,
                label1: None,
                amount2: 250.0,
                date2: None,
                label2: None,
            },
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_split_refuses_paid_lines() {
        let today = chrono::Utc::now().date_naive();
        let mut line = Installment::new("Installment 1/1", Uuid::new_v4(), Uuid::new_v4(), 500.0, None);
        line.register_payment(500.0, today, None).unwrap();

        let result = split_installment(
            &mut line,
            &SplitRequest {
                amount1: 250.0,
                date1: None,
                label1: None,
                amount2: 250.0,
                date2: None,
                label2: None,
            },
        );
        assert!(matches!(result, Err(ScheduleError::SplitOnPaidLine)));
    }
}
