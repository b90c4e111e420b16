use serde::Serialize;
use utoipa::ToSchema;

use crate::model::line_item::LineItem;

/// Totals for one payslip. Values are kept at full precision; call
/// [`PayrollSummary::rounded`] before persisting or returning them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    pub gross_salary: f64,
    pub total_deduction: f64,
    pub net_salary: f64,
    pub lop_amount: f64,
    pub in_hand_salary: f64,
}

impl PayrollSummary {
    pub fn rounded(self) -> Self {
        Self {
            gross_salary: round2(self.gross_salary),
            total_deduction: round2(self.total_deduction),
            net_salary: round2(self.net_salary),
            lop_amount: round2(self.lop_amount),
            in_hand_salary: round2(self.in_hand_salary),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() { scaled.round() / 100.0 } else { value }
}

/// Overflowed figures follow the same silent-zero rule as bad input.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

pub fn gross_salary(earnings: &[LineItem]) -> f64 {
    finite_or_zero(earnings.iter().map(|e| e.amount).sum())
}

pub fn total_deduction(deductions: &[LineItem]) -> f64 {
    finite_or_zero(deductions.iter().map(|d| d.amount).sum())
}

/// Loss of pay: gross spread over every calendar day of the month, not
/// just working days.
pub fn lop_amount(gross_salary: f64, month_days: f64, lop_days: f64) -> f64 {
    if month_days > 0.0 {
        finite_or_zero((gross_salary / month_days) * lop_days)
    } else {
        0.0
    }
}

/// Net and in-hand salary are not clamped: over-deduction and LOP beyond
/// the month length yield negative figures.
pub fn summarize(
    earnings: &[LineItem],
    deductions: &[LineItem],
    month_days: f64,
    lop_days: f64,
) -> PayrollSummary {
    let gross_salary = gross_salary(earnings);
    let total_deduction = total_deduction(deductions);
    let net_salary = gross_salary - total_deduction;
    let lop_amount = lop_amount(gross_salary, month_days, lop_days);

    PayrollSummary {
        gross_salary,
        total_deduction,
        net_salary,
        lop_amount,
        in_hand_salary: finite_or_zero(net_salary - lop_amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::line_item::HeadType;
    use pretty_assertions::assert_eq;

    fn item(name: &str, amount: f64) -> LineItem {
        LineItem::new(name, HeadType::Fixed, amount)
    }

    #[test]
    fn test_empty_lists_give_zero_totals() {
        let summary = summarize(&[], &[], 30.0, 2.0);
        assert_eq!(summary, PayrollSummary::default());
    }

    #[test]
    fn test_gross_and_deduction_are_sums() {
        let earnings = vec![item("Basic", 1000.5), item("HRA", 200.25), item("DA", 0.0)];
        let deductions = vec![item("PF", 100.0), item("TDS", 50.5)];

        assert_eq!(gross_salary(&earnings), 1200.75);
        assert_eq!(total_deduction(&deductions), 150.5);

        let summary = summarize(&earnings, &deductions, 0.0, 0.0);
        assert_eq!(summary.net_salary, 1050.25);
    }

    #[test]
    fn test_net_salary_can_go_negative() {
        let summary = summarize(&[item("Basic", 1000.0)], &[item("Advance", 1500.0)], 30.0, 0.0);
        assert_eq!(summary.net_salary, -500.0);
        assert_eq!(summary.in_hand_salary, -500.0);
    }

    #[test]
    fn test_zero_month_days_means_no_lop() {
        assert_eq!(lop_amount(30000.0, 0.0, 3.0), 0.0);
        assert_eq!(lop_amount(30000.0, 0.0, 0.0), 0.0);
        assert_eq!(lop_amount(0.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn test_lop_uses_calendar_days() {
        assert_eq!(round2(lop_amount(30000.0, 30.0, 3.0)), 3000.00);
    }

    #[test]
    fn test_lop_beyond_month_length_is_not_capped() {
        let summary = summarize(&[item("Basic", 3000.0)], &[], 30.0, 40.0);
        assert_eq!(summary.lop_amount, 4000.0);
        assert_eq!(summary.in_hand_salary, -1000.0);
    }

    #[test]
    fn test_in_hand_is_net_minus_lop() {
        let summary = summarize(&[item("Basic", 12345.67)], &[item("PF", 345.67)], 31.0, 1.5);
        assert_eq!(summary.in_hand_salary, summary.net_salary - summary.lop_amount);
    }

    #[test]
    fn test_overflowing_sums_become_zero() {
        let earnings = vec![item("Basic", 1.7e308), item("HRA", 1.7e308)];
        let deductions = vec![item("PF", 1.7e308), item("Loan", 1.7e308)];

        assert_eq!(gross_salary(&earnings), 0.0);
        assert_eq!(total_deduction(&deductions), 0.0);

        let summary = summarize(&[item("Basic", 1.7e308)], &[], 1.0, 1.7e308).rounded();
        assert_eq!(summary.gross_salary, 1.7e308);
        assert_eq!(summary.lop_amount, 0.0);
        assert_eq!(summary.in_hand_salary, 1.7e308);
    }

    #[test]
    fn test_march_payslip_figures() {
        let earnings = vec![item("Basic", 20000.0), item("HRA", 5000.0)];
        let deductions = vec![item("PF", 1800.0)];

        let summary = summarize(&earnings, &deductions, 31.0, 2.0).rounded();

        assert_eq!(
            summary,
            PayrollSummary {
                gross_salary: 25000.0,
                total_deduction: 1800.0,
                net_salary: 23200.0,
                lop_amount: 1612.90,
                in_hand_salary: 21587.10,
            }
        );
    }
}
