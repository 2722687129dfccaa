//! Input form state for the TUI.
//!
//! The form owns the values being edited and enforces the field bounds
//! (year range, non-negative amounts, payment capped at the opening balance).
//! It hands the service a fresh `ReceivableInput` per submission.

use crate::domain::{ReceivableInput, TAX_YEAR_MAX, TAX_YEAR_MIN, percent_paid};

/// Step used by ←/→ on the amount fields.
pub const AMOUNT_STEP: i64 = 100_000;
pub const DEFAULT_OPENING_BALANCE: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Category,
    OpeningBalance,
    AmountPaid,
    Submit,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Year,
        Field::Category,
        Field::OpeningBalance,
        Field::AmountPaid,
        Field::Submit,
    ];

    pub fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Field::ALL[(self.index() + 1).min(Field::ALL.len() - 1)]
    }

    pub fn prev(self) -> Self {
        Field::ALL[self.index().saturating_sub(1)]
    }

    pub fn is_amount(self) -> bool {
        matches!(self, Field::OpeningBalance | Field::AmountPaid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub year: i32,
    pub category_idx: usize,
    pub opening_balance: i64,
    pub amount_paid: i64,
    pub selected: Field,
    /// Digits typed into the selected amount field, while editing.
    pub editing: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            year: TAX_YEAR_MAX,
            category_idx: 0,
            opening_balance: DEFAULT_OPENING_BALANCE,
            amount_paid: 0,
            selected: Field::Year,
            editing: None,
        }
    }
}

impl FormState {
    pub fn percent_paid(&self) -> f64 {
        percent_paid(self.opening_balance, self.amount_paid)
    }

    /// Step the selected field. `categories` is the vocabulary size.
    pub fn adjust(&mut self, delta: i64, categories: usize) {
        match self.selected {
            Field::Year => {
                let next = i64::from(self.year) + delta;
                self.year = next.clamp(i64::from(TAX_YEAR_MIN), i64::from(TAX_YEAR_MAX)) as i32;
            }
            Field::Category => {
                if categories == 0 {
                    return;
                }
                let n = categories as i64;
                self.category_idx = (self.category_idx as i64 + delta).rem_euclid(n) as usize;
            }
            Field::OpeningBalance => {
                self.set_opening_balance(self.opening_balance.saturating_add(delta * AMOUNT_STEP));
            }
            Field::AmountPaid => {
                self.set_amount_paid(self.amount_paid.saturating_add(delta * AMOUNT_STEP));
            }
            Field::Submit => {}
        }
    }

    pub fn set_opening_balance(&mut self, value: i64) {
        self.opening_balance = value.max(0);
        self.amount_paid = self.amount_paid.min(self.opening_balance);
    }

    pub fn set_amount_paid(&mut self, value: i64) {
        self.amount_paid = value.clamp(0, self.opening_balance);
    }

    /// Begin typing into the selected amount field.
    pub fn start_edit(&mut self) -> bool {
        if !self.selected.is_amount() {
            return false;
        }
        self.editing = Some(String::new());
        true
    }

    pub fn push_digit(&mut self, c: char) {
        if let Some(buf) = &mut self.editing {
            if c.is_ascii_digit() && buf.len() < 15 {
                buf.push(c);
            }
        }
    }

    pub fn pop_digit(&mut self) {
        if let Some(buf) = &mut self.editing {
            buf.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Apply the typed value. Returns a note when the value had to be bounded.
    pub fn commit_edit(&mut self) -> Option<String> {
        let buf = self.editing.take()?;
        let value: i64 = if buf.is_empty() { 0 } else { buf.parse().ok()? };
        match self.selected {
            Field::OpeningBalance => {
                let capped = self.amount_paid > value;
                self.set_opening_balance(value);
                capped.then(|| "Amount paid reduced to the new opening balance.".to_string())
            }
            Field::AmountPaid => {
                self.set_amount_paid(value);
                (value > self.opening_balance)
                    .then(|| "Amount paid cannot exceed the opening balance.".to_string())
            }
            _ => None,
        }
    }

    pub fn to_input(&self, categories: &[String]) -> Option<ReceivableInput> {
        let category = categories.get(self.category_idx)?;
        Some(ReceivableInput {
            tax_year: self.year,
            tax_category: category.clone(),
            opening_balance: self.opening_balance,
            amount_paid: self.amount_paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form_initial_values() {
        let form = FormState::default();
        assert_eq!(form.year, 2025);
        assert_eq!(form.opening_balance, 1_000_000);
        assert_eq!(form.amount_paid, 0);
        assert_eq!(form.percent_paid(), 0.0);
    }

    #[test]
    fn year_stays_in_range() {
        let mut form = FormState::default();
        form.adjust(1, 3);
        assert_eq!(form.year, TAX_YEAR_MAX);
        form.adjust(-100, 3);
        assert_eq!(form.year, TAX_YEAR_MIN);
    }

    #[test]
    fn category_wraps() {
        let mut form = FormState {
            selected: Field::Category,
            ..FormState::default()
        };
        form.adjust(-1, 3);
        assert_eq!(form.category_idx, 2);
        form.adjust(1, 3);
        assert_eq!(form.category_idx, 0);
    }

    #[test]
    fn payment_is_bounded_by_opening_balance() {
        let mut form = FormState {
            selected: Field::AmountPaid,
            ..FormState::default()
        };
        for _ in 0..20 {
            form.adjust(1, 1);
        }
        assert_eq!(form.amount_paid, 1_000_000);
        assert_eq!(form.percent_paid(), 100.0);

        form.selected = Field::OpeningBalance;
        form.adjust(-3, 1);
        assert_eq!(form.opening_balance, 700_000);
        assert_eq!(form.amount_paid, 700_000);

        form.adjust(-100, 1);
        assert_eq!(form.opening_balance, 0);
        assert_eq!(form.amount_paid, 0);
        assert_eq!(form.percent_paid(), 0.0);
    }

    #[test]
    fn typed_payment_above_balance_is_capped_with_note() {
        let mut form = FormState {
            selected: Field::AmountPaid,
            ..FormState::default()
        };
        assert!(form.start_edit());
        for c in "2500000".chars() {
            form.push_digit(c);
        }
        form.push_digit('x');
        let note = form.commit_edit();
        assert!(note.is_some());
        assert_eq!(form.amount_paid, 1_000_000);
        assert!(form.editing.is_none());
    }

    #[test]
    fn editing_only_applies_to_amounts() {
        let mut form = FormState::default();
        assert!(!form.start_edit());
        form.selected = Field::OpeningBalance;
        assert!(form.start_edit());
        form.push_digit('5');
        form.pop_digit();
        form.push_digit('7');
        assert_eq!(form.commit_edit(), None);
        assert_eq!(form.opening_balance, 7);
    }

    #[test]
    fn input_uses_selected_category() {
        let cats = vec!["BPHTB".to_string(), "PBB".to_string()];
        let form = FormState {
            category_idx: 1,
            ..FormState::default()
        };
        let input = form.to_input(&cats).unwrap();
        assert_eq!(input.tax_category, "PBB");
        assert_eq!(input.tax_year, 2025);
        assert!(FormState { category_idx: 5, ..FormState::default() }.to_input(&cats).is_none());
    }
}
