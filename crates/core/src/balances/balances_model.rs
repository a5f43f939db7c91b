use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// End-of-day balance of one account.
///
/// `balance` is the total; `cash_balance` is the total minus the market value
/// of the holdings dated that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBalance {
    pub account_id: String,
    pub date: NaiveDate,
    pub balance: Decimal,
    pub cash_balance: Decimal,
    pub currency: String,
}

impl DailyBalance {
    pub fn non_cash_balance(&self) -> Decimal {
        self.balance - self.cash_balance
    }
}
