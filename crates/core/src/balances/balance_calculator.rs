//! Pure balance series computation over an account's entries and holdings.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::balances_model::DailyBalance;
use crate::accounts::{Account, AccountClassification};
use crate::entries::{Entry, EntryKind};
use crate::investments::Holding;
use crate::utils::time_utils::get_days_between;

/// Direction the series is walked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStrategy {
    /// Starts from zero on the first dated record; valuations reset the balance.
    Forward,
    /// Anchors the last day on the provider-reported balance and walks back.
    Reverse,
}

impl BalanceStrategy {
    pub fn for_account(account: &Account) -> Self {
        if account.is_linked() {
            BalanceStrategy::Reverse
        } else {
            BalanceStrategy::Forward
        }
    }
}

pub struct BalanceCalculator<'a> {
    account: &'a Account,
    entries: &'a [Entry],
    holdings: &'a [Holding],
}

impl<'a> BalanceCalculator<'a> {
    pub fn new(account: &'a Account, entries: &'a [Entry], holdings: &'a [Holding]) -> Self {
        Self {
            account,
            entries,
            holdings,
        }
    }

    pub fn strategy(&self) -> BalanceStrategy {
        BalanceStrategy::for_account(self.account)
    }

    /// Computes one balance per day from `start` through `end`, ascending.
    ///
    /// When `start` is `None` the series begins at the earliest entry or
    /// holding date. Records dated after `end` are ignored.
    pub fn calculate(&self, start: Option<NaiveDate>, end: NaiveDate) -> Vec<DailyBalance> {
        let first_record = self
            .entries
            .iter()
            .map(|e| e.date)
            .chain(self.holdings.iter().map(|h| h.date))
            .filter(|d| *d <= end)
            .min()
            .unwrap_or(end);
        let emit_from = start.unwrap_or(first_record).min(end);

        let flows = self.daily_flows(end);
        let non_cash = self.daily_non_cash(end);

        let balances = match self.strategy() {
            BalanceStrategy::Forward => {
                let walk_from = first_record.min(emit_from);
                self.forward(walk_from, end, &flows)
            }
            BalanceStrategy::Reverse => self.reverse(emit_from, end, &flows),
        };

        debug!(
            "Calculated {} daily balances for account {} ({:?})",
            balances.len(),
            self.account.id,
            self.strategy()
        );

        balances
            .into_iter()
            .filter(|(date, _)| *date >= emit_from)
            .map(|(date, balance)| {
                let holdings_value = non_cash.get(&date).copied().unwrap_or(Decimal::ZERO);
                DailyBalance {
                    account_id: self.account.id.clone(),
                    date,
                    balance,
                    cash_balance: balance - holdings_value,
                    currency: self.account.currency.clone(),
                }
            })
            .collect()
    }

    /// Balance change a single transaction or trade causes.
    fn flow_delta(&self, entry: &Entry) -> Decimal {
        match self.account.classification {
            AccountClassification::Asset => -entry.amount,
            AccountClassification::Liability => entry.amount,
        }
    }

    fn daily_flows(&self, end: NaiveDate) -> HashMap<NaiveDate, DayFlows> {
        let mut flows: HashMap<NaiveDate, DayFlows> = HashMap::new();
        for entry in self.entries.iter().filter(|e| e.date <= end) {
            let day = flows.entry(entry.date).or_default();
            match entry.kind() {
                EntryKind::Valuation => day.valuation = Some(entry.amount),
                EntryKind::Transaction | EntryKind::Trade => day.delta += self.flow_delta(entry),
            }
        }
        flows
    }

    fn daily_non_cash(&self, end: NaiveDate) -> HashMap<NaiveDate, Decimal> {
        let mut values: HashMap<NaiveDate, Decimal> = HashMap::new();
        for holding in self.holdings.iter().filter(|h| h.date <= end) {
            *values.entry(holding.date).or_insert(Decimal::ZERO) += holding.amount;
        }
        values
    }

    fn forward(
        &self,
        from: NaiveDate,
        end: NaiveDate,
        flows: &HashMap<NaiveDate, DayFlows>,
    ) -> Vec<(NaiveDate, Decimal)> {
        let mut balance = Decimal::ZERO;
        get_days_between(from, end)
            .into_iter()
            .map(|date| {
                if let Some(day) = flows.get(&date) {
                    // A valuation states the end-of-day balance outright.
                    balance = match day.valuation {
                        Some(value) => value,
                        None => balance + day.delta,
                    };
                }
                (date, balance)
            })
            .collect()
    }

    fn reverse(
        &self,
        from: NaiveDate,
        end: NaiveDate,
        flows: &HashMap<NaiveDate, DayFlows>,
    ) -> Vec<(NaiveDate, Decimal)> {
        let mut balance = self.account.balance;
        let mut series: Vec<(NaiveDate, Decimal)> = get_days_between(from, end)
            .into_iter()
            .rev()
            .map(|date| {
                let end_of_day = balance;
                if let Some(day) = flows.get(&date) {
                    balance -= day.delta;
                }
                (date, end_of_day)
            })
            .collect();
        series.reverse();
        series
    }
}

#[derive(Debug, Default)]
struct DayFlows {
    delta: Decimal,
    valuation: Option<Decimal>,
}
