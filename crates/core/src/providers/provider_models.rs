//! Payload types exchanged with aggregation providers.
//!
//! These mirror the shape every concrete provider is normalized into. Amounts
//! follow the provider convention: positive is money leaving the account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Data product an item can be enabled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    Transactions,
    Investments,
    Liabilities,
    #[serde(other)]
    Other,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Transactions => "transactions",
            Product::Investments => "investments",
            Product::Liabilities => "liabilities",
            Product::Other => "other",
        }
    }
}

/// Result of exchanging a short-lived public token for a long-lived credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct PublicTokenExchange {
    pub item_id: String,
    pub access_token: String,
}

impl std::fmt::Debug for PublicTokenExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicTokenExchange")
            .field("item_id", &self.item_id)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderItem {
    pub item_id: String,
    pub institution_id: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInstitution {
    pub institution_id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub brand_color: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderBalances {
    pub current: Option<Decimal>,
    pub available: Option<Decimal>,
    pub iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAccount {
    pub account_id: String,
    pub name: String,
    pub official_name: Option<String>,
    pub mask: Option<String>,
    /// Provider account type: depository, credit, loan, investment or other.
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    #[serde(default)]
    pub balances: ProviderBalances,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTransaction {
    pub transaction_id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub iso_currency_code: Option<String>,
    pub date: NaiveDate,
    pub name: String,
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub pending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedTransaction {
    pub transaction_id: String,
    pub account_id: Option<String>,
}

/// One page of an incremental, cursor-based transactions fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsPage {
    #[serde(default)]
    pub added: Vec<ProviderTransaction>,
    #[serde(default)]
    pub modified: Vec<ProviderTransaction>,
    #[serde(default)]
    pub removed: Vec<RemovedTransaction>,
    pub next_cursor: String,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSecurity {
    pub security_id: String,
    pub ticker_symbol: Option<String>,
    pub name: Option<String>,
    pub close_price: Option<Decimal>,
    pub iso_currency_code: Option<String>,
    #[serde(rename = "type")]
    pub security_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderHolding {
    pub account_id: String,
    pub security_id: String,
    pub quantity: Decimal,
    pub institution_price: Decimal,
    pub institution_value: Option<Decimal>,
    pub iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInvestmentTransaction {
    pub investment_transaction_id: String,
    pub account_id: String,
    pub security_id: Option<String>,
    pub date: NaiveDate,
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub amount: Decimal,
    pub iso_currency_code: Option<String>,
    /// buy, sell, cash, fee, transfer or cancel.
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub subtype: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvestmentsSnapshot {
    #[serde(default)]
    pub holdings: Vec<ProviderHolding>,
    #[serde(default)]
    pub transactions: Vec<ProviderInvestmentTransaction>,
    #[serde(default)]
    pub securities: Vec<ProviderSecurity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditLiability {
    pub account_id: String,
    pub apr_percentage: Option<Decimal>,
    pub minimum_payment_amount: Option<Decimal>,
    pub last_statement_balance: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageLiability {
    pub account_id: String,
    pub interest_rate_percentage: Option<Decimal>,
    pub maturity_date: Option<NaiveDate>,
    pub origination_principal_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoanLiability {
    pub account_id: String,
    pub interest_rate_percentage: Option<Decimal>,
    pub minimum_payment_amount: Option<Decimal>,
    pub expected_payoff_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiabilitiesSnapshot {
    #[serde(default)]
    pub credit: Vec<CreditLiability>,
    #[serde(default)]
    pub mortgage: Vec<MortgageLiability>,
    #[serde(default)]
    pub student: Vec<StudentLoanLiability>,
}

/// Inclusive date range for window-bounded fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}
