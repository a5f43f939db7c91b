//! Wire shapes of the aggregator REST API and their mapping to core models.
//!
//! Responses that already match the core payload types deserialize straight
//! into them; only the envelopes and the diverging shapes live here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgersync_core::providers::{
    CreditLiability, LiabilitiesSnapshot, MortgageLiability, ProviderAccount, ProviderHolding,
    ProviderInstitution, ProviderInvestmentTransaction, ProviderItem, ProviderSecurity,
    StudentLoanLiability,
};

use crate::webhook_verifier::VerificationKey;

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemResponse {
    pub item: ProviderItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstitutionResponse {
    pub institution: ApiInstitution,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiInstitution {
    pub institution_id: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<ApiInstitution> for ProviderInstitution {
    fn from(api: ApiInstitution) -> Self {
        Self {
            institution_id: api.institution_id,
            name: api.name,
            // Logos arrive as base64 PNG data.
            logo_url: api.logo.map(|logo| format!("data:image/png;base64,{}", logo)),
            brand_color: api.primary_color,
            url: api.url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<ProviderAccount>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HoldingsResponse {
    #[serde(default)]
    pub holdings: Vec<ProviderHolding>,
    #[serde(default)]
    pub securities: Vec<ProviderSecurity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvestmentTransactionsResponse {
    #[serde(default)]
    pub investment_transactions: Vec<ProviderInvestmentTransaction>,
    #[serde(default)]
    pub securities: Vec<ProviderSecurity>,
    #[serde(default)]
    pub total_investment_transactions: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct InvestmentTransactionsOptions {
    pub count: usize,
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LiabilitiesResponse {
    pub liabilities: ApiLiabilities,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiLiabilities {
    #[serde(default)]
    pub credit: Option<Vec<ApiCreditLiability>>,
    #[serde(default)]
    pub mortgage: Option<Vec<ApiMortgageLiability>>,
    #[serde(default)]
    pub student: Option<Vec<StudentLoanLiability>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiApr {
    pub apr_percentage: Option<Decimal>,
    pub apr_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCreditLiability {
    pub account_id: String,
    #[serde(default)]
    pub aprs: Vec<ApiApr>,
    pub minimum_payment_amount: Option<Decimal>,
    pub last_statement_balance: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiInterestRate {
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMortgageLiability {
    pub account_id: String,
    pub interest_rate: Option<ApiInterestRate>,
    pub maturity_date: Option<NaiveDate>,
    pub origination_principal_amount: Option<Decimal>,
}

impl From<ApiCreditLiability> for CreditLiability {
    fn from(api: ApiCreditLiability) -> Self {
        // The purchase APR is the headline rate; fall back to whatever comes first.
        let apr_percentage = api
            .aprs
            .iter()
            .find(|apr| apr.apr_type.as_deref() == Some("purchase_apr"))
            .or_else(|| api.aprs.first())
            .and_then(|apr| apr.apr_percentage);
        Self {
            account_id: api.account_id,
            apr_percentage,
            minimum_payment_amount: api.minimum_payment_amount,
            last_statement_balance: api.last_statement_balance,
        }
    }
}

impl From<ApiMortgageLiability> for MortgageLiability {
    fn from(api: ApiMortgageLiability) -> Self {
        Self {
            account_id: api.account_id,
            interest_rate_percentage: api.interest_rate.and_then(|rate| rate.percentage),
            maturity_date: api.maturity_date,
            origination_principal_amount: api.origination_principal_amount,
        }
    }
}

impl From<ApiLiabilities> for LiabilitiesSnapshot {
    fn from(api: ApiLiabilities) -> Self {
        Self {
            credit: api
                .credit
                .unwrap_or_default()
                .into_iter()
                .map(CreditLiability::from)
                .collect(),
            mortgage: api
                .mortgage
                .unwrap_or_default()
                .into_iter()
                .map(MortgageLiability::from)
                .collect(),
            student: api.student.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerificationKeyResponse {
    pub key: VerificationKey,
}
