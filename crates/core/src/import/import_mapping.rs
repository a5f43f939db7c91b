//! Conversion of provider payloads into internal records.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::accounts::{
    account_types, classification_for_account_type, is_valid_account_type, Account,
    LiabilityDetails, NewAccount,
};
use crate::constants::DEFAULT_CURRENCY;
use crate::entries::{EntryPayload, NewEntry};
use crate::investments::{NewHolding, NewSecurity};
use crate::items::LinkedItem;
use crate::providers::{
    CreditLiability, InvestmentsSnapshot, MortgageLiability, ProviderAccount, ProviderHolding,
    ProviderInvestmentTransaction, ProviderTransaction, StudentLoanLiability,
};

/// Investment transaction types that move units of a security.
const TRADE_TYPES: [&str; 2] = ["buy", "sell"];

pub fn map_account(item: &LinkedItem, account: &ProviderAccount) -> NewAccount {
    let account_type = account.account_type.to_ascii_lowercase();
    let account_type = if is_valid_account_type(&account_type) {
        account_type
    } else {
        account_types::OTHER.to_string()
    };

    NewAccount {
        id: None,
        family_id: item.family_id.clone(),
        linked_item_id: Some(item.id.clone()),
        external_id: Some(account.account_id.clone()),
        name: if account.name.trim().is_empty() {
            account
                .official_name
                .clone()
                .unwrap_or_else(|| account.account_id.clone())
        } else {
            account.name.clone()
        },
        classification: classification_for_account_type(&account_type),
        account_type,
        subtype: account.subtype.clone(),
        currency: account
            .balances
            .iso_currency_code
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        balance: account.balances.current.unwrap_or_default(),
        is_active: true,
        meta: None,
    }
}

pub fn map_transaction(account: &Account, transaction: &ProviderTransaction) -> NewEntry {
    NewEntry {
        account_id: account.id.clone(),
        external_id: Some(transaction.transaction_id.clone()),
        date: transaction.date,
        name: transaction.name.clone(),
        amount: transaction.amount,
        currency: transaction
            .iso_currency_code
            .clone()
            .unwrap_or_else(|| account.currency.clone()),
        payload: EntryPayload::Transaction {
            merchant_name: transaction.merchant_name.clone(),
            pending: transaction.pending,
        },
    }
}

/// Buys and sells of a known security become trades; cash movements, fees,
/// dividends and transfers become plain transactions.
pub fn map_investment_transaction(
    account: &Account,
    transaction: &ProviderInvestmentTransaction,
    security_ids: &HashMap<String, String>,
) -> NewEntry {
    let is_trade = TRADE_TYPES.contains(&transaction.transaction_type.to_ascii_lowercase().as_str());
    let security_id = transaction
        .security_id
        .as_ref()
        .and_then(|provider_id| security_ids.get(provider_id));

    let payload = match security_id {
        Some(security_id) if is_trade => EntryPayload::Trade {
            security_id: security_id.clone(),
            quantity: transaction.quantity,
            price: transaction.price,
        },
        _ => EntryPayload::transaction(),
    };

    NewEntry {
        account_id: account.id.clone(),
        external_id: Some(transaction.investment_transaction_id.clone()),
        date: transaction.date,
        name: transaction.name.clone(),
        amount: transaction.amount,
        currency: transaction
            .iso_currency_code
            .clone()
            .unwrap_or_else(|| account.currency.clone()),
        payload,
    }
}

/// Merges the securities referenced by holdings and transactions into one
/// list with a single row per provider security id.
///
/// Securities only referenced by id get a bare row so the reference can
/// still be resolved.
pub fn collect_securities(snapshot: &InvestmentsSnapshot) -> Vec<NewSecurity> {
    let mut securities: BTreeMap<String, NewSecurity> = BTreeMap::new();

    for security in &snapshot.securities {
        securities.insert(
            security.security_id.clone(),
            NewSecurity {
                provider_security_id: security.security_id.clone(),
                ticker: security.ticker_symbol.clone(),
                name: security.name.clone(),
                currency: security.iso_currency_code.clone(),
                security_type: security.security_type.clone(),
            },
        );
    }

    let referenced = snapshot
        .holdings
        .iter()
        .map(|h| h.security_id.as_str())
        .chain(
            snapshot
                .transactions
                .iter()
                .filter_map(|t| t.security_id.as_deref()),
        );
    for provider_id in referenced {
        securities
            .entry(provider_id.to_string())
            .or_insert_with(|| NewSecurity {
                provider_security_id: provider_id.to_string(),
                ticker: None,
                name: None,
                currency: None,
                security_type: None,
            });
    }

    securities.into_values().collect()
}

pub fn map_holding(
    account: &Account,
    holding: &ProviderHolding,
    security_id: &str,
    as_of: NaiveDate,
) -> NewHolding {
    NewHolding {
        account_id: account.id.clone(),
        security_id: security_id.to_string(),
        date: as_of,
        quantity: holding.quantity,
        price: holding.institution_price,
        amount: holding
            .institution_value
            .unwrap_or(holding.quantity * holding.institution_price),
        currency: holding
            .iso_currency_code
            .clone()
            .unwrap_or_else(|| account.currency.clone()),
    }
}

pub fn credit_details(liability: &CreditLiability) -> LiabilityDetails {
    LiabilityDetails::Credit {
        apr_percentage: liability.apr_percentage,
        minimum_payment: liability.minimum_payment_amount,
        last_statement_balance: liability.last_statement_balance,
    }
}

pub fn mortgage_details(liability: &MortgageLiability) -> LiabilityDetails {
    LiabilityDetails::Mortgage {
        interest_rate_percentage: liability.interest_rate_percentage,
        maturity_date: liability.maturity_date,
        origination_principal: liability.origination_principal_amount,
    }
}

pub fn student_loan_details(liability: &StudentLoanLiability) -> LiabilityDetails {
    LiabilityDetails::Student {
        interest_rate_percentage: liability.interest_rate_percentage,
        minimum_payment: liability.minimum_payment_amount,
        expected_payoff_date: liability.expected_payoff_date,
    }
}
