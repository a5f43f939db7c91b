use super::accounts_model::AccountClassification;

/// Account type constants, as reported by providers or chosen for manual accounts.
pub mod account_types {
    pub const DEPOSITORY: &str = "depository";
    pub const CREDIT: &str = "credit";
    pub const LOAN: &str = "loan";
    pub const INVESTMENT: &str = "investment";
    pub const PROPERTY: &str = "property";
    pub const OTHER: &str = "other";
}

/// Returns the balance-sheet side an account type belongs to.
///
/// Credit cards and loans are liabilities; everything else is an asset.
pub fn classification_for_account_type(account_type: &str) -> AccountClassification {
    match account_type.to_ascii_lowercase().as_str() {
        account_types::CREDIT | account_types::LOAN => AccountClassification::Liability,
        _ => AccountClassification::Asset,
    }
}

/// Returns true if the given account type is one we know how to import.
pub fn is_valid_account_type(account_type: &str) -> bool {
    matches!(
        account_type,
        account_types::DEPOSITORY
            | account_types::CREDIT
            | account_types::LOAN
            | account_types::INVESTMENT
            | account_types::PROPERTY
            | account_types::OTHER
    )
}

/// Key inside the account meta JSON holding imported liability details.
pub const LIABILITY_META_KEY: &str = "liability";
