//! Column names the pruner always removes.

/// Columns only known after origination; they leak the outcome.
pub const LEAKAGE_COLUMNS: [&str; 18] = [
    "last_pymnt_d",
    "next_pymnt_d",
    "hardship_flag",
    "disbursement_method",
    "debt_settlement_flag",
    "out_prncp",
    "out_prncp_inv",
    "total_pymnt",
    "total_pymnt_inv",
    "total_rec_prncp",
    "total_rec_int",
    "total_rec_late_fee",
    "recoveries",
    "collection_recovery_fee",
    "last_pymnt_amnt",
    "last_credit_pull_d",
    "last_fico_range_high",
    "last_fico_range_low",
];

/// Identifiers and free text with no predictive use.
pub const IDENTIFIER_COLUMNS: [&str; 9] = [
    "id",
    "emp_title",
    "url",
    "title",
    "zip_code",
    "policy_code",
    "earliest_cr_line",
    "desc",
    "initial_list_status",
];

/// Hardship programme and settlement columns, matched by name.
pub fn is_hardship_or_settlement(column: &str) -> bool {
    column.starts_with("hardship") || column.contains("settlement")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardship_or_settlement() {
        assert!(is_hardship_or_settlement("hardship_amount"));
        assert!(is_hardship_or_settlement("settlement_status"));
        assert!(is_hardship_or_settlement("debt_settlement_flag_date"));
        assert!(!is_hardship_or_settlement("orig_hardship"));
        assert!(!is_hardship_or_settlement("loan_amnt"));
    }
}
