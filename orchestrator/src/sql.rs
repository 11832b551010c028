//! Statement text for the hosted loan table.
use crate::mirror::LoanRow;

const COLUMNS: &str = "collateral, token_id, sequence_id, borrower, lender, \
initial_loan_value, rate, expiration, borrower_signed, lender_signed, contract_address";

const UPDATED_COLUMNS: [&str; 8] = [
    "borrower",
    "lender",
    "initial_loan_value",
    "rate",
    "expiration",
    "borrower_signed",
    "lender_signed",
    "contract_address",
];

pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn optional_literal(value: &Option<String>) -> String {
    match value {
        Some(text) => quote_literal(text),
        None => "NULL".to_string(),
    }
}

pub fn upsert_statement(table: &str, row: &LoanRow) -> String {
    let values = [
        quote_literal(&row.collateral),
        row.token_id.to_string(),
        row.sequence_id.to_string(),
        quote_literal(&row.borrower),
        optional_literal(&row.lender),
        row.initial_loan_value.to_string(),
        row.rate.to_string(),
        row.expiration.to_string(),
        row.borrower_signed.to_string(),
        row.lender_signed.to_string(),
        optional_literal(&row.contract_address),
    ];
    let updates = UPDATED_COLUMNS
        .iter()
        .map(|column| format!("{column} = excluded.{column}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({COLUMNS}) VALUES ({}) \
ON CONFLICT (collateral, token_id, sequence_id) DO UPDATE SET {updates}",
        quote_identifier(table),
        values.join(", "),
    )
}

pub fn delete_statement(table: &str, row: &LoanRow) -> String {
    format!(
        "DELETE FROM {} WHERE collateral = {} AND token_id = {} AND sequence_id = {}",
        quote_identifier(table),
        quote_literal(&row.collateral),
        row.token_id,
        row.sequence_id,
    )
}

pub fn select_by_borrower(table: &str, borrower: &str) -> String {
    format!(
        "SELECT {COLUMNS} FROM {} WHERE borrower = {} ORDER BY sequence_id",
        quote_identifier(table),
        quote_literal(borrower),
    )
}
