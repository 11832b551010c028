use crate::error::MirrorError;
use crate::sql;
use nft_loan_request::LoanRequest;
use serde::{Deserialize, Serialize};
use soroban_sdk::Address;
use std::collections::BTreeMap;

/// Strkey text of an address, as stored in the hosted table.
pub fn address_text(address: &Address) -> String {
    let strkey = address.to_string();
    let mut buf = vec![0u8; strkey.len() as usize];
    strkey.copy_into_slice(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// One row of the hosted loan table, keyed by
/// `(collateral, token_id, sequence_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRow {
    pub collateral: String,
    pub token_id: u128,
    pub sequence_id: u32,
    pub borrower: String,
    pub lender: Option<String>,
    pub initial_loan_value: i128,
    pub rate: u32,
    pub expiration: u64,
    pub borrower_signed: bool,
    pub lender_signed: bool,
    pub contract_address: Option<String>,
}

impl LoanRow {
    pub fn from_request(loan: &LoanRequest) -> Self {
        LoanRow {
            collateral: address_text(&loan.collateral),
            token_id: loan.token_id,
            sequence_id: loan.loan_id,
            borrower: address_text(&loan.borrower),
            lender: loan.lender.as_ref().map(address_text),
            initial_loan_value: loan.initial_loan_value,
            rate: loan.rate,
            expiration: loan.expiration,
            borrower_signed: loan.borrower_signed,
            lender_signed: loan.lender_signed,
            contract_address: loan.contract_address.as_ref().map(address_text),
        }
    }

    pub(crate) fn key(&self) -> (String, u128, u32) {
        (self.collateral.clone(), self.token_id, self.sequence_id)
    }
}

/// The off-chain copy of registry state. Not authoritative.
pub trait MirrorStore {
    fn upsert(&mut self, row: &LoanRow) -> Result<(), MirrorError>;
    /// Drops the row stored under the key of `row`.
    fn remove(&mut self, row: &LoanRow) -> Result<(), MirrorError>;
    fn rows_for(&self, borrower: &str) -> Result<Vec<LoanRow>, MirrorError>;
}

#[derive(Debug, Default)]
pub struct MemoryMirror {
    rows: BTreeMap<(String, u128, u32), LoanRow>,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl MirrorStore for MemoryMirror {
    fn upsert(&mut self, row: &LoanRow) -> Result<(), MirrorError> {
        self.rows.insert(row.key(), row.clone());
        Ok(())
    }

    fn remove(&mut self, row: &LoanRow) -> Result<(), MirrorError> {
        self.rows.remove(&row.key());
        Ok(())
    }

    fn rows_for(&self, borrower: &str) -> Result<Vec<LoanRow>, MirrorError> {
        Ok(self
            .rows
            .values()
            .filter(|row| row.borrower == borrower)
            .cloned()
            .collect())
    }
}

/// Request/response channel to the hosted SQL endpoint. `query` returns the
/// JSON array body of the response.
pub trait SqlTransport {
    fn execute(&mut self, statement: &str) -> Result<(), MirrorError>;
    fn query(&self, statement: &str) -> Result<String, MirrorError>;
}

pub struct SqlMirror<T> {
    transport: T,
    table: String,
}

impl<T: SqlTransport> SqlMirror<T> {
    pub fn new(transport: T, table: impl Into<String>) -> Self {
        SqlMirror {
            transport,
            table: table.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: SqlTransport> MirrorStore for SqlMirror<T> {
    fn upsert(&mut self, row: &LoanRow) -> Result<(), MirrorError> {
        self.transport
            .execute(&sql::upsert_statement(&self.table, row))
    }

    fn remove(&mut self, row: &LoanRow) -> Result<(), MirrorError> {
        self.transport
            .execute(&sql::delete_statement(&self.table, row))
    }

    fn rows_for(&self, borrower: &str) -> Result<Vec<LoanRow>, MirrorError> {
        let body = self
            .transport
            .query(&sql::select_by_borrower(&self.table, borrower))?;
        Ok(serde_json::from_str(&body)?)
    }
}
