use soroban_sdk::{contracttype, Address};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) const LOAN_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const LOAN_LIFETIME_THRESHOLD: u32 = LOAN_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Strkey of the all-zero ed25519 account, the "no address" sentinel.
pub const ZERO_ADDRESS: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

pub(crate) const MAX_RATE_PERCENT: u32 = 100;

/// Which signatures a field mutation clears.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum InvalidationPolicy {
    LenderOnly,
    BothParties,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Config {
    pub escrow_deployer: Address,
    pub invalidation: InvalidationPolicy,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct LoanRequest {
    pub borrower: Address,
    pub loan_id: u32,
    pub collateral: Address,
    pub token_id: u128,
    pub initial_loan_value: i128,
    // integer percent, 0..=100
    pub rate: u32,
    // absolute unix timestamp of maturity
    pub expiration: u64,
    pub lender: Option<Address>,
    pub borrower_signed: bool,
    pub lender_signed: bool,
    pub contract_address: Option<Address>,
}

/// Finalized terms handed to the escrow deployer.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct LoanTerms {
    pub registry: Address,
    pub borrower: Address,
    pub lender: Address,
    pub collateral: Address,
    pub token_id: u128,
    pub initial_loan_value: i128,
    pub rate: u32,
    pub expiration: u64,
    pub loan_id: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum RequestStatus {
    Unconfirmed,
    Confirmed,
}

#[derive(Clone)]
#[contracttype]
pub struct LoanKey {
    pub borrower: Address,
    pub loan_id: u32,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Config,
    LoanCount(Address),
    Loan(LoanKey),
}
