use soroban_sdk::{contracttype, Address, BytesN};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

// Same field set as the registry's term sheet, so the two encode identically.
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

#[derive(Clone)]
#[contracttype]
pub struct DeployerSettings {
    pub registry: Address,
    pub wasm_hash: BytesN<32>,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Settings,
}
