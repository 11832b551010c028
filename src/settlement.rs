use soroban_sdk::{contractclient, contracttype, Address, Env};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SettlementStatus {
    Withdrawable,
    Active,
    Default,
    Paid,
}

/// Surface of a deployed settlement contract. Accrual, repayment and
/// collateral custody live there, not here.
#[contractclient(name = "SettlementClient")]
pub trait SettlementInterface {
    fn get_status(env: Env) -> SettlementStatus;
    fn calculate_redemption(env: Env) -> i128;
    fn pay_loan(env: Env, payer: Address, amount: i128);
    fn get_my_loan(env: Env, borrower: Address);
    fn withdraw_nft_borrower(env: Env, borrower: Address);
    fn withdraw_nft_lender(env: Env, lender: Address);
}
