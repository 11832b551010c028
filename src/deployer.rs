use crate::storage_types::LoanTerms;
use soroban_sdk::{contractclient, Address, Env};

/// Factory that instantiates one settlement contract per confirmed loan.
#[contractclient(name = "EscrowDeployerClient")]
pub trait EscrowDeployerInterface {
    fn deploy(env: Env, terms: LoanTerms) -> Address;
}

pub fn deploy_escrow(e: &Env, deployer: &Address, terms: &LoanTerms) -> Address {
    EscrowDeployerClient::new(e, deployer).deploy(terms)
}
