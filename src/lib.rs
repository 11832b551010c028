#![no_std]

mod admin;
mod confirmation;
mod contract;
mod deployer;
mod errors;
mod events;
mod loan;
mod settlement;
mod signoff;
mod storage_types;

pub use crate::contract::{LoanRequestContract, LoanRequestContractClient};
pub use crate::deployer::{EscrowDeployerClient, EscrowDeployerInterface};
pub use crate::errors::Error;
pub use crate::settlement::{SettlementClient, SettlementInterface, SettlementStatus};
pub use crate::storage_types::{
    Config, InvalidationPolicy, LoanRequest, LoanTerms, RequestStatus, ZERO_ADDRESS,
};
