#![no_std]

mod contract;
mod errors;
mod storage_types;

pub use crate::contract::{EscrowDeployer, EscrowDeployerClient};
pub use crate::errors::Error;
pub use crate::storage_types::LoanTerms;
