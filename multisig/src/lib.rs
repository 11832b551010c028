#![no_std]

mod contract;
mod errors;
mod storage_types;

pub use crate::contract::{MultiSig, MultiSigClient};
pub use crate::errors::Error;
