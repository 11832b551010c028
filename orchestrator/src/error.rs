use crate::settlement::SettlementAction;
use nft_loan_request::Error as ContractError;
use thiserror::Error;

/// Rejections reported by the on-chain registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("caller is not the borrower of this loan")]
    NotBorrower,
    #[error("signer is neither the borrower nor the lender of this loan")]
    NotValidSigner,
    #[error("collateral must be a non-zero address")]
    InvalidCollateral,
    #[error("a borrower cannot lend to themselves")]
    BorrowerIsLender,
    #[error("only unconfirmed contracts can be accessed")]
    AlreadyConfirmed,
    #[error("no loans exist for this borrower")]
    NoSuchLoan,
    #[error("loan value cannot be negative")]
    NegativeAmount,
    #[error("rate must be a percentage between 0 and 100")]
    InvalidRate,
    #[error("registry is not initialized")]
    NotInitialized,
    #[error("registry rejected the call with code {0}")]
    Rejected(u32),
    #[error("registry call did not complete")]
    Transport,
}

impl From<ContractError> for RegistryError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::NotBorrower => RegistryError::NotBorrower,
            ContractError::NotValidSigner => RegistryError::NotValidSigner,
            ContractError::InvalidCollateral => RegistryError::InvalidCollateral,
            ContractError::BorrowerIsLender => RegistryError::BorrowerIsLender,
            ContractError::AlreadyConfirmed => RegistryError::AlreadyConfirmed,
            ContractError::NoSuchLoan => RegistryError::NoSuchLoan,
            ContractError::NegativeAmount => RegistryError::NegativeAmount,
            ContractError::InvalidRate => RegistryError::InvalidRate,
            ContractError::NotInitialized => RegistryError::NotInitialized,
            ContractError::AlreadyInitialized | ContractError::NotAllowed => {
                RegistryError::Rejected(err as u32)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("mirror store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed mirror response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Mirror(#[from] MirrorError),
    #[error("invalid configuration: {0}")]
    Config(serde_json::Error),
    #[error("settlement contract could not be read")]
    Settlement,
    #[error("settlement contract rejected {0:?}")]
    SettlementRejected(SettlementAction),
    #[error("payment amount must be positive, got {0}")]
    InvalidAmount(i128),
}
