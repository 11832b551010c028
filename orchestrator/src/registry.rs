use crate::error::RegistryError;
use nft_loan_request::{Error as ContractError, LoanRequest, LoanRequestContractClient};
use soroban_sdk::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub collateral: Address,
    pub token_id: u128,
    pub initial_loan_value: i128,
    pub rate: u32,
    pub expiration: u64,
    pub lender: Option<Address>,
}

/// A single-field change to an unconfirmed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Collateral { collateral: Address, token_id: u128 },
    InitialLoanValue(i128),
    Rate(u32),
    Expiration(u64),
    Lender(Option<Address>),
}

/// Registry operations the client needs. Every mutating call names the
/// wallet account it acts for.
pub trait LoanRegistry {
    fn create_loan_request(&self, borrower: &Address, loan: &NewLoan) -> Result<u32, RegistryError>;

    fn edit(
        &self,
        caller: &Address,
        borrower: &Address,
        loan_id: u32,
        edit: &FieldEdit,
    ) -> Result<(), RegistryError>;

    fn sign(
        &self,
        signer: &Address,
        borrower: &Address,
        loan_id: u32,
    ) -> Result<Option<Address>, RegistryError>;

    fn remove_signature(
        &self,
        signer: &Address,
        borrower: &Address,
        loan_id: u32,
    ) -> Result<(), RegistryError>;

    fn loans(&self, borrower: &Address) -> Result<Vec<LoanRequest>, RegistryError>;
}

// Flattens the nested result of a generated `try_*` call.
fn settle<T, C, I>(result: Result<Result<T, C>, Result<ContractError, I>>) -> Result<T, RegistryError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(err)) => Err(err.into()),
        Ok(Err(_)) | Err(Err(_)) => Err(RegistryError::Transport),
    }
}

impl LoanRegistry for LoanRequestContractClient<'_> {
    fn create_loan_request(&self, borrower: &Address, loan: &NewLoan) -> Result<u32, RegistryError> {
        settle(self.try_create_loan_request(
            borrower,
            &loan.collateral,
            &loan.token_id,
            &loan.initial_loan_value,
            &loan.rate,
            &loan.expiration,
            &loan.lender,
        ))
    }

    fn edit(
        &self,
        caller: &Address,
        borrower: &Address,
        loan_id: u32,
        edit: &FieldEdit,
    ) -> Result<(), RegistryError> {
        match edit {
            FieldEdit::Collateral {
                collateral,
                token_id,
            } => settle(self.try_set_collateral(caller, borrower, &loan_id, collateral, token_id)),
            FieldEdit::InitialLoanValue(value) => {
                settle(self.try_set_initial_loan_value(caller, borrower, &loan_id, value))
            }
            FieldEdit::Rate(rate) => settle(self.try_set_rate(caller, borrower, &loan_id, rate)),
            FieldEdit::Expiration(expiration) => {
                settle(self.try_set_expiration(caller, borrower, &loan_id, expiration))
            }
            FieldEdit::Lender(lender) => {
                settle(self.try_set_lender(caller, borrower, &loan_id, lender))
            }
        }
    }

    fn sign(
        &self,
        signer: &Address,
        borrower: &Address,
        loan_id: u32,
    ) -> Result<Option<Address>, RegistryError> {
        settle(self.try_sign(signer, borrower, &loan_id))
    }

    fn remove_signature(
        &self,
        signer: &Address,
        borrower: &Address,
        loan_id: u32,
    ) -> Result<(), RegistryError> {
        settle(self.try_remove_signature(signer, borrower, &loan_id))
    }

    fn loans(&self, borrower: &Address) -> Result<Vec<LoanRequest>, RegistryError> {
        match self.try_get_loans(borrower) {
            Ok(Ok(loans)) => Ok(loans.iter().collect()),
            _ => Err(RegistryError::Transport),
        }
    }
}
