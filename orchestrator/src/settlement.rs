use crate::error::OrchestratorError;
use nft_loan_request::{SettlementClient, SettlementStatus};
use soroban_sdk::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementView {
    pub address: Address,
    pub status: SettlementStatus,
    pub outstanding: i128,
}

/// Repayment and collateral moves against a deployed settlement contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementAction {
    PayLoan(i128),
    /// Borrower collects the funded principal.
    ClaimLoan,
    WithdrawNftBorrower,
    WithdrawNftLender,
}

/// Read access to a deployed settlement contract.
pub trait SettlementReader {
    fn view(&self) -> Result<SettlementView, OrchestratorError>;
}

impl SettlementReader for SettlementClient<'_> {
    fn view(&self) -> Result<SettlementView, OrchestratorError> {
        let status = match self.try_get_status() {
            Ok(Ok(status)) => status,
            _ => return Err(OrchestratorError::Settlement),
        };
        let outstanding = match self.try_calculate_redemption() {
            Ok(Ok(amount)) => amount,
            _ => return Err(OrchestratorError::Settlement),
        };
        Ok(SettlementView {
            address: self.address.clone(),
            status,
            outstanding,
        })
    }
}

/// Settlement calls made on behalf of a wallet account.
pub trait SettlementActor {
    fn act(&self, account: &Address, action: SettlementAction) -> Result<(), OrchestratorError>;
}

impl SettlementActor for SettlementClient<'_> {
    fn act(&self, account: &Address, action: SettlementAction) -> Result<(), OrchestratorError> {
        let outcome = match action {
            SettlementAction::PayLoan(amount) => self.try_pay_loan(account, &amount),
            SettlementAction::ClaimLoan => self.try_get_my_loan(account),
            SettlementAction::WithdrawNftBorrower => self.try_withdraw_nft_borrower(account),
            SettlementAction::WithdrawNftLender => self.try_withdraw_nft_lender(account),
        };
        match outcome {
            Ok(Ok(())) => Ok(()),
            _ => Err(OrchestratorError::SettlementRejected(action)),
        }
    }
}
