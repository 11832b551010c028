//! Readiness check and the one-shot deployment latch.
use crate::deployer::deploy_escrow;
use crate::events;
use crate::loan::{is_zero_address, write_loan};
use crate::signoff::fully_signed;
use crate::storage_types::{Config, LoanRequest, LoanTerms};
use crate::Error;
use soroban_sdk::{log, Address, Env};

pub fn is_ready(e: &Env, loan: &LoanRequest) -> bool {
    let lender_assigned = match &loan.lender {
        Some(lender) => !is_zero_address(e, lender),
        None => false,
    };
    fully_signed(loan)
        && lender_assigned
        && !is_zero_address(e, &loan.collateral)
        && loan.initial_loan_value > 0
        && loan.rate > 0
        && loan.expiration > 0
}

fn terms_of(e: &Env, loan: &LoanRequest, lender: Address) -> LoanTerms {
    LoanTerms {
        registry: e.current_contract_address(),
        borrower: loan.borrower.clone(),
        lender,
        collateral: loan.collateral.clone(),
        token_id: loan.token_id,
        initial_loan_value: loan.initial_loan_value,
        rate: loan.rate,
        expiration: loan.expiration,
        loan_id: loan.loan_id,
    }
}

/// Deploys the settlement contract if the request just became ready.
///
/// Returns the new contract address only on the call that deployed it. A
/// request that already carries a contract address is left untouched.
pub fn evaluate(e: &Env, config: &Config, loan: &mut LoanRequest) -> Result<Option<Address>, Error> {
    if loan.contract_address.is_some() || !is_ready(e, loan) {
        return Ok(None);
    }
    let lender = match &loan.lender {
        Some(lender) => lender.clone(),
        None => return Ok(None),
    };

    let terms = terms_of(e, loan, lender.clone());
    let contract_address = deploy_escrow(e, &config.escrow_deployer, &terms);

    loan.contract_address = Some(contract_address.clone());
    write_loan(e, loan);

    log!(
        e,
        "loan {} of {} confirmed, settlement at {}",
        loan.loan_id,
        loan.borrower,
        contract_address
    );
    events::deployed(e, &contract_address, &loan.borrower, &lender, loan.loan_id);
    Ok(Some(contract_address))
}
