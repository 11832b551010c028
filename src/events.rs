use crate::storage_types::LoanRequest;
use soroban_sdk::{symbol_short, Address, Env, Symbol};

pub(crate) const SUBMITTED: Symbol = symbol_short!("submitted");
pub(crate) const CHANGED: Symbol = symbol_short!("changed");
pub(crate) const LENDER_CHANGED: Symbol = symbol_short!("lend_chg");
pub(crate) const SIGNED: Symbol = symbol_short!("signed");
pub(crate) const UNSIGNED: Symbol = symbol_short!("unsigned");
pub(crate) const DEPLOYED: Symbol = symbol_short!("deployed");

pub(crate) const FIELD_COLLATERAL: Symbol = symbol_short!("collat");
pub(crate) const FIELD_VALUE: Symbol = symbol_short!("value");
pub(crate) const FIELD_RATE: Symbol = symbol_short!("rate");
pub(crate) const FIELD_EXPIRATION: Symbol = symbol_short!("expiry");

pub fn submitted(e: &Env, loan: &LoanRequest) {
    e.events().publish(
        (SUBMITTED, loan.borrower.clone()),
        (
            loan.loan_id,
            loan.collateral.clone(),
            loan.token_id,
            loan.initial_loan_value,
            loan.rate,
            loan.expiration,
        ),
    );
}

pub fn changed(e: &Env, borrower: &Address, loan_id: u32, field: Symbol) {
    e.events()
        .publish((CHANGED, borrower.clone()), (loan_id, field));
}

pub fn lender_changed(e: &Env, borrower: &Address, loan_id: u32, lender: &Option<Address>) {
    e.events()
        .publish((LENDER_CHANGED, borrower.clone()), (loan_id, lender.clone()));
}

pub fn signed(e: &Env, signer: &Address, borrower: &Address, loan_id: u32, confirmed: bool) {
    e.events().publish(
        (SIGNED, signer.clone()),
        (borrower.clone(), loan_id, confirmed),
    );
}

pub fn unsigned(e: &Env, signer: &Address, borrower: &Address, loan_id: u32) {
    e.events()
        .publish((UNSIGNED, signer.clone()), (borrower.clone(), loan_id));
}

pub fn deployed(
    e: &Env,
    contract_address: &Address,
    borrower: &Address,
    lender: &Address,
    loan_id: u32,
) {
    e.events().publish(
        (DEPLOYED, borrower.clone()),
        (contract_address.clone(), lender.clone(), loan_id),
    );
}
