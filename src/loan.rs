use crate::storage_types::{
    DataKey, LoanKey, LoanRequest, LOAN_BUMP_AMOUNT, LOAN_LIFETIME_THRESHOLD, MAX_RATE_PERCENT,
    ZERO_ADDRESS,
};
use crate::Error;
use soroban_sdk::{Address, Env, String, Vec};

pub fn zero_address(e: &Env) -> Address {
    Address::from_string(&String::from_str(e, ZERO_ADDRESS))
}

pub fn is_zero_address(e: &Env, address: &Address) -> bool {
    *address == zero_address(e)
}

// a zero lender means "unassigned"
pub fn normalize_lender(e: &Env, lender: Option<Address>) -> Option<Address> {
    lender.filter(|l| !is_zero_address(e, l))
}

pub fn check_collateral(e: &Env, collateral: &Address) -> Result<(), Error> {
    if is_zero_address(e, collateral) {
        return Err(Error::InvalidCollateral);
    }
    Ok(())
}

pub fn check_lender(borrower: &Address, lender: &Option<Address>) -> Result<(), Error> {
    if lender.as_ref() == Some(borrower) {
        return Err(Error::BorrowerIsLender);
    }
    Ok(())
}

pub fn check_nonnegative_amount(amount: i128) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::NegativeAmount);
    }
    Ok(())
}

pub fn check_rate(rate: u32) -> Result<(), Error> {
    if rate > MAX_RATE_PERCENT {
        return Err(Error::InvalidRate);
    }
    Ok(())
}

pub fn read_loan_count(e: &Env, borrower: &Address) -> u32 {
    let key = DataKey::LoanCount(borrower.clone());
    e.storage().persistent().get(&key).unwrap_or(0)
}

fn write_loan_count(e: &Env, borrower: &Address, count: u32) {
    let key = DataKey::LoanCount(borrower.clone());
    e.storage().persistent().set(&key, &count);
    e.storage()
        .persistent()
        .extend_ttl(&key, LOAN_LIFETIME_THRESHOLD, LOAN_BUMP_AMOUNT);
}

pub fn read_loan(e: &Env, borrower: &Address, loan_id: u32) -> Result<LoanRequest, Error> {
    let key = DataKey::Loan(LoanKey {
        borrower: borrower.clone(),
        loan_id,
    });
    e.storage().persistent().get(&key).ok_or(Error::NoSuchLoan)
}

pub fn write_loan(e: &Env, loan: &LoanRequest) {
    let key = DataKey::Loan(LoanKey {
        borrower: loan.borrower.clone(),
        loan_id: loan.loan_id,
    });
    e.storage().persistent().set(&key, loan);
    e.storage()
        .persistent()
        .extend_ttl(&key, LOAN_LIFETIME_THRESHOLD, LOAN_BUMP_AMOUNT);
}

// Stores a new request under the next index of its borrower.
// Indices are append-only and never reused.
pub fn append_loan(e: &Env, mut loan: LoanRequest) -> u32 {
    let loan_id = read_loan_count(e, &loan.borrower);
    loan.loan_id = loan_id;
    write_loan(e, &loan);
    write_loan_count(e, &loan.borrower, loan_id + 1);
    loan_id
}

pub fn read_loans(e: &Env, borrower: &Address) -> Vec<LoanRequest> {
    let mut loans: Vec<LoanRequest> = Vec::new(e);
    for loan_id in 0..read_loan_count(e, borrower) {
        if let Ok(loan) = read_loan(e, borrower, loan_id) {
            loans.push_back(loan);
        }
    }
    loans
}
