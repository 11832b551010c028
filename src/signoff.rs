//! Sign-off bookkeeping for a single loan request.
use crate::storage_types::{InvalidationPolicy, LoanRequest};
use crate::Error;
use soroban_sdk::Address;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Party {
    Borrower,
    Lender,
}

pub fn party_of(loan: &LoanRequest, who: &Address) -> Option<Party> {
    if *who == loan.borrower {
        Some(Party::Borrower)
    } else if loan.lender.as_ref() == Some(who) {
        Some(Party::Lender)
    } else {
        None
    }
}

pub fn require_party(loan: &LoanRequest, who: &Address) -> Result<Party, Error> {
    party_of(loan, who).ok_or(Error::NotValidSigner)
}

pub fn record_signature(loan: &mut LoanRequest, party: Party, signed: bool) {
    match party {
        Party::Borrower => loan.borrower_signed = signed,
        Party::Lender => loan.lender_signed = signed,
    }
}

/// Drops the approvals that the last field write made stale. Must run in the
/// same call as the write.
pub fn invalidate(loan: &mut LoanRequest, policy: InvalidationPolicy) {
    loan.lender_signed = false;
    if policy == InvalidationPolicy::BothParties {
        loan.borrower_signed = false;
    }
}

pub fn sign_status(loan: &LoanRequest, who: &Address) -> bool {
    match party_of(loan, who) {
        Some(Party::Borrower) => loan.borrower_signed,
        Some(Party::Lender) => loan.lender_signed,
        None => false,
    }
}

pub fn fully_signed(loan: &LoanRequest) -> bool {
    loan.borrower_signed && loan.lender_signed
}
