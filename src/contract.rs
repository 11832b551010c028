//! NFT-collateralized loan requests with two-party sign-off
use crate::admin::{
    has_administrator, read_administrator, read_config, write_administrator, write_config,
};
use crate::confirmation::evaluate;
use crate::events::{self, FIELD_COLLATERAL, FIELD_EXPIRATION, FIELD_RATE, FIELD_VALUE};
use crate::loan::{
    append_loan, check_collateral, check_lender, check_nonnegative_amount, check_rate,
    normalize_lender, read_loan, read_loan_count, read_loans, write_loan,
};
use crate::signoff::{invalidate, record_signature, require_party, sign_status};
use crate::storage_types::{
    Config, LoanRequest, RequestStatus, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD,
};
use crate::Error;
use soroban_sdk::{contract, contractimpl, log, Address, Env, Vec};

fn bump_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// Loads a request that `caller` is about to edit.
fn load_for_edit(
    e: &Env,
    caller: &Address,
    borrower: &Address,
    loan_id: u32,
) -> Result<LoanRequest, Error> {
    caller.require_auth();
    let loan = read_loan(e, borrower, loan_id)?;
    if caller != borrower {
        return Err(Error::NotBorrower);
    }
    if loan.contract_address.is_some() {
        return Err(Error::AlreadyConfirmed);
    }
    Ok(loan)
}

// Field write, signature invalidation and the confirmation check happen
// together or not at all.
fn commit_edit(e: &Env, mut loan: LoanRequest) -> Result<(), Error> {
    let config = read_config(e)?;
    invalidate(&mut loan, config.invalidation);
    write_loan(e, &loan);
    evaluate(e, &config, &mut loan)?;
    bump_instance(e);
    Ok(())
}

fn load_for_signing(
    e: &Env,
    signer: &Address,
    borrower: &Address,
    loan_id: u32,
) -> Result<LoanRequest, Error> {
    signer.require_auth();
    let loan = read_loan(e, borrower, loan_id)?;
    if loan.contract_address.is_some() {
        return Err(Error::AlreadyConfirmed);
    }
    Ok(loan)
}

#[contract]
pub struct LoanRequestContract;

#[contractimpl]
impl LoanRequestContract {
    pub fn initialize(e: Env, admin: Address, config: Config) -> Result<(), Error> {
        if has_administrator(&e) {
            return Err(Error::AlreadyInitialized);
        }
        write_administrator(&e, &admin);
        write_config(&e, &config);
        bump_instance(&e);
        Ok(())
    }

    pub fn set_admin(e: Env, new_admin: Address) -> Result<(), Error> {
        let admin = read_administrator(&e)?;
        admin.require_auth();

        write_administrator(&e, &new_admin);
        bump_instance(&e);
        Ok(())
    }

    pub fn update_config(e: Env, config: Config) -> Result<(), Error> {
        let admin = read_administrator(&e)?;
        admin.require_auth();

        write_config(&e, &config);
        bump_instance(&e);
        Ok(())
    }

    pub fn get_config(e: Env) -> Result<Config, Error> {
        read_config(&e)
    }

    pub fn create_loan_request(
        e: Env,
        borrower: Address,
        collateral: Address,
        token_id: u128,
        initial_loan_value: i128,
        rate: u32,
        expiration: u64,
        lender: Option<Address>,
    ) -> Result<u32, Error> {
        borrower.require_auth();
        read_config(&e)?;

        check_collateral(&e, &collateral)?;
        let lender = normalize_lender(&e, lender);
        check_lender(&borrower, &lender)?;
        check_nonnegative_amount(initial_loan_value)?;
        check_rate(rate)?;

        let mut loan = LoanRequest {
            borrower: borrower.clone(),
            loan_id: 0,
            collateral,
            token_id,
            initial_loan_value,
            rate,
            expiration,
            lender,
            borrower_signed: false,
            lender_signed: false,
            contract_address: None,
        };
        loan.loan_id = append_loan(&e, loan.clone());

        log!(&e, "loan request {} submitted by {}", loan.loan_id, borrower);
        events::submitted(&e, &loan);
        bump_instance(&e);
        Ok(loan.loan_id)
    }

    pub fn set_collateral(
        e: Env,
        caller: Address,
        borrower: Address,
        loan_id: u32,
        collateral: Address,
        token_id: u128,
    ) -> Result<(), Error> {
        let mut loan = load_for_edit(&e, &caller, &borrower, loan_id)?;
        check_collateral(&e, &collateral)?;

        loan.collateral = collateral;
        loan.token_id = token_id;
        events::changed(&e, &borrower, loan_id, FIELD_COLLATERAL);
        commit_edit(&e, loan)
    }

    pub fn set_initial_loan_value(
        e: Env,
        caller: Address,
        borrower: Address,
        loan_id: u32,
        initial_loan_value: i128,
    ) -> Result<(), Error> {
        let mut loan = load_for_edit(&e, &caller, &borrower, loan_id)?;
        check_nonnegative_amount(initial_loan_value)?;

        loan.initial_loan_value = initial_loan_value;
        events::changed(&e, &borrower, loan_id, FIELD_VALUE);
        commit_edit(&e, loan)
    }

    pub fn set_rate(
        e: Env,
        caller: Address,
        borrower: Address,
        loan_id: u32,
        rate: u32,
    ) -> Result<(), Error> {
        let mut loan = load_for_edit(&e, &caller, &borrower, loan_id)?;
        check_rate(rate)?;

        loan.rate = rate;
        events::changed(&e, &borrower, loan_id, FIELD_RATE);
        commit_edit(&e, loan)
    }

    pub fn set_expiration(
        e: Env,
        caller: Address,
        borrower: Address,
        loan_id: u32,
        expiration: u64,
    ) -> Result<(), Error> {
        let mut loan = load_for_edit(&e, &caller, &borrower, loan_id)?;

        loan.expiration = expiration;
        events::changed(&e, &borrower, loan_id, FIELD_EXPIRATION);
        commit_edit(&e, loan)
    }

    pub fn set_lender(
        e: Env,
        caller: Address,
        borrower: Address,
        loan_id: u32,
        lender: Option<Address>,
    ) -> Result<(), Error> {
        let mut loan = load_for_edit(&e, &caller, &borrower, loan_id)?;
        let lender = normalize_lender(&e, lender);
        check_lender(&borrower, &lender)?;

        // any lender signature belonged to the previous lender
        loan.lender = lender;
        loan.lender_signed = false;
        events::lender_changed(&e, &borrower, loan_id, &loan.lender);
        commit_edit(&e, loan)
    }

    /// Records the signer's approval of the current terms. Returns the
    /// settlement contract address when this signature completed the request.
    pub fn sign(
        e: Env,
        signer: Address,
        borrower: Address,
        loan_id: u32,
    ) -> Result<Option<Address>, Error> {
        let config = read_config(&e)?;
        let mut loan = load_for_signing(&e, &signer, &borrower, loan_id)?;
        let party = require_party(&loan, &signer)?;

        record_signature(&mut loan, party, true);
        write_loan(&e, &loan);
        let deployed = evaluate(&e, &config, &mut loan)?;

        events::signed(&e, &signer, &borrower, loan_id, deployed.is_some());
        bump_instance(&e);
        Ok(deployed)
    }

    pub fn remove_signature(
        e: Env,
        signer: Address,
        borrower: Address,
        loan_id: u32,
    ) -> Result<(), Error> {
        let mut loan = load_for_signing(&e, &signer, &borrower, loan_id)?;
        let party = require_party(&loan, &signer)?;

        record_signature(&mut loan, party, false);
        write_loan(&e, &loan);

        events::unsigned(&e, &signer, &borrower, loan_id);
        bump_instance(&e);
        Ok(())
    }

    /// Re-runs the confirmation check. A no-op once the request is confirmed.
    pub fn check_confirmation(
        e: Env,
        borrower: Address,
        loan_id: u32,
    ) -> Result<Option<Address>, Error> {
        let config = read_config(&e)?;
        let mut loan = read_loan(&e, &borrower, loan_id)?;
        evaluate(&e, &config, &mut loan)
    }

    pub fn get_loans(e: Env, borrower: Address) -> Vec<LoanRequest> {
        read_loans(&e, &borrower)
    }

    pub fn get_loan(e: Env, borrower: Address, loan_id: u32) -> Result<LoanRequest, Error> {
        read_loan(&e, &borrower, loan_id)
    }

    pub fn get_loan_count(e: Env, borrower: Address) -> u32 {
        read_loan_count(&e, &borrower)
    }

    pub fn get_lender(e: Env, borrower: Address, loan_id: u32) -> Result<Option<Address>, Error> {
        Ok(read_loan(&e, &borrower, loan_id)?.lender)
    }

    pub fn get_sign_status(
        e: Env,
        party: Address,
        borrower: Address,
        loan_id: u32,
    ) -> Result<bool, Error> {
        let loan = read_loan(&e, &borrower, loan_id)?;
        Ok(sign_status(&loan, &party))
    }

    pub fn get_status(e: Env, borrower: Address, loan_id: u32) -> Result<RequestStatus, Error> {
        let loan = read_loan(&e, &borrower, loan_id)?;
        if loan.contract_address.is_some() {
            Ok(RequestStatus::Confirmed)
        } else {
            Ok(RequestStatus::Unconfirmed)
        }
    }
}
