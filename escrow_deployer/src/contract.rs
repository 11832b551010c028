//! Settlement contract factory
use crate::storage_types::{
    DataKey, DeployerSettings, LoanTerms, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD,
};
use crate::Error;
use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{
    contract, contractimpl, log, symbol_short, vec, Address, Bytes, BytesN, Env, IntoVal, Symbol,
};

const DEPLOYED: Symbol = symbol_short!("deployed");

fn read_admin(e: &Env) -> Result<Address, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

fn read_settings(e: &Env) -> Result<DeployerSettings, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Settings)
        .ok_or(Error::NotInitialized)
}

fn write_settings(e: &Env, settings: &DeployerSettings) {
    e.storage().instance().set(&DataKey::Settings, settings);
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// One salt per (borrower, loan index); a second deploy for the same loan
// would collide with the first contract.
pub(crate) fn salt_for(e: &Env, terms: &LoanTerms) -> BytesN<32> {
    let mut preimage = Bytes::new(e);
    preimage.append(&terms.borrower.clone().to_xdr(e));
    preimage.extend_from_array(&terms.loan_id.to_be_bytes());
    e.crypto().sha256(&preimage).into()
}

#[contract]
pub struct EscrowDeployer;

#[contractimpl]
impl EscrowDeployer {
    pub fn initialize(
        e: Env,
        admin: Address,
        registry: Address,
        wasm_hash: BytesN<32>,
    ) -> Result<(), Error> {
        if e.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        e.storage().instance().set(&DataKey::Admin, &admin);
        write_settings(
            &e,
            &DeployerSettings {
                registry,
                wasm_hash,
            },
        );
        Ok(())
    }

    pub fn update_wasm_hash(e: Env, wasm_hash: BytesN<32>) -> Result<(), Error> {
        let admin = read_admin(&e)?;
        admin.require_auth();

        let mut settings = read_settings(&e)?;
        settings.wasm_hash = wasm_hash;
        write_settings(&e, &settings);
        Ok(())
    }

    pub fn get_registry(e: Env) -> Result<Address, Error> {
        Ok(read_settings(&e)?.registry)
    }

    /// Address the settlement contract for `terms` has (or will have).
    pub fn deployed_address(e: Env, terms: LoanTerms) -> Address {
        e.deployer()
            .with_current_contract(salt_for(&e, &terms))
            .deployed_address()
    }

    /// Deploys and initializes the settlement contract for a confirmed loan.
    /// Only the configured registry may call this.
    pub fn deploy(e: Env, terms: LoanTerms) -> Result<Address, Error> {
        let settings = read_settings(&e)?;
        if terms.registry != settings.registry {
            return Err(Error::WrongRegistry);
        }
        settings.registry.require_auth();

        let contract_address = e
            .deployer()
            .with_current_contract(salt_for(&e, &terms))
            .deploy_v2(settings.wasm_hash, ());
        e.invoke_contract::<()>(
            &contract_address,
            &Symbol::new(&e, "initialize"),
            vec![&e, terms.clone().into_val(&e)],
        );

        log!(&e, "settlement for loan {} at {}", terms.loan_id, contract_address);
        e.events().publish(
            (DEPLOYED, terms.borrower.clone()),
            (contract_address.clone(), terms.loan_id),
        );
        e.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        Ok(contract_address)
    }
}
