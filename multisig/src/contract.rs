//! N-of-M sign-off over a fixed owner set
use crate::storage_types::{DataKey, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD};
use crate::Error;
use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Env, Symbol, Vec};

const SIGNED: Symbol = symbol_short!("signed");
const UNSIGNED: Symbol = symbol_short!("unsigned");
const CONFIRMED: Symbol = symbol_short!("confirmed");

fn read_owners(e: &Env) -> Result<Vec<Address>, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Owners)
        .ok_or(Error::NotInitialized)
}

fn read_required(e: &Env) -> u32 {
    e.storage().instance().get(&DataKey::Required).unwrap_or(0)
}

fn read_signature_count(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&DataKey::SignatureCount)
        .unwrap_or(0)
}

fn write_signature_count(e: &Env, count: u32) {
    e.storage().instance().set(&DataKey::SignatureCount, &count);
}

fn has_signed(e: &Env, owner: &Address) -> bool {
    e.storage()
        .instance()
        .get(&DataKey::Signed(owner.clone()))
        .unwrap_or(false)
}

fn read_confirmed(e: &Env) -> bool {
    e.storage()
        .instance()
        .get(&DataKey::Confirmed)
        .unwrap_or(false)
}

fn require_owner(e: &Env, signer: &Address) -> Result<(), Error> {
    if !read_owners(e)?.contains(signer) {
        return Err(Error::NotValidSigner);
    }
    Ok(())
}

fn bump_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

#[contract]
pub struct MultiSig;

#[contractimpl]
impl MultiSig {
    pub fn initialize(e: Env, owners: Vec<Address>, required: u32) -> Result<(), Error> {
        if e.storage().instance().has(&DataKey::Owners) {
            return Err(Error::AlreadyInitialized);
        }
        if required == 0 || required > owners.len() {
            return Err(Error::InvalidThreshold);
        }
        for (i, owner) in owners.iter().enumerate() {
            if owners.first_index_of(&owner) != Some(i as u32) {
                return Err(Error::DuplicateOwner);
            }
        }

        e.storage().instance().set(&DataKey::Owners, &owners);
        e.storage().instance().set(&DataKey::Required, &required);
        bump_instance(&e);
        Ok(())
    }

    /// Adds the signer's approval. Returns whether the threshold is met.
    /// Signing twice counts once.
    pub fn sign(e: Env, signer: Address) -> Result<bool, Error> {
        signer.require_auth();
        require_owner(&e, &signer)?;

        if read_confirmed(&e) {
            e.events().publish((SIGNED, signer), true);
            return Ok(true);
        }

        if !has_signed(&e, &signer) {
            e.storage()
                .instance()
                .set(&DataKey::Signed(signer.clone()), &true);
            write_signature_count(&e, read_signature_count(&e) + 1);
        }

        let confirmed = read_signature_count(&e) >= read_required(&e);
        e.events().publish((SIGNED, signer), confirmed);
        if confirmed {
            e.storage().instance().set(&DataKey::Confirmed, &true);
            log!(&e, "sign-off complete");
            e.events()
                .publish((CONFIRMED, e.current_contract_address()), true);
        }
        bump_instance(&e);
        Ok(confirmed)
    }

    pub fn remove_signature(e: Env, signer: Address) -> Result<(), Error> {
        signer.require_auth();
        require_owner(&e, &signer)?;
        if read_confirmed(&e) {
            return Err(Error::AlreadyConfirmed);
        }

        if has_signed(&e, &signer) {
            e.storage()
                .instance()
                .remove(&DataKey::Signed(signer.clone()));
            write_signature_count(&e, read_signature_count(&e) - 1);
            e.events().publish((UNSIGNED, signer), ());
        }
        bump_instance(&e);
        Ok(())
    }

    pub fn is_confirmed(e: Env) -> bool {
        read_confirmed(&e)
    }

    pub fn get_owners(e: Env) -> Result<Vec<Address>, Error> {
        read_owners(&e)
    }

    pub fn get_required(e: Env) -> u32 {
        read_required(&e)
    }

    pub fn get_signers(e: Env) -> Result<Vec<Address>, Error> {
        let mut signers: Vec<Address> = Vec::new(&e);
        for owner in read_owners(&e)?.iter() {
            if has_signed(&e, &owner) {
                signers.push_back(owner);
            }
        }
        Ok(signers)
    }
}
