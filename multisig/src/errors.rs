use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 100,
    NotInitialized = 101,
    InvalidThreshold = 102,
    DuplicateOwner = 103,
    NotValidSigner = 105,
    AlreadyConfirmed = 106,
}
