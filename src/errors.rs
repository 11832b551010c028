use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 100,
    NotInitialized = 101,
    InvalidCollateral = 102,
    BorrowerIsLender = 103,
    NotBorrower = 104,
    NotValidSigner = 105,
    AlreadyConfirmed = 106,
    NoSuchLoan = 107,
    NegativeAmount = 108,
    InvalidRate = 109,
    NotAllowed = 120,
}
