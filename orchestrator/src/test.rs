#![cfg(test)]

use crate::{
    address_text, sql, ActionReport, ClientOrchestrator, FieldEdit, LoanRow, MemoryMirror,
    MirrorError, MirrorStore, NewLoan, OrchestratorConfig, OrchestratorError, RegistryError,
    SettlementAction, SqlMirror, SqlTransport, UserAction,
};
use nft_loan_request::{
    Config, InvalidationPolicy, LoanRequestContract, LoanRequestContractClient, SettlementClient,
    SettlementStatus,
};
use soroban_sdk::{testutils::Address as _, Address, Env};
use std::cell::RefCell;

mod mocks {
    use nft_loan_request::{LoanTerms, SettlementStatus};
    use soroban_sdk::{contract, contractimpl, contracttype, Address, BytesN, Env};

    const REDEMPTION: i128 = 1050_0000000;

    #[contracttype]
    enum MockKey {
        Deployments,
        Paid,
        Claimed(Address),
        Withdrawn(Address),
    }

    #[contract]
    pub struct MockEscrowDeployer;

    #[contractimpl]
    impl MockEscrowDeployer {
        pub fn deploy(e: Env, terms: LoanTerms) -> Address {
            let count: u32 = e
                .storage()
                .instance()
                .get(&MockKey::Deployments)
                .unwrap_or(0)
                + 1;
            e.storage().instance().set(&MockKey::Deployments, &count);

            let mut salt = [0u8; 32];
            salt[..4].copy_from_slice(&terms.loan_id.to_be_bytes());
            salt[4..8].copy_from_slice(&count.to_be_bytes());
            e.deployer()
                .with_current_contract(BytesN::from_array(&e, &salt))
                .deployed_address()
        }
    }

    fn paid(e: &Env) -> i128 {
        e.storage().instance().get(&MockKey::Paid).unwrap_or(0)
    }

    #[contract]
    pub struct MockSettlement;

    #[contractimpl]
    impl MockSettlement {
        pub fn get_status(e: Env) -> SettlementStatus {
            if paid(&e) >= REDEMPTION {
                SettlementStatus::Paid
            } else {
                SettlementStatus::Active
            }
        }

        pub fn calculate_redemption(e: Env) -> i128 {
            REDEMPTION - paid(&e)
        }

        pub fn pay_loan(e: Env, payer: Address, amount: i128) {
            payer.require_auth();
            e.storage()
                .instance()
                .set(&MockKey::Paid, &(paid(&e) + amount));
        }

        pub fn get_my_loan(e: Env, borrower: Address) {
            borrower.require_auth();
            e.storage()
                .instance()
                .set(&MockKey::Claimed(borrower), &true);
        }

        pub fn withdraw_nft_borrower(e: Env, borrower: Address) {
            borrower.require_auth();
            if paid(&e) < REDEMPTION {
                panic!("loan is not paid");
            }
            e.storage()
                .instance()
                .set(&MockKey::Withdrawn(borrower), &true);
        }

        pub fn withdraw_nft_lender(_e: Env, lender: Address) {
            lender.require_auth();
            panic!("loan is not in default");
        }

        pub fn claimed(e: Env, owner: Address) -> bool {
            e.storage()
                .instance()
                .get(&MockKey::Claimed(owner))
                .unwrap_or(false)
        }

        pub fn withdrawn(e: Env, owner: Address) -> bool {
            e.storage()
                .instance()
                .get(&MockKey::Withdrawn(owner))
                .unwrap_or(false)
        }
    }
}

use mocks::{MockEscrowDeployer, MockSettlement, MockSettlementClient};

const MATURITY: u64 = 1_735_689_600;

fn create_registry<'a>(e: &Env) -> LoanRequestContractClient<'a> {
    let deployer = e.register(MockEscrowDeployer, ());
    let registry =
        LoanRequestContractClient::new(e, &e.register(LoanRequestContract, ()));
    registry.initialize(
        &Address::generate(e),
        &Config {
            escrow_deployer: deployer,
            invalidation: InvalidationPolicy::LenderOnly,
        },
    );
    registry
}

fn new_loan(collateral: &Address, lender: &Address) -> NewLoan {
    NewLoan {
        collateral: collateral.clone(),
        token_id: 1,
        initial_loan_value: 1000_0000000i128,
        rate: 5,
        expiration: MATURITY,
        lender: Some(lender.clone()),
    }
}

/// Fails the first `failures` writes, then behaves like a memory mirror.
struct FlakyMirror {
    inner: MemoryMirror,
    failures: u32,
    attempts: u32,
}

impl FlakyMirror {
    fn new(failures: u32) -> Self {
        FlakyMirror {
            inner: MemoryMirror::new(),
            failures,
            attempts: 0,
        }
    }
}

impl MirrorStore for FlakyMirror {
    fn upsert(&mut self, row: &LoanRow) -> Result<(), MirrorError> {
        self.attempts += 1;
        if self.failures > 0 {
            self.failures -= 1;
            return Err(MirrorError::Unavailable("connection reset".to_string()));
        }
        self.inner.upsert(row)
    }

    fn remove(&mut self, row: &LoanRow) -> Result<(), MirrorError> {
        self.inner.remove(row)
    }

    fn rows_for(&self, borrower: &str) -> Result<Vec<LoanRow>, MirrorError> {
        self.inner.rows_for(borrower)
    }
}

#[derive(Default)]
struct RecordingTransport {
    statements: Vec<String>,
    queries: RefCell<Vec<String>>,
    response: String,
}

impl SqlTransport for RecordingTransport {
    fn execute(&mut self, statement: &str) -> Result<(), MirrorError> {
        self.statements.push(statement.to_string());
        Ok(())
    }

    fn query(&self, statement: &str) -> Result<String, MirrorError> {
        self.queries.borrow_mut().push(statement.to_string());
        Ok(self.response.clone())
    }
}

#[test]
fn test_sign_off_flow_is_mirrored() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);

    let mut client = ClientOrchestrator::new(
        registry,
        MemoryMirror::new(),
        borrower.clone(),
        OrchestratorConfig::default(),
    );

    let report = client
        .apply(UserAction::Create(new_loan(&nft, &lender)))
        .unwrap();
    assert_eq!(
        report,
        ActionReport {
            borrower: borrower.clone(),
            loan_id: 0,
            deployed: None,
            mirrored: true,
        }
    );

    client
        .apply(UserAction::Sign {
            borrower: borrower.clone(),
            loan_id: 0,
        })
        .unwrap();
    let rows = client.load(&borrower).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].borrower_signed);
    assert!(!rows[0].lender_signed);
    assert_eq!(rows[0].lender, Some(address_text(&lender)));

    client.switch_account(lender.clone());
    let report = client
        .apply(UserAction::Sign {
            borrower: borrower.clone(),
            loan_id: 0,
        })
        .unwrap();
    let contract_address = report.deployed.clone().unwrap();
    assert!(report.mirrored);

    let rows = client.load(&borrower).unwrap();
    assert!(rows[0].lender_signed);
    assert_eq!(
        rows[0].contract_address,
        Some(address_text(&contract_address))
    );
}

#[test]
fn test_edit_clears_mirrored_lender_signature() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);

    let mut client = ClientOrchestrator::new(
        registry,
        MemoryMirror::new(),
        borrower.clone(),
        OrchestratorConfig::default(),
    );
    client
        .apply(UserAction::Create(new_loan(&nft, &lender)))
        .unwrap();

    client.switch_account(lender.clone());
    client
        .apply(UserAction::Sign {
            borrower: borrower.clone(),
            loan_id: 0,
        })
        .unwrap();
    assert!(client.load(&borrower).unwrap()[0].lender_signed);

    client.switch_account(borrower.clone());
    client
        .apply(UserAction::Edit {
            borrower: borrower.clone(),
            loan_id: 0,
            edit: FieldEdit::Rate(8),
        })
        .unwrap();

    let rows = client.load(&borrower).unwrap();
    assert_eq!(rows[0].rate, 8);
    assert!(!rows[0].lender_signed);
}

#[test]
fn test_registry_rejection_leaves_mirror_alone() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);

    let mut client = ClientOrchestrator::new(
        registry,
        MemoryMirror::new(),
        borrower.clone(),
        OrchestratorConfig::default(),
    );
    client
        .apply(UserAction::Create(new_loan(&nft, &lender)))
        .unwrap();
    let before = client.load(&borrower).unwrap();

    client.switch_account(lender.clone());
    let err = client
        .apply(UserAction::Edit {
            borrower: borrower.clone(),
            loan_id: 0,
            edit: FieldEdit::InitialLoanValue(1),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::Registry(RegistryError::NotBorrower)
    ));
    assert_eq!(client.load(&borrower).unwrap(), before);
}

#[test]
fn test_confirmed_loan_reports_frozen_message() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);

    let mut client = ClientOrchestrator::new(
        registry,
        MemoryMirror::new(),
        borrower.clone(),
        OrchestratorConfig::default(),
    );
    client
        .apply(UserAction::Create(new_loan(&nft, &lender)))
        .unwrap();
    client
        .apply(UserAction::Sign {
            borrower: borrower.clone(),
            loan_id: 0,
        })
        .unwrap();
    client.switch_account(lender.clone());
    client
        .apply(UserAction::Sign {
            borrower: borrower.clone(),
            loan_id: 0,
        })
        .unwrap();

    client.switch_account(borrower.clone());
    let err = client
        .apply(UserAction::Edit {
            borrower: borrower.clone(),
            loan_id: 0,
            edit: FieldEdit::Expiration(MATURITY + 1),
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "only unconfirmed contracts can be accessed");

    let err = client
        .apply(UserAction::Unsign {
            borrower: Address::generate(&e),
            loan_id: 0,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "no loans exist for this borrower");
}

#[test]
fn test_mirror_write_is_retried_once() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);

    let mut client = ClientOrchestrator::new(
        registry,
        FlakyMirror::new(1),
        borrower.clone(),
        OrchestratorConfig::default(),
    );
    let report = client
        .apply(UserAction::Create(new_loan(&nft, &lender)))
        .unwrap();

    assert!(report.mirrored);
    assert_eq!(client.mirror().attempts, 2);
    assert_eq!(client.load(&borrower).unwrap().len(), 1);
}

#[test]
fn test_mirror_failure_keeps_chain_change_and_reconciles() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);

    let mut client = ClientOrchestrator::new(
        registry,
        FlakyMirror::new(2),
        borrower.clone(),
        OrchestratorConfig::default(),
    );
    let report = client
        .apply(UserAction::Create(new_loan(&nft, &lender)))
        .unwrap();

    assert!(!report.mirrored);
    assert_eq!(report.loan_id, 0);
    assert!(client.load(&borrower).unwrap().is_empty());

    assert_eq!(client.reconcile(&borrower).unwrap(), 1);
    assert_eq!(client.load(&borrower).unwrap().len(), 1);
    assert_eq!(client.reconcile(&borrower).unwrap(), 0);
}

#[test]
fn test_collateral_edit_keeps_one_row_per_loan() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);
    let other_nft = Address::generate(&e);

    let mut client = ClientOrchestrator::new(
        registry,
        MemoryMirror::new(),
        borrower.clone(),
        OrchestratorConfig::default(),
    );
    client
        .apply(UserAction::Create(new_loan(&nft, &lender)))
        .unwrap();

    let report = client
        .apply(UserAction::Edit {
            borrower: borrower.clone(),
            loan_id: 0,
            edit: FieldEdit::Collateral {
                collateral: other_nft.clone(),
                token_id: 9,
            },
        })
        .unwrap();
    assert!(report.mirrored);

    let rows = client.load(&borrower).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].collateral, address_text(&other_nft));
    assert_eq!(rows[0].token_id, 9);
    assert_eq!(client.mirror().len(), 1);
    assert_eq!(client.reconcile(&borrower).unwrap(), 0);
}

#[test]
fn test_reconcile_drops_rows_under_old_keys() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);
    registry.create_loan_request(
        &borrower,
        &nft,
        &1,
        &1000_0000000i128,
        &5,
        &MATURITY,
        &Some(lender.clone()),
    );

    // left behind by a collateral edit the client never saw
    let mut seeded = MemoryMirror::new();
    seeded
        .upsert(&LoanRow {
            collateral: "CSTALE".to_string(),
            token_id: 4,
            sequence_id: 0,
            borrower: address_text(&borrower),
            lender: Some(address_text(&lender)),
            initial_loan_value: 1000_0000000i128,
            rate: 5,
            expiration: MATURITY,
            borrower_signed: false,
            lender_signed: false,
            contract_address: None,
        })
        .unwrap();

    let mut client = ClientOrchestrator::new(
        LoanRequestContractClient::new(&e, &registry.address),
        seeded,
        borrower.clone(),
        OrchestratorConfig::default(),
    );

    assert_eq!(client.reconcile(&borrower).unwrap(), 2);
    let rows = client.load(&borrower).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].collateral, address_text(&nft));
    assert_eq!(client.reconcile(&borrower).unwrap(), 0);
}

#[test]
fn test_sql_mirror_statements() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let nft = Address::generate(&e);

    let row = LoanRow {
        collateral: "CNFT".to_string(),
        token_id: 1,
        sequence_id: 0,
        borrower: address_text(&borrower),
        lender: None,
        initial_loan_value: 10,
        rate: 5,
        expiration: MATURITY,
        borrower_signed: false,
        lender_signed: false,
        contract_address: None,
    };
    let transport = RecordingTransport {
        response: serde_json::to_string(&vec![row.clone()]).unwrap(),
        ..RecordingTransport::default()
    };

    let mut client = ClientOrchestrator::new(
        registry,
        SqlMirror::new(transport, "loans"),
        borrower.clone(),
        OrchestratorConfig::default(),
    );
    client
        .apply(UserAction::Create(new_loan(&nft, &lender)))
        .unwrap();

    // the canned response holds a row for sequence 0 under another
    // collateral, so it is dropped after the new row is written
    let statements = &client.mirror().transport().statements;
    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("INSERT INTO \"loans\""));
    assert!(statements[0].contains("ON CONFLICT (collateral, token_id, sequence_id) DO UPDATE"));
    assert_eq!(
        statements[1],
        "DELETE FROM \"loans\" WHERE collateral = 'CNFT' AND token_id = 1 AND sequence_id = 0"
    );

    assert_eq!(client.load(&borrower).unwrap(), vec![row]);
    let queries = client.mirror().transport().queries.borrow();
    assert!(queries[0].ends_with(&format!(
        "WHERE borrower = '{}' ORDER BY sequence_id",
        address_text(&borrower)
    )));
}

#[test]
fn test_sql_quoting() {
    let row = LoanRow {
        collateral: "C'NFT".to_string(),
        token_id: 7,
        sequence_id: 3,
        borrower: "GBORROWER".to_string(),
        lender: Some("GLENDER".to_string()),
        initial_loan_value: 500,
        rate: 10,
        expiration: MATURITY,
        borrower_signed: true,
        lender_signed: false,
        contract_address: None,
    };

    let statement = sql::upsert_statement("loan\"s", &row);
    assert!(statement.starts_with("INSERT INTO \"loan\"\"s\""));
    assert!(statement.contains(&format!(
        "VALUES ('C''NFT', 7, 3, 'GBORROWER', 'GLENDER', 500, 10, {MATURITY}, true, false, NULL)"
    )));
    assert!(statement.ends_with("contract_address = excluded.contract_address"));
}

#[test]
fn test_settlement_view() {
    let e = Env::default();
    let registry = create_registry(&e);
    let client = ClientOrchestrator::new(
        registry,
        MemoryMirror::new(),
        Address::generate(&e),
        OrchestratorConfig::default(),
    );

    let settlement = SettlementClient::new(&e, &e.register(MockSettlement, ()));
    let view = client.settlement_view(&settlement).unwrap();
    assert_eq!(view.address, settlement.address);
    assert_eq!(view.status, SettlementStatus::Active);
    assert_eq!(view.outstanding, 1050_0000000i128);
}

#[test]
fn test_settlement_actions() {
    let e = Env::default();
    e.mock_all_auths();
    let registry = create_registry(&e);

    let borrower = Address::generate(&e);
    let lender = Address::generate(&e);
    let mut client = ClientOrchestrator::new(
        registry,
        MemoryMirror::new(),
        borrower.clone(),
        OrchestratorConfig::default(),
    );

    let address = e.register(MockSettlement, ());
    let settlement = SettlementClient::new(&e, &address);
    let mock = MockSettlementClient::new(&e, &address);

    client
        .settle(&settlement, SettlementAction::ClaimLoan)
        .unwrap();
    assert_eq!(e.auths()[0].0, borrower);
    assert!(mock.claimed(&borrower));

    assert!(matches!(
        client.settle(&settlement, SettlementAction::PayLoan(0)),
        Err(OrchestratorError::InvalidAmount(0))
    ));
    assert!(matches!(
        client.settle(&settlement, SettlementAction::WithdrawNftBorrower),
        Err(OrchestratorError::SettlementRejected(
            SettlementAction::WithdrawNftBorrower
        ))
    ));
    assert!(!mock.withdrawn(&borrower));

    client
        .settle(&settlement, SettlementAction::PayLoan(1050_0000000i128))
        .unwrap();
    assert_eq!(e.auths()[0].0, borrower);
    let view = client.settlement_view(&settlement).unwrap();
    assert_eq!(view.status, SettlementStatus::Paid);
    assert_eq!(view.outstanding, 0);

    client
        .settle(&settlement, SettlementAction::WithdrawNftBorrower)
        .unwrap();
    assert!(mock.withdrawn(&borrower));

    client.switch_account(lender.clone());
    assert!(matches!(
        client.settle(&settlement, SettlementAction::WithdrawNftLender),
        Err(OrchestratorError::SettlementRejected(
            SettlementAction::WithdrawNftLender
        ))
    ));
    assert!(!mock.withdrawn(&lender));
}

#[test]
fn test_config() {
    assert_eq!(
        OrchestratorConfig::from_json("{}").unwrap(),
        OrchestratorConfig::default()
    );

    let config =
        OrchestratorConfig::from_json(r#"{"table": "loan_requests", "mirror_retries": 3}"#)
            .unwrap();
    assert_eq!(config.table, "loan_requests");
    assert_eq!(config.mirror_retries, 3);
    assert_eq!(config.network, "testnet");

    assert!(matches!(
        OrchestratorConfig::from_json(r#"{"tabel": "loans"}"#),
        Err(OrchestratorError::Config(_))
    ));
}
