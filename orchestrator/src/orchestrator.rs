use crate::config::OrchestratorConfig;
use crate::error::{MirrorError, OrchestratorError};
use crate::mirror::{address_text, LoanRow, MirrorStore};
use crate::registry::{FieldEdit, LoanRegistry, NewLoan};
use crate::settlement::{SettlementAction, SettlementActor, SettlementReader, SettlementView};
use nft_loan_request::LoanRequest;
use soroban_sdk::Address;
use tracing::{debug, info, warn};

/// What the connected wallet asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Create(NewLoan),
    Edit {
        borrower: Address,
        loan_id: u32,
        edit: FieldEdit,
    },
    Sign {
        borrower: Address,
        loan_id: u32,
    },
    Unsign {
        borrower: Address,
        loan_id: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub borrower: Address,
    pub loan_id: u32,
    /// Settlement contract deployed by this action, if any.
    pub deployed: Option<Address>,
    /// False when the mirror could not be brought up to date. The on-chain
    /// change stands either way.
    pub mirrored: bool,
}

pub struct ClientOrchestrator<R, M> {
    registry: R,
    mirror: M,
    account: Address,
    config: OrchestratorConfig,
}

impl<R: LoanRegistry, M: MirrorStore> ClientOrchestrator<R, M> {
    pub fn new(registry: R, mirror: M, account: Address, config: OrchestratorConfig) -> Self {
        ClientOrchestrator {
            registry,
            mirror,
            account,
            config,
        }
    }

    pub fn account(&self) -> &Address {
        &self.account
    }

    /// Follows a wallet account change.
    pub fn switch_account(&mut self, account: Address) {
        self.account = account;
    }

    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn apply(&mut self, action: UserAction) -> Result<ActionReport, OrchestratorError> {
        let account = self.account.clone();
        let outcome = match action {
            UserAction::Create(loan) => self
                .registry
                .create_loan_request(&account, &loan)
                .map(|loan_id| (account.clone(), loan_id, None)),
            UserAction::Edit {
                borrower,
                loan_id,
                edit,
            } => self
                .registry
                .edit(&account, &borrower, loan_id, &edit)
                .map(|()| (borrower, loan_id, None)),
            UserAction::Sign { borrower, loan_id } => self
                .registry
                .sign(&account, &borrower, loan_id)
                .map(|deployed| (borrower, loan_id, deployed)),
            UserAction::Unsign { borrower, loan_id } => self
                .registry
                .remove_signature(&account, &borrower, loan_id)
                .map(|()| (borrower, loan_id, None)),
        };

        let (borrower, loan_id, deployed) = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(account = %address_text(&account), error = %err, "registry rejected action");
                return Err(err.into());
            }
        };

        if let Some(contract_address) = &deployed {
            info!(
                borrower = %address_text(&borrower),
                loan_id,
                contract = %address_text(contract_address),
                "settlement contract deployed"
            );
        } else {
            info!(borrower = %address_text(&borrower), loan_id, "registry updated");
        }

        let mirrored = self.mirror_borrower(&borrower);
        Ok(ActionReport {
            borrower,
            loan_id,
            deployed,
            mirrored,
        })
    }

    /// Mirror rows for `borrower`, as the UI would rebuild them on load.
    pub fn load(&self, borrower: &Address) -> Result<Vec<LoanRow>, OrchestratorError> {
        Ok(self.mirror.rows_for(&address_text(borrower))?)
    }

    /// Rewrites every mirror row of `borrower` that disagrees with the
    /// registry and drops rows the registry no longer has. Returns how many
    /// rows were written or dropped.
    pub fn reconcile(&mut self, borrower: &Address) -> Result<usize, OrchestratorError> {
        let loans = self.registry.loans(borrower)?;
        let mirrored = self.mirror.rows_for(&address_text(borrower))?;

        let (changed, _) = self.sync_rows(&loans, &mirrored);
        debug!(borrower = %address_text(borrower), changed, "mirror reconciled");
        Ok(changed)
    }

    pub fn settlement_view<S: SettlementReader>(
        &self,
        settlement: &S,
    ) -> Result<SettlementView, OrchestratorError> {
        settlement.view()
    }

    /// Runs a repayment or withdrawal against a settlement contract as the
    /// connected account.
    pub fn settle<S: SettlementActor>(
        &self,
        settlement: &S,
        action: SettlementAction,
    ) -> Result<(), OrchestratorError> {
        if let SettlementAction::PayLoan(amount) = action {
            if amount <= 0 {
                return Err(OrchestratorError::InvalidAmount(amount));
            }
        }
        match settlement.act(&self.account, action) {
            Ok(()) => {
                info!(account = %address_text(&self.account), ?action, "settlement action applied");
                Ok(())
            }
            Err(err) => {
                warn!(account = %address_text(&self.account), ?action, error = %err, "settlement rejected action");
                Err(err)
            }
        }
    }

    fn mirror_borrower(&mut self, borrower: &Address) -> bool {
        let loans = match self.registry.loans(borrower) {
            Ok(loans) => loans,
            Err(err) => {
                warn!(borrower = %address_text(borrower), error = %err, "could not read loans for mirroring");
                return false;
            }
        };
        let (mirrored, read) = match self.mirror.rows_for(&address_text(borrower)) {
            Ok(rows) => (rows, true),
            Err(err) => {
                warn!(borrower = %address_text(borrower), error = %err, "could not read mirror rows");
                (Vec::new(), false)
            }
        };
        let (_, synced) = self.sync_rows(&loans, &mirrored);
        read && synced
    }

    // A collateral edit moves a loan to a new row key, leaving the old row
    // behind. Stale rows are dropped only once every current row is written.
    fn sync_rows(&mut self, loans: &[LoanRequest], mirrored: &[LoanRow]) -> (usize, bool) {
        let rows: Vec<LoanRow> = loans.iter().map(LoanRow::from_request).collect();

        let mut changed = 0;
        let mut synced = true;
        for row in rows.iter().filter(|row| !mirrored.contains(row)) {
            if self.write_row(row) {
                changed += 1;
            } else {
                synced = false;
            }
        }
        if !synced {
            return (changed, false);
        }

        let stale = mirrored
            .iter()
            .filter(|old| !rows.iter().any(|row| row.key() == old.key()));
        for row in stale {
            if self.drop_row(row) {
                changed += 1;
            } else {
                synced = false;
            }
        }
        (changed, synced)
    }

    fn write_row(&mut self, row: &LoanRow) -> bool {
        self.retrying(row, "upsert", |mirror, row| mirror.upsert(row))
    }

    fn drop_row(&mut self, row: &LoanRow) -> bool {
        self.retrying(row, "remove", |mirror, row| mirror.remove(row))
    }

    fn retrying(
        &mut self,
        row: &LoanRow,
        operation: &'static str,
        op: fn(&mut M, &LoanRow) -> Result<(), MirrorError>,
    ) -> bool {
        let attempts = self.config.mirror_retries + 1;
        for attempt in 1..=attempts {
            match op(&mut self.mirror, row) {
                Ok(()) => return true,
                Err(err) => warn!(
                    table = %self.config.table,
                    sequence_id = row.sequence_id,
                    operation,
                    attempt,
                    error = %err,
                    "mirror write failed"
                ),
            }
        }
        false
    }
}
