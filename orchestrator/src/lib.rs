//! Client-side glue for the loan request registry: turns user actions into
//! registry calls and keeps the hosted loan table in step with chain state.

mod config;
mod error;
mod mirror;
mod orchestrator;
mod registry;
mod settlement;
pub mod sql;
mod test;

pub use crate::config::OrchestratorConfig;
pub use crate::error::{MirrorError, OrchestratorError, RegistryError};
pub use crate::mirror::{address_text, LoanRow, MemoryMirror, MirrorStore, SqlMirror, SqlTransport};
pub use crate::orchestrator::{ActionReport, ClientOrchestrator, UserAction};
pub use crate::registry::{FieldEdit, LoanRegistry, NewLoan};
pub use crate::settlement::{SettlementAction, SettlementActor, SettlementReader, SettlementView};
