//! Client core for the SolStyle drop storefront: catalog lookup, deterministic
//! address derivation, transaction orchestration against the drop program, the
//! drop-lifecycle session state machine, and the local order ledger.

pub mod catalog;
pub mod derive;
pub mod ledger;
pub mod orchestrator;
pub mod rpc;
pub mod session;
pub mod signer;
pub mod view;

pub use catalog::CatalogStore;
pub use ledger::OrderLedger;
pub use orchestrator::{PurchaseReceipt, TransactionOrchestrator};
pub use rpc::{ChainRpc, HttpChainRpc, InMemoryChain, MissingChainRpc};
pub use session::{DropSession, SessionEvent, SessionPhase};
pub use signer::{LocalKeypairSigner, MissingWalletSigner, WalletSigner};
pub use view::{resolve_view, ViewRequest, ViewState};
