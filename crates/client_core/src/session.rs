//! Drop-lifecycle state machine: one listing-and-purchase flow from catalog
//! selection through shipping capture. All ambient UI state lives here as
//! explicit session values; chain work is delegated to the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use shared::{
    domain::{Address, DeliveryStatus, Order, ShippingDetails},
    error::{SessionError, ValidationError},
    protocol::{DROP_COMMISSION_BPS, DROP_PRICE_LAMPORTS},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use crate::{
    catalog::CatalogStore,
    ledger::{new_order_id, new_tracking_id, OrderLedger},
    orchestrator::TransactionOrchestrator,
    view::{resolve_view, ViewRequest, ViewState},
};

/// Simulated generation delay shown to the user before the listing is minted.
const GENERATION_LATENCY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    InfluencerSelected,
    Generating,
    Listed,
    PurchaseRequested,
    Purchasing,
    Completed,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    PhaseChanged(SessionPhase),
    StatusChanged(String),
    OrderRecorded(Order),
}

struct SessionState {
    phase: SessionPhase,
    selected: Option<String>,
    listing: Option<Address>,
    asset_uri: Option<String>,
    status: Option<String>,
    requested_view: Option<ViewRequest>,
    ledger: OrderLedger,
    // Bumped on every generation start and on reset; a generation that
    // finishes under a different epoch lost the session and must not write
    // its result back.
    epoch: u64,
}

pub struct DropSession {
    catalog: Arc<CatalogStore>,
    orchestrator: Arc<TransactionOrchestrator>,
    generation_latency: Duration,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl DropSession {
    pub fn new(catalog: Arc<CatalogStore>, orchestrator: Arc<TransactionOrchestrator>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            catalog,
            orchestrator,
            generation_latency: GENERATION_LATENCY,
            inner: Mutex::new(SessionState {
                phase: SessionPhase::Idle,
                selected: None,
                listing: None,
                asset_uri: None,
                status: None,
                requested_view: None,
                ledger: OrderLedger::new(),
                epoch: 0,
            }),
            events,
        }
    }

    pub fn with_generation_latency(mut self, latency: Duration) -> Self {
        self.generation_latency = latency;
        self
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.lock().await.phase
    }

    pub async fn status(&self) -> Option<String> {
        self.inner.lock().await.status.clone()
    }

    pub async fn listing_address(&self) -> Option<Address> {
        self.inner.lock().await.listing
    }

    pub async fn chosen_asset(&self) -> Option<String> {
        self.inner.lock().await.asset_uri.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.inner.lock().await.ledger.orders().to_vec()
    }

    pub async fn order_count(&self) -> usize {
        self.inner.lock().await.ledger.len()
    }

    /// The one active screen for the current state. An explicit view request
    /// set via [`DropSession::request_view`] takes precedence.
    pub async fn current_view(&self) -> ViewState {
        let state = self.inner.lock().await;
        resolve_view(state.phase, state.requested_view)
    }

    pub async fn request_view(&self, request: Option<ViewRequest>) {
        self.inner.lock().await.requested_view = request;
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    fn emit_status(&self, status: &str) {
        self.emit(SessionEvent::StatusChanged(status.to_string()));
    }

    /// `Idle → InfluencerSelected`. Unknown ids are ignored; reselecting while
    /// still browsing is allowed.
    pub async fn select_influencer(&self, id: &str) {
        let mut state = self.inner.lock().await;
        if !matches!(
            state.phase,
            SessionPhase::Idle | SessionPhase::InfluencerSelected
        ) {
            debug!(phase = ?state.phase, "session: ignoring selection outside catalog phases");
            return;
        }
        if self.catalog.find(id).is_none() {
            debug!(influencer = id, "session: ignoring unknown influencer id");
            return;
        }
        state.selected = Some(id.to_string());
        state.phase = SessionPhase::InfluencerSelected;
        drop(state);
        self.emit(SessionEvent::PhaseChanged(SessionPhase::InfluencerSelected));
    }

    /// Picks one outfit at random for the selected influencer and lists it
    /// on-chain at the fixed price and commission. On failure the session
    /// drops back to `InfluencerSelected` and stays reusable. A reset issued
    /// while generation is in flight wins: the late completion is discarded.
    pub async fn generate_drop(&self) -> Result<Address, SessionError> {
        let (asset_uri, epoch) = {
            let mut state = self.inner.lock().await;
            if state.phase != SessionPhase::InfluencerSelected {
                return Err(ValidationError::InvalidPhase.into());
            }
            if !self.orchestrator.signer_available() {
                state.status = Some("Connect a wallet before generating a drop".into());
                drop(state);
                self.emit_status("Connect a wallet before generating a drop");
                return Err(ValidationError::MissingSigner.into());
            }
            let id = state
                .selected
                .clone()
                .ok_or(ValidationError::InvalidPhase)?;
            let influencer = self
                .catalog
                .find(&id)
                .ok_or(ValidationError::InvalidPhase)?;
            let asset_uri = influencer
                .outfits
                .choose(&mut rand::thread_rng())
                .cloned()
                .ok_or(ValidationError::InvalidPhase)?;
            state.phase = SessionPhase::Generating;
            state.status = Some("Generating outfit...".into());
            state.epoch += 1;
            (asset_uri, state.epoch)
        };
        self.emit(SessionEvent::PhaseChanged(SessionPhase::Generating));
        self.emit_status("Generating outfit...");

        tokio::time::sleep(self.generation_latency).await;
        {
            let mut state = self.inner.lock().await;
            if state.epoch != epoch {
                debug!("session: generation abandoned during the latency window");
                return Err(ValidationError::InvalidPhase.into());
            }
            state.status = Some("Minting drop on-chain...".into());
        }
        self.emit_status("Minting drop on-chain...");

        match self
            .orchestrator
            .create_listing(DROP_PRICE_LAMPORTS, DROP_COMMISSION_BPS, &asset_uri)
            .await
        {
            Ok(address) => {
                let status = format!("Drop live: {}...", address.short());
                {
                    let mut state = self.inner.lock().await;
                    if state.epoch != epoch {
                        debug!(listing = %address, "session: discarding listing that outlived its session");
                        return Err(ValidationError::InvalidPhase.into());
                    }
                    state.phase = SessionPhase::Listed;
                    state.listing = Some(address);
                    state.asset_uri = Some(asset_uri);
                    state.status = Some(status.clone());
                }
                info!(listing = %address, "session: drop listed");
                self.emit(SessionEvent::PhaseChanged(SessionPhase::Listed));
                self.emit_status(&status);
                Ok(address)
            }
            Err(err) => {
                let status = format!("Drop failed: {err}");
                {
                    let mut state = self.inner.lock().await;
                    if state.epoch != epoch {
                        return Err(err.into());
                    }
                    state.phase = SessionPhase::InfluencerSelected;
                    state.status = Some(status.clone());
                }
                self.emit(SessionEvent::PhaseChanged(SessionPhase::InfluencerSelected));
                self.emit_status(&status);
                Err(err.into())
            }
        }
    }

    /// Opens shipping capture for the listed drop. No chain interaction.
    pub async fn request_purchase(&self) -> Result<(), SessionError> {
        let mut state = self.inner.lock().await;
        if state.phase != SessionPhase::Listed {
            return Err(ValidationError::InvalidPhase.into());
        }
        if !self.orchestrator.signer_available() {
            state.status = Some("Connect a wallet before buying".into());
            drop(state);
            self.emit_status("Connect a wallet before buying");
            return Err(ValidationError::MissingSigner.into());
        }
        if state.listing.is_none() {
            return Err(ValidationError::NoActiveListing.into());
        }
        state.phase = SessionPhase::PurchaseRequested;
        drop(state);
        self.emit(SessionEvent::PhaseChanged(SessionPhase::PurchaseRequested));
        Ok(())
    }

    /// Validates the shipping form, then submits the purchase. A validation
    /// failure never reaches the orchestrator; a chain failure returns the
    /// session to `PurchaseRequested` so the user can retry.
    pub async fn submit_shipping(&self, details: ShippingDetails) -> Result<Order, SessionError> {
        let (listing, influencer_name) = {
            let mut state = self.inner.lock().await;
            if state.phase != SessionPhase::PurchaseRequested {
                return Err(ValidationError::InvalidPhase.into());
            }
            if let Err(err) = validate_shipping(&details) {
                state.status = Some(err.to_string());
                drop(state);
                self.emit_status(&err.to_string());
                return Err(err.into());
            }
            let listing = state.listing.ok_or(ValidationError::NoActiveListing)?;
            let influencer_name = state
                .selected
                .as_deref()
                .and_then(|id| self.catalog.find(id))
                .map(|influencer| influencer.name.clone())
                .unwrap_or_default();
            state.phase = SessionPhase::Purchasing;
            state.status = Some("Processing payment...".into());
            (listing, influencer_name)
        };
        self.emit(SessionEvent::PhaseChanged(SessionPhase::Purchasing));
        self.emit_status("Processing payment...");

        match self.orchestrator.purchase(listing, DROP_PRICE_LAMPORTS).await {
            Ok(receipt) => {
                let order = Order {
                    order_id: new_order_id(),
                    tracking_id: new_tracking_id(),
                    asset_uri: receipt.metadata_uri,
                    influencer: influencer_name,
                    created_at: chrono::Utc::now(),
                    delivery_status: DeliveryStatus::Processing,
                    shipping_summary: details.summary(),
                    listing,
                };
                let status = format!("Purchase complete. Order {}", order.order_id);
                {
                    let mut state = self.inner.lock().await;
                    state.ledger.append(order.clone());
                    state.phase = SessionPhase::Completed;
                    state.status = Some(status.clone());
                }
                info!(
                    listing = %listing,
                    order_id = %order.order_id,
                    "session: purchase recorded"
                );
                self.emit(SessionEvent::PhaseChanged(SessionPhase::Completed));
                self.emit(SessionEvent::OrderRecorded(order.clone()));
                self.emit_status(&status);
                Ok(order)
            }
            Err(err) => {
                let status = format!("Purchase failed: {err}");
                {
                    let mut state = self.inner.lock().await;
                    state.phase = SessionPhase::PurchaseRequested;
                    state.status = Some(status.clone());
                }
                self.emit(SessionEvent::PhaseChanged(SessionPhase::PurchaseRequested));
                self.emit_status(&status);
                Err(err.into())
            }
        }
    }

    /// Back to `Idle`, clearing the listing, chosen asset, and status. An
    /// in-flight purchase cannot be abandoned; a pending generation is, and
    /// its late result is discarded. The ledger is never touched.
    pub async fn reset(&self) -> Result<(), ValidationError> {
        let mut state = self.inner.lock().await;
        if state.phase == SessionPhase::Purchasing {
            return Err(ValidationError::InvalidPhase);
        }
        state.phase = SessionPhase::Idle;
        state.selected = None;
        state.listing = None;
        state.asset_uri = None;
        state.status = None;
        state.epoch += 1;
        drop(state);
        self.emit(SessionEvent::PhaseChanged(SessionPhase::Idle));
        Ok(())
    }
}

fn validate_shipping(details: &ShippingDetails) -> Result<(), ValidationError> {
    if details.recipient_name.trim().is_empty() {
        return Err(ValidationError::EmptyField("recipient name"));
    }
    if details.street_address.trim().is_empty() {
        return Err(ValidationError::EmptyField("street address"));
    }
    if details.city.trim().is_empty() {
        return Err(ValidationError::EmptyField("city"));
    }
    if details.postal_code.trim().is_empty() {
        return Err(ValidationError::EmptyField("postal code"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
