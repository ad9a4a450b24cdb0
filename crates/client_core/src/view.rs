//! Pure mapping from session phase to the single active screen. An explicit
//! view request (the orders tab, or jumping back to the catalog) takes
//! precedence over the phase-derived default.

use crate::session::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Catalog,
    Generator,
    ShippingForm,
    Success,
    OrdersList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    Orders,
    Catalog,
}

pub fn resolve_view(phase: SessionPhase, requested: Option<ViewRequest>) -> ViewState {
    if let Some(request) = requested {
        return match request {
            ViewRequest::Orders => ViewState::OrdersList,
            ViewRequest::Catalog => ViewState::Catalog,
        };
    }

    match phase {
        SessionPhase::Idle | SessionPhase::InfluencerSelected => ViewState::Catalog,
        SessionPhase::Generating | SessionPhase::Listed => ViewState::Generator,
        SessionPhase::PurchaseRequested | SessionPhase::Purchasing => ViewState::ShippingForm,
        SessionPhase::Completed => ViewState::Success,
    }
}
