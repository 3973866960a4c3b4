//! Application state for the VR engine API.
//!
//! The router's state is a cheap handle onto one shared [`VrService`].

use std::sync::Arc;

use crate::service::VrService;

/// Shared application state.
///
/// Every handler works against the same [`VrService`], so a consolidate
/// request is visible to later calculate and validate requests.
#[derive(Clone)]
pub struct AppState {
    /// The engine service.
    service: Arc<VrService>,
}

impl AppState {
    /// Creates a new application state around the given service.
    pub fn new(service: VrService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns a shared handle to the service.
    pub fn service(&self) -> Arc<VrService> {
        Arc::clone(&self.service)
    }
}
