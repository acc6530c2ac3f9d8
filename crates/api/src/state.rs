use std::sync::Arc;

use vodify_core::traits::EventDirectory;
use vodify_core::ConversionService;
use vodify_vimeo::VimeoClient;

use crate::config::ServerConfig;
use crate::converter::JobSubmitter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Handlers only
/// see collaborator interfaces; the database pool lives inside the
/// concrete store implementations wired up in `main.rs`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The conversion-status state machine.
    pub service: Arc<ConversionService>,
    /// Event instance lookups (prefill, materialization context).
    pub events: Arc<dyn EventDirectory>,
    /// Job submission to the external conversion service.
    pub submitter: Arc<dyn JobSubmitter>,
    /// Video-host lookup client; `None` when no access token is configured.
    pub vimeo: Option<Arc<VimeoClient>>,
}
