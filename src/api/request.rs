//! Request types for the VR engine API.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request body for the `/consolidate` endpoint.
///
/// An empty body or a missing `source_location` loads from the configured
/// data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidateRequest {
    /// A `.zip` archive or a directory holding the extracts.
    #[serde(default)]
    pub source_location: Option<PathBuf>,
}
