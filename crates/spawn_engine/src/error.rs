//! Error types for policy construction.
//!
//! Selection itself never fails; these only surface while building a
//! [`SpawnPolicy`](crate::SpawnPolicy) from configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("max_tries must be at least 1")]
    ZeroTries,

    #[error("Fatal block list contains a blank material name")]
    BlankMaterial,

    #[error("Enabled world list contains a blank world name")]
    BlankWorld,
}
