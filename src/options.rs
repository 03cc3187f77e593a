//! Container configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Configuration for a [`Container`](crate::Container)
///
/// All limits are enforced eagerly at the point of registration, scope
/// creation, or hook addition, failing fast with
/// [`DiError::ResourceLimit`] rather than silently evicting.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, ContainerOptions};
///
/// let opts = ContainerOptions {
///     strict_mode: true,
///     max_services: 64,
///     ..ContainerOptions::default()
/// };
/// let di = Container::new(opts);
/// assert!(di.is_empty());
/// ```
///
/// Options can also be loaded from JSON, with absent fields defaulted:
///
/// ```rust
/// use keyed_di::ContainerOptions;
///
/// let opts = ContainerOptions::from_json(r#"{"verbose": true, "max_scopes": 8}"#).unwrap();
/// assert!(opts.verbose);
/// assert_eq!(opts.max_scopes, 8);
/// assert!(!opts.strict_mode);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// Emit `tracing` debug events for registration, resolution, and
    /// scope lifecycle.
    pub verbose: bool,
    /// Reject duplicate registrations unless the builder called
    /// `override_existing()` (or `allow_overrides` is set). When off,
    /// re-registering a name silently replaces the old registration.
    pub strict_mode: bool,
    /// Permit replacement of existing registrations even under strict
    /// mode, without a per-registration override.
    pub allow_overrides: bool,
    /// Maximum number of registered services.
    pub max_services: usize,
    /// Maximum number of cached singleton instances.
    pub max_instances: usize,
    /// Maximum number of live scopes.
    pub max_scopes: usize,
    /// Maximum number of callbacks per hook event.
    pub max_hooks_per_event: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            strict_mode: false,
            allow_overrides: false,
            max_services: 1000,
            max_instances: 1000,
            max_scopes: 100,
            max_hooks_per_event: 32,
        }
    }
}

impl ContainerOptions {
    /// Parses options from a JSON document, defaulting absent fields.
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DiError::InvalidArgument(format!("invalid options JSON: {}", e)))
    }
}
