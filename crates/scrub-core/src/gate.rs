//! Configuration gate: the scrub flag and the masked address

use crate::{
    DISABLED_SENTINEL, ENABLED_SENTINEL, MaskedValue, OPTION_KEY, OptionStore, Result, ScrubError,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Strict reading of the stored flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubFlag {
    Enabled,
    Disabled,
    /// No value stored (never activated, or deleted)
    Unset,
}

impl ScrubFlag {
    pub fn is_enabled(self) -> bool {
        matches!(self, ScrubFlag::Enabled)
    }
}

/// Injected configuration shared by the locator, mutator and engine
#[derive(Clone)]
pub struct ScrubGate {
    options: Arc<dyn OptionStore>,
    masked_override: Option<String>,
}

impl ScrubGate {
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self {
            options,
            masked_override: None,
        }
    }

    /// Replacement address to use instead of the default (validated on read)
    pub fn with_masked_override(mut self, masked: Option<String>) -> Self {
        self.masked_override = masked;
        self
    }

    /// True only when the stored flag equals the enabled sentinel.
    /// A failed read counts as disabled.
    pub async fn is_enabled(&self) -> bool {
        match self.options.get(OPTION_KEY).await {
            Ok(value) => value.as_deref() == Some(ENABLED_SENTINEL),
            Err(e) => {
                warn!(error = %e, "could not read scrub flag, treating as disabled");
                false
            }
        }
    }

    /// `"yes"` or `"no"`, for form checkboxes and display
    pub async fn enabled_label(&self) -> String {
        if self.is_enabled().await {
            ENABLED_SENTINEL.to_string()
        } else {
            DISABLED_SENTINEL.to_string()
        }
    }

    pub async fn flag_state(&self) -> Result<ScrubFlag> {
        let value = self
            .options
            .get(OPTION_KEY)
            .await
            .map_err(|e| ScrubError::Store(e.to_string()))?;

        match value.as_deref() {
            None => Ok(ScrubFlag::Unset),
            Some(ENABLED_SENTINEL) => Ok(ScrubFlag::Enabled),
            Some(DISABLED_SENTINEL) => Ok(ScrubFlag::Disabled),
            Some(other) => Err(ScrubError::InvalidConfig(format!(
                "unrecognized value '{}' stored for {}",
                other, OPTION_KEY
            ))),
        }
    }

    pub fn masked_value(&self) -> MaskedValue {
        let masked = MaskedValue::resolve(self.masked_override.as_deref());
        if let Some(raw) = &self.masked_override
            && raw != masked.as_str()
        {
            warn!(override_value = %raw, fallback = %masked, "invalid masked IP override");
        }
        masked
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        let value = if enabled {
            ENABLED_SENTINEL
        } else {
            DISABLED_SENTINEL
        };
        self.options
            .set(OPTION_KEY, value)
            .await
            .map_err(|e| ScrubError::Store(e.to_string()))
    }

    /// Remove the stored flag entirely
    pub async fn clear(&self) -> Result<()> {
        self.options
            .delete(OPTION_KEY)
            .await
            .map_err(|e| ScrubError::Store(e.to_string()))
    }
}

/// Settings form sanitiser: only an explicit "yes" enables scrubbing.
pub fn sanitize_flag_input(input: &str) -> &'static str {
    if input.trim() == ENABLED_SENTINEL {
        ENABLED_SENTINEL
    } else {
        DISABLED_SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryOptionStore;

    fn gate_with(value: Option<&str>) -> ScrubGate {
        let store = MemoryOptionStore::new();
        if let Some(v) = value {
            store.insert(OPTION_KEY, v);
        }
        ScrubGate::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_is_enabled_requires_exact_sentinel() {
        assert!(gate_with(Some("yes")).is_enabled().await);
        assert!(!gate_with(Some("no")).is_enabled().await);
        assert!(!gate_with(Some("YES")).is_enabled().await);
        assert!(!gate_with(Some("1")).is_enabled().await);
        assert!(!gate_with(None).is_enabled().await);
    }

    #[tokio::test]
    async fn test_unreadable_flag_is_disabled() {
        let store = MemoryOptionStore::new();
        store.insert(OPTION_KEY, "yes");
        store.fail_reads(true);
        let gate = ScrubGate::new(Arc::new(store));

        assert!(!gate.is_enabled().await);
        assert!(matches!(gate.flag_state().await, Err(ScrubError::Store(_))));
    }

    #[tokio::test]
    async fn test_enabled_label() {
        assert_eq!(gate_with(Some("yes")).enabled_label().await, "yes");
        assert_eq!(gate_with(Some("maybe")).enabled_label().await, "no");
    }

    #[tokio::test]
    async fn test_flag_state() {
        assert_eq!(gate_with(Some("yes")).flag_state().await.unwrap(), ScrubFlag::Enabled);
        assert_eq!(gate_with(Some("no")).flag_state().await.unwrap(), ScrubFlag::Disabled);
        assert_eq!(gate_with(None).flag_state().await.unwrap(), ScrubFlag::Unset);
        assert!(matches!(
            gate_with(Some("maybe")).flag_state().await,
            Err(ScrubError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_set_and_clear() {
        let gate = gate_with(None);
        gate.set_enabled(true).await.unwrap();
        assert!(gate.is_enabled().await);
        gate.set_enabled(false).await.unwrap();
        assert_eq!(gate.flag_state().await.unwrap(), ScrubFlag::Disabled);
        gate.clear().await.unwrap();
        assert_eq!(gate.flag_state().await.unwrap(), ScrubFlag::Unset);
    }

    #[test]
    fn test_masked_value_override() {
        let gate = gate_with(None).with_masked_override(Some("not-an-ip".to_string()));
        assert_eq!(gate.masked_value().as_str(), "127.0.0.1");

        let gate = gate_with(None).with_masked_override(Some("10.0.0.5".to_string()));
        assert_eq!(gate.masked_value().as_str(), "10.0.0.5");

        assert_eq!(gate_with(None).masked_value().as_str(), "127.0.0.1");
    }

    #[test]
    fn test_sanitize_flag_input() {
        assert_eq!(sanitize_flag_input("yes"), "yes");
        assert_eq!(sanitize_flag_input(" yes "), "yes");
        assert_eq!(sanitize_flag_input("no"), "no");
        assert_eq!(sanitize_flag_input(""), "no");
        assert_eq!(sanitize_flag_input("on"), "no");
    }
}
