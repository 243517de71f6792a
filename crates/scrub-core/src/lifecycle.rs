//! Activation and uninstall hooks for the scrub flag

use crate::{Result, ScrubFlag, ScrubGate};
use tracing::info;

/// Write the default flag if none is stored yet. An existing choice,
/// including an explicit "no", survives re-activation.
pub async fn activate(gate: &ScrubGate, default_enabled: bool) -> Result<ScrubFlag> {
    let current = match gate.flag_state().await {
        Ok(flag) => flag,
        // Unrecognised stored value: reset to the default
        Err(crate::ScrubError::InvalidConfig(_)) => ScrubFlag::Unset,
        Err(e) => return Err(e),
    };

    if current != ScrubFlag::Unset {
        info!(flag = ?current, "scrub flag already set, keeping it");
        return Ok(current);
    }

    gate.set_enabled(default_enabled).await?;
    info!(enabled = default_enabled, "scrub flag initialized");
    Ok(if default_enabled {
        ScrubFlag::Enabled
    } else {
        ScrubFlag::Disabled
    })
}

/// The flag persists across deactivation.
pub fn deactivate() {
    info!("deactivated; scrub flag kept");
}

pub async fn uninstall(gate: &ScrubGate) -> Result<()> {
    gate.clear().await?;
    info!("scrub flag removed");
    Ok(())
}
