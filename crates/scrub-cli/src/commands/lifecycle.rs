use anyhow::Result;
use scrub_core::{ScrubFlag, lifecycle};

use super::Context;

pub async fn activate(ctx: &Context, enabled: Option<bool>) -> Result<()> {
    let default_enabled = enabled.unwrap_or(ctx.config.default_enabled);
    let flag = lifecycle::activate(&ctx.gate, default_enabled).await?;

    match flag {
        ScrubFlag::Enabled => println!("✓ Activated: IP scrubbing is enabled"),
        _ => println!("✓ Activated: IP scrubbing is disabled"),
    }
    Ok(())
}

pub fn deactivate() -> Result<()> {
    lifecycle::deactivate();
    println!("✓ Deactivated (settings kept)");
    Ok(())
}

pub async fn uninstall(ctx: &Context) -> Result<()> {
    lifecycle::uninstall(&ctx.gate).await?;
    println!("✓ Uninstalled: scrub settings removed");
    Ok(())
}
