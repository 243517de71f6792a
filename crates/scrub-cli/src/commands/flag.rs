use anyhow::Result;
use scrub_core::ScrubFlag;

use super::Context;

pub async fn enable(ctx: &Context) -> Result<()> {
    ctx.gate.set_enabled(true).await?;
    println!("✓ IP scrubbing enabled");
    println!("  New comments will be stored with {}", ctx.gate.masked_value());
    Ok(())
}

pub async fn disable(ctx: &Context) -> Result<()> {
    ctx.gate.set_enabled(false).await?;
    println!("✓ IP scrubbing disabled");
    Ok(())
}

pub async fn delete(ctx: &Context) -> Result<()> {
    ctx.gate.clear().await?;
    println!("✓ Scrub flag removed (scrubbing is off until enabled again)");
    Ok(())
}

pub async fn status(ctx: &Context) -> Result<()> {
    let flag = match ctx.gate.flag_state().await {
        Ok(ScrubFlag::Enabled) => "enabled".to_string(),
        Ok(ScrubFlag::Disabled) => "disabled".to_string(),
        Ok(ScrubFlag::Unset) => "not set (disabled)".to_string(),
        Err(e) => format!("unreadable ({})", e),
    };

    println!("Scrubbing: {}", flag);
    println!("  Masked IP: {}", ctx.gate.masked_value());

    match ctx.locator.count_pending().await {
        Ok(0) => println!("  Pending comments: none"),
        Ok(count) => println!("  Pending comments: {} (run `scrub cleanup`)", count),
        Err(e) => println!("  Pending comments: unknown ({})", e),
    }

    Ok(())
}
