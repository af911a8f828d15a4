//! Configuration commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Init { force } => init(force, ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.settings);
        return Ok(());
    }

    let settings = &ctx.settings;
    ctx.output.header("Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("File", &path.display().to_string()),
        None => ctx.output.kv("File", "(none, using defaults)"),
    }

    ctx.output.kv("Store backend", &format!("{:?}", settings.store.backend).to_lowercase());
    if let Some(snapshot) = &settings.store.snapshot {
        ctx.output.kv("Store snapshot", &snapshot.display().to_string());
    }
    if let Some(url) = &settings.store.project_url {
        ctx.output.kv("Project URL", url);
        ctx.output.kv("Dataset", &settings.store.dataset);
    }
    ctx.output.kv(
        "Store token",
        if settings.store.token.is_some() { "set" } else { "not set" },
    );
    match &settings.cache.path {
        Some(path) => ctx.output.kv("Cache file", &path.display().to_string()),
        None => ctx.output.kv("Cache file", "(in memory)"),
    }
    ctx.output.kv("Orders cache TTL", &format!("{}s", settings.cache.orders_ttl_secs));
    ctx.output.kv("Shipping fee", &settings.orders.shipping_fee().to_string());
    ctx.output.kv(
        "Atomic placement",
        &settings.orders.atomic_placement.to_string(),
    );
    ctx.output.kv(
        "Admin password",
        if settings.admin.password.is_some() { "set" } else { "not set" },
    );
    ctx.output.kv("Session TTL", &format!("{}s", settings.admin.session_ttl_secs));

    Ok(())
}

fn init(force: bool, ctx: &Context) -> Result<()> {
    let path = ctx.cwd.join("bazaar.toml");
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    std::fs::write(&path, generate_default_config())?;
    ctx.output.success(&format!("Wrote {}", path.display()));
    ctx.output.info("Set ADMIN_PASSWORD in the environment to enable admin login.");
    Ok(())
}
