//! Settings file loading for the CLI.

use std::path::Path;

use anyhow::{Context, Result};
use bazaar_actions::Settings;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["bazaar.toml", ".bazaar.toml", "bazaar.json"];

/// Load settings from `path`, resolving relative paths against its directory.
pub fn load(path: &Path) -> Result<Settings> {
    let settings = Settings::load(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(settings.relative_to(base))
}

/// A commented `bazaar.toml` for a new shop.
pub fn generate_default_config() -> String {
    r#"# Bazaar storefront configuration

[store]
backend = "memory"
snapshot = ".bazaar/store.json"
# backend = "http"
# project_url = "https://<project>.api.sanity.io"
# dataset = "production"
# api_version = "v2021-10-21"

[cache]
path = ".bazaar/cache.json"
orders_ttl_secs = 60

[orders]
# Flat shipping fee in rupees
shipping_fee = 200
atomic_placement = false

[admin]
session_ttl_secs = 28800

# Secrets come from the environment:
#   ADMIN_PASSWORD      admin login password
#   BAZAAR_STORE_TOKEN  API token for the hosted store
"#
    .to_string()
}
