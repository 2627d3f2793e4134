//! `badgekit-migrate` -- upgrades legacy build files to the JSON schema.
//!
//! Every `<id>.xml` below the builds directory without a matching
//! `<id>.json` is read, migrated and written back as JSON. The legacy file
//! is left in place.
//!
//! Configuration comes from the environment; see
//! [`HostConfig::from_env`](badgekit_host::config::HostConfig::from_env).

use badgekit_host::build_store::{migrate_all, BuildStore};
use badgekit_host::config::HostConfig;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "badgekit_host=info,badgekit_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = HostConfig::from_env()?;
    let ctx = config.render_context()?;
    let store = BuildStore::new(&config.builds_dir);

    tracing::info!(
        builds_dir = %config.builds_dir.display(),
        resource_path = %config.badge.resource_path,
        "Starting legacy build migration",
    );

    let report = migrate_all(&store, ctx.icons())?;

    tracing::info!(
        migrated = report.migrated.len(),
        failed = report.failed.len(),
        "Migration complete",
    );

    if !report.failed.is_empty() {
        anyhow::bail!("{} build(s) failed to migrate", report.failed.len());
    }
    Ok(())
}
