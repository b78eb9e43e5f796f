use crate::config::DatabaseConfig;
use crate::database::Database;
use std::path::PathBuf;
use std::sync::Arc;

/// Returns the default path of the contact database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/identity-reconciler/contacts.db`
/// - **Linux**: `~/.local/share/identity-reconciler/contacts.db`
/// - **Windows**: `%LOCALAPPDATA%\identity-reconciler\contacts.db`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("identity-reconciler").join("contacts.db"))
}

/// Initialize the database at the configured path, or the default one
pub fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<(Arc<Database>, PathBuf)> {
    let db_path = match &config.path {
        Some(path) => path.clone(),
        None => get_db_path()?,
    };

    let db = Database::new(&db_path, config)?;
    Ok((Arc::new(db), db_path))
}
