//! Command implementations.

pub mod extract;
pub mod forget;
pub mod list;
pub mod sweep;
pub mod verify;

pub use self::extract::execute_extract;
pub use self::forget::execute_forget;
pub use self::list::{execute_list, execute_show};
pub use self::sweep::execute_sweep;
pub use self::verify::execute_verify;

use crate::config::Config;
use crate::error::{CliError, Result};
use lexcheck_extractor::Extractor;
use lexcheck_store::{SqliteStore, StoreError};
use lexcheck_verify::{HttpStatuteSource, StatuteSource, VerificationClient};
use std::fs;

/// Open the database and build an extractor against the configured legal database.
pub fn open_extractor(config: &Config) -> Result<Extractor<HttpStatuteSource, SqliteStore>> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteStore::new(&config.database_path)?;
    let source = HttpStatuteSource::new(config.source.clone())?;
    let client = VerificationClient::new(source, config.client.clone())?;
    Ok(Extractor::new(client, store, config.extractor.clone())?)
}

/// Run one store operation under the extractor's lock.
pub(crate) fn with_store<S: StatuteSource, T>(
    extractor: &Extractor<S, SqliteStore>,
    op: impl FnOnce(&mut SqliteStore) -> std::result::Result<T, StoreError>,
) -> Result<T> {
    let mut store = extractor
        .store()
        .lock()
        .map_err(|e| CliError::Config(format!("Store lock error: {}", e)))?;
    Ok(op(&mut store)?)
}
