pub mod inspect;
pub mod record;
pub mod serve;

use daylog_store::BucketStore;

use crate::config::{ConfigArgs, ServerConfig};
use crate::error::ServerError;

/// Load the TOML config and open the store it describes.
pub(crate) fn open(args: &ConfigArgs) -> Result<(ServerConfig, BucketStore), ServerError> {
    let config = ServerConfig::load(&args.config)?;
    tracing::debug!(config = %args.config, data_dir = %config.store.data_dir.display(), "loaded config");
    let store = BucketStore::new(config.store.clone())?;
    Ok((config, store))
}
