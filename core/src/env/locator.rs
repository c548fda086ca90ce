//! Definition lookup
//!
//! Maps a block device to the environment variable holding its partition
//! definition and fetches it. One lookup per call, no retries.

use super::{EnvKey, EnvStore};
use crate::config::EnvPartsConfig;
use crate::disk::BlockDevice;
use crate::error::{EnvPartError, Result};

/// Fetch the raw definition for `device`.
///
/// Fails with `Unsupported` for classes other than MMC and `Refused` for
/// eMMC hardware partitions other than the user area; neither touches the
/// store.
pub fn locate<'s, S: EnvStore + ?Sized>(
    store: &'s S,
    config: &EnvPartsConfig,
    device: &BlockDevice,
) -> Result<&'s str> {
    if !device.class.takes_env_parts() {
        tracing::debug!(
            "Skipped dev class {} devnum {} since it's not mmc",
            device.class,
            device.devnum
        );
        return Err(EnvPartError::Unsupported(device.class.name()));
    }

    if !device.is_primary() {
        tracing::error!("Refuse to parse eMMC boot partitions on {}", device);
        return Err(EnvPartError::Refused(device.hwpart));
    }

    let key = EnvKey::for_device(config.key_prefix, device.class, device.devnum).map_err(|e| {
        tracing::error!(
            "Environment key for {} does not fit in {} characters",
            device,
            EnvKey::MAX
        );
        e
    })?;

    tracing::debug!("Parsing parts from env '{}'", key);

    store.get(key.as_str()).ok_or_else(|| {
        tracing::error!("Failed to get environment '{}'", key);
        EnvPartError::NotFound
    })
}
