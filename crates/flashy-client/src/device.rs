//! Device identity persistence.
//!
//! A device generates a UUID once and keeps it on disk; the same value is
//! sent as `X-Device-Id` on every request from then on.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use flashy_shared::DeviceId;
use tracing::{info, warn};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    id: DeviceId,
    path: PathBuf,
}

impl DeviceIdentity {
    /// Default location: `<platform config dir>/device_id`.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("app", "flashy", "flashy").ok_or(ClientError::NoDataDir)?;
        Ok(dirs.config_dir().join("device_id"))
    }

    /// Read the stored identity, generating and persisting a new one when the
    /// file is missing, blank, or holds the reserved starter-deck owner.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => match DeviceId::parse(&raw) {
                Some(id) if !id.is_system() => {
                    return Ok(Self {
                        id,
                        path: path.to_path_buf(),
                    })
                }
                Some(_) => warn!(path = %path.display(), "stored device id is reserved, regenerating"),
                None => warn!(path = %path.display(), "stored device id is blank, regenerating"),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let id = DeviceId::generate();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, id.as_str())?;
        info!(path = %path.display(), "generated new device id");

        Ok(Self {
            id,
            path: path.to_path_buf(),
        })
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
