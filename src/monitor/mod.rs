mod volumes;

use crate::model::{HostSummary, Volume};
use std::fmt;
use std::io;
use sysinfo::{Disks, System};

pub use volumes::{classify_media, figures_consistent};

/// Per-volume query failure. Non-fatal: the caller keeps the volume in the
/// list and shows the error inline.
#[derive(Debug)]
pub enum QueryError {
    AccessDenied(String),
    Gone(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::AccessDenied(mount) => {
                write!(f, "access denied reading {}", mount)
            }
            QueryError::Gone(mount) => write!(f, "{} is no longer mounted", mount),
        }
    }
}

impl std::error::Error for QueryError {}

/// Seam between the application core and the OS. The real implementation
/// wraps sysinfo; tests substitute a fake.
pub trait VolumeSource {
    /// One point-in-time enumeration of all mounted volumes. May be empty.
    fn list(&mut self) -> Vec<Volume>;

    /// One-shot re-read of a single volume, identified by mount point.
    fn refresh(&mut self, mount_point: &str) -> Result<Volume, QueryError>;

    fn host(&mut self) -> HostSummary;
}

pub struct DiskQuery {
    disks: Disks,
}

impl DiskQuery {
    pub fn new() -> Self {
        Self {
            disks: Disks::new_with_refreshed_list(),
        }
    }

    /// Probe for the permission failures sysinfo swallows. Protected
    /// volumes stay listed; reading them reports the denial per volume.
    fn probe_access(mount_point: &str) -> Result<(), QueryError> {
        match std::fs::read_dir(mount_point) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(QueryError::AccessDenied(mount_point.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(QueryError::Gone(mount_point.to_string()))
            }
            // Other probe failures are not conclusive; trust the figures.
            Err(_) => Ok(()),
        }
    }
}

impl VolumeSource for DiskQuery {
    fn list(&mut self) -> Vec<Volume> {
        self.disks.refresh(true);
        volumes::collect(&self.disks)
    }

    fn refresh(&mut self, mount_point: &str) -> Result<Volume, QueryError> {
        self.disks.refresh(true);
        Self::probe_access(mount_point)?;
        volumes::collect(&self.disks)
            .into_iter()
            .find(|v| v.mount_point == mount_point)
            .ok_or_else(|| QueryError::Gone(mount_point.to_string()))
    }

    fn host(&mut self) -> HostSummary {
        let os = match (System::name(), System::os_version()) {
            (Some(name), Some(version)) => format!("{} {}", name, version),
            (Some(name), None) => name,
            _ => "unknown OS".to_string(),
        };
        HostSummary {
            os,
            uptime_secs: System::uptime(),
        }
    }
}
