use crate::model::{MediaType, Volume};
use sysinfo::{DiskKind, Disks};

/// Filesystems that indicate a network share regardless of reported kind.
const NETWORK_FILESYSTEMS: [&str; 7] =
    ["nfs", "nfs4", "smbfs", "cifs", "webdav", "9p", "fuse.sshfs"];

pub fn collect(disks: &Disks) -> Vec<Volume> {
    disks
        .iter()
        .map(|d| {
            let total = d.total_space();
            let available = d.available_space();
            let used = total.saturating_sub(available);
            let file_system = d.file_system().to_string_lossy().to_string();
            let media = classify_media(d.kind(), d.is_removable(), &file_system);
            Volume {
                name: d.name().to_string_lossy().to_string(),
                mount_point: d.mount_point().to_string_lossy().to_string(),
                total_bytes: total,
                used_bytes: used,
                available_bytes: available,
                file_system,
                media,
                figures_consistent: figures_consistent(total, used, available),
            }
        })
        .collect()
}

/// Network shares and removable media take precedence over the reported
/// disk kind, which is meaningless for them on most platforms.
pub fn classify_media(kind: DiskKind, removable: bool, file_system: &str) -> MediaType {
    let fs = file_system.to_ascii_lowercase();
    if NETWORK_FILESYSTEMS.iter().any(|n| fs == *n) {
        return MediaType::Network;
    }
    if removable {
        return MediaType::Removable;
    }
    match kind {
        DiskKind::SSD => MediaType::Ssd,
        DiskKind::HDD => MediaType::Hdd,
        DiskKind::Unknown(_) => MediaType::Unknown,
    }
}

/// used + free must land within filesystem reporting slack of total.
/// Zero-capacity volumes count as having unavailable figures.
pub fn figures_consistent(total: u64, used: u64, free: u64) -> bool {
    if total == 0 {
        return false;
    }
    // 1% of capacity or 64 MiB, whichever is larger.
    let slack = (total / 100).max(64 * 1024 * 1024);
    let sum = used.saturating_add(free);
    sum.abs_diff(total) <= slack
}
