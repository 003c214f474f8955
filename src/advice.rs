//! Static maintenance advice, keyed by media type.
//!
//! The book is built once at startup from built-in defaults plus optional
//! config overrides and injected into the app; nothing here is global.

use crate::model::MediaType;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug)]
pub struct AdviceEntry {
    pub title: String,
    pub items: Vec<String>,
}

pub struct AdviceBook {
    entries: BTreeMap<MediaType, AdviceEntry>,
    fallback: AdviceEntry,
}

impl AdviceBook {
    pub fn new(overrides: &HashMap<String, Vec<String>>) -> Self {
        let mut entries = BTreeMap::new();
        for media in MediaType::ALL {
            let mut entry = default_entry(media);
            if let Some(items) = overrides.get(override_key(media)) {
                if !items.is_empty() {
                    entry.items = items.clone();
                }
            }
            entries.insert(media, entry);
        }
        let fallback = entries
            .get(&MediaType::Unknown)
            .cloned()
            .unwrap_or_else(|| default_entry(MediaType::Unknown));
        Self { entries, fallback }
    }

    /// Total over every media type; unrecognized types get the generic
    /// fallback.
    pub fn advice_for(&self, media: MediaType) -> &AdviceEntry {
        self.entries.get(&media).unwrap_or(&self.fallback)
    }
}

fn override_key(media: MediaType) -> &'static str {
    match media {
        MediaType::Ssd => "ssd",
        MediaType::Hdd => "hdd",
        MediaType::Removable => "removable",
        MediaType::Network => "network",
        MediaType::Unknown => "generic",
    }
}

fn default_entry(media: MediaType) -> AdviceEntry {
    let (title, items): (&str, &[&str]) = match media {
        MediaType::Ssd => (
            "Caring for SSD drives",
            &[
                "Keep 10-15% of the capacity free; full SSDs wear faster",
                "Make sure TRIM is enabled for the filesystem",
                "Keep the drive firmware up to date",
                "Never defragment an SSD; it only consumes write cycles",
                "Use AHCI mode in firmware settings for full TRIM support",
            ],
        ),
        MediaType::Hdd => (
            "Caring for HDD drives",
            &[
                "Check for filesystem errors and defragment periodically",
                "Avoid shocks and vibration while the drive is spinning",
                "Keep the drive temperature below 45 C",
                "Scan for bad sectors from time to time",
                "Mount the drive flat so the platters load evenly",
            ],
        ),
        MediaType::Removable => (
            "Caring for removable media",
            &[
                "Always eject safely before unplugging",
                "Keep a copy elsewhere; flash media fails without warning",
                "Avoid filling the device completely",
                "Do not use removable media as the only backup location",
            ],
        ),
        MediaType::Network => (
            "Network shares",
            &[
                "Capacity and free space are reported by the remote server",
                "Slow responses usually mean network, not disk, problems",
                "Maintenance has to happen on the host that owns the share",
            ],
        ),
        MediaType::Unknown => (
            "General drive care",
            &[
                "Back up important data regularly",
                "Use stable power or a UPS",
                "Check the drive's S.M.A.R.T. status with a dedicated tool",
                "Keep at least 10-15% of the capacity free",
                "Avoid abrupt power-offs",
                "Clear temporary files and empty the trash periodically",
            ],
        ),
    };
    AdviceEntry {
        title: title.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}
