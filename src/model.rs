use std::fmt;

/// Hardware classification of a volume, used to pick the advice text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MediaType {
    Ssd,
    Hdd,
    Removable,
    Network,
    Unknown,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Ssd,
        MediaType::Hdd,
        MediaType::Removable,
        MediaType::Network,
        MediaType::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MediaType::Ssd => "SSD",
            MediaType::Hdd => "HDD",
            MediaType::Removable => "Removable",
            MediaType::Network => "Network",
            MediaType::Unknown => "Disk",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point-in-time snapshot of one mounted volume. Discarded on the next
/// refresh, never persisted.
#[derive(Clone, Debug)]
pub struct Volume {
    pub name: String,
    pub mount_point: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub file_system: String,
    pub media: MediaType,
    /// False when used + free disagrees with total beyond filesystem
    /// reporting slack, or when the figures are unavailable entirely.
    pub figures_consistent: bool,
}

impl Volume {
    pub fn fill_percent(&self) -> f32 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.used_bytes as f32 / self.total_bytes as f32) * 100.0
    }

    pub fn fill_status(&self) -> FillStatus {
        FillStatus::from_percent(self.fill_percent())
    }
}

/// Presentational fill classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillStatus {
    Critical,
    Warning,
    Ok,
    Plenty,
}

impl FillStatus {
    pub fn from_percent(pct: f32) -> Self {
        if pct > 90.0 {
            FillStatus::Critical
        } else if pct > 70.0 {
            FillStatus::Warning
        } else if pct < 20.0 {
            FillStatus::Plenty
        } else {
            FillStatus::Ok
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FillStatus::Critical => "critically low on space",
            FillStatus::Warning => "getting full",
            FillStatus::Ok => "enough space",
            FillStatus::Plenty => "plenty of space",
        }
    }
}

/// Host facts shown in the status line.
#[derive(Clone, Debug, Default)]
pub struct HostSummary {
    pub os: String,
    pub uptime_secs: u64,
}

/// Message contract between the view layer and the application core. The
/// view only ever emits these; it never talks to the disk query service,
/// the chart renderer, or the advice book directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Select(usize),
    SelectNext,
    SelectPrev,
    Refresh,
    ToggleOverview,
    SaveChart,
}

/// One list row: the latest snapshot plus an inline error from the most
/// recent refresh attempt, if any.
#[derive(Clone, Debug)]
pub struct VolumeRow {
    pub volume: Volume,
    pub error: Option<String>,
}

/// Everything the view paints. Owned by the App, read by the window.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub rows: Vec<VolumeRow>,
    pub selected: Option<usize>,
    pub show_overview: bool,
    pub summary: HostSummary,
}

impl ViewState {
    pub fn selected_row(&self) -> Option<&VolumeRow> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    pub fn average_fill_percent(&self) -> f32 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.rows.iter().map(|r| r.volume.fill_percent()).sum();
        sum / self.rows.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(total: u64, used: u64) -> Volume {
        Volume {
            name: "disk0".into(),
            mount_point: "/".into(),
            total_bytes: total,
            used_bytes: used,
            available_bytes: total - used,
            file_system: "ext4".into(),
            media: MediaType::Ssd,
            figures_consistent: true,
        }
    }

    #[test]
    fn fill_percent_zero_total() {
        let v = volume(0, 0);
        assert_eq!(v.fill_percent(), 0.0);
    }

    #[test]
    fn fill_status_thresholds() {
        assert_eq!(FillStatus::from_percent(95.0), FillStatus::Critical);
        assert_eq!(FillStatus::from_percent(75.0), FillStatus::Warning);
        assert_eq!(FillStatus::from_percent(50.0), FillStatus::Ok);
        assert_eq!(FillStatus::from_percent(10.0), FillStatus::Plenty);
        assert_eq!(FillStatus::from_percent(70.0), FillStatus::Ok);
    }

    #[test]
    fn average_fill_over_rows() {
        let state = ViewState {
            rows: vec![
                VolumeRow { volume: volume(100, 20), error: None },
                VolumeRow { volume: volume(100, 60), error: None },
            ],
            ..Default::default()
        };
        assert!((state.average_fill_percent() - 40.0).abs() < 0.01);
    }
}
