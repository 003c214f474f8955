use crate::advice::{AdviceBook, AdviceEntry};
use crate::config::Config;
use crate::model::{UiEvent, ViewState, VolumeRow};
use crate::monitor::VolumeSource;

/// Application core: owns the injected services and the view state, and
/// consumes the view's event messages. Knows nothing about the GUI toolkit.
pub struct App<S: VolumeSource> {
    config: Config,
    source: S,
    advice: AdviceBook,
    view: ViewState,
}

impl<S: VolumeSource> App<S> {
    pub fn new(config: Config, source: S) -> Self {
        let advice = AdviceBook::new(&config.advice_overrides);
        Self {
            config,
            source,
            advice,
            view: ViewState::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn selected_advice(&self) -> Option<&AdviceEntry> {
        self.view
            .selected_row()
            .map(|row| self.advice.advice_for(row.volume.media))
    }

    /// Periodic re-enumeration. Selection is kept by mount point so the
    /// highlighted volume survives device order changes.
    pub fn tick(&mut self) {
        let selected_mount = self
            .view
            .selected_row()
            .map(|row| row.volume.mount_point.clone());

        let volumes = self.source.list();
        tracing::debug!(count = volumes.len(), "enumerated volumes");
        self.view.rows = volumes
            .into_iter()
            .map(|volume| VolumeRow {
                volume,
                error: None,
            })
            .collect();
        self.view.selected = selected_mount.and_then(|mount| {
            self.view
                .rows
                .iter()
                .position(|row| row.volume.mount_point == mount)
        });
        self.view.summary = self.source.host();
    }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Select(index) => self.select(index),
            UiEvent::SelectNext => {
                let next = match self.view.selected {
                    Some(i) => i.saturating_add(1),
                    None => 0,
                };
                if next < self.view.rows.len() {
                    self.select(next);
                }
            }
            UiEvent::SelectPrev => {
                if let Some(i) = self.view.selected {
                    if i > 0 {
                        self.select(i - 1);
                    }
                }
            }
            UiEvent::Refresh => self.tick(),
            UiEvent::ToggleOverview => {
                self.view.show_overview = !self.view.show_overview;
            }
            // Export is a view-layer concern (file dialog + encoder).
            UiEvent::SaveChart => {}
        }
    }

    /// Select a row and take a fresh one-shot reading of it. A per-volume
    /// failure lands inline on that row; the rest of the list is untouched.
    fn select(&mut self, index: usize) {
        let Some(row) = self.view.rows.get_mut(index) else {
            return;
        };
        self.view.selected = Some(index);
        match self.source.refresh(&row.volume.mount_point) {
            Ok(volume) => {
                row.volume = volume;
                row.error = None;
            }
            Err(e) => {
                tracing::warn!(mount = %row.volume.mount_point, error = %e, "volume refresh failed");
                row.error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HostSummary, MediaType, Volume};
    use crate::monitor::QueryError;
    use std::collections::HashSet;

    fn volume(mount: &str, media: MediaType) -> Volume {
        Volume {
            name: format!("dev-{}", mount.trim_start_matches('/')),
            mount_point: mount.to_string(),
            total_bytes: 100,
            used_bytes: 30,
            available_bytes: 70,
            file_system: "ext4".into(),
            media,
            figures_consistent: true,
        }
    }

    struct FakeSource {
        volumes: Vec<Volume>,
        denied: HashSet<String>,
    }

    impl FakeSource {
        fn new(volumes: Vec<Volume>) -> Self {
            Self {
                volumes,
                denied: HashSet::new(),
            }
        }
    }

    impl VolumeSource for FakeSource {
        fn list(&mut self) -> Vec<Volume> {
            self.volumes.clone()
        }

        fn refresh(&mut self, mount_point: &str) -> Result<Volume, QueryError> {
            if self.denied.contains(mount_point) {
                return Err(QueryError::AccessDenied(mount_point.to_string()));
            }
            self.volumes
                .iter()
                .find(|v| v.mount_point == mount_point)
                .cloned()
                .ok_or_else(|| QueryError::Gone(mount_point.to_string()))
        }

        fn host(&mut self) -> HostSummary {
            HostSummary {
                os: "TestOS 1.0".into(),
                uptime_secs: 3600,
            }
        }
    }

    fn app_with(volumes: Vec<Volume>) -> App<FakeSource> {
        let mut app = App::new(Config::default(), FakeSource::new(volumes));
        app.tick();
        app
    }

    #[test]
    fn empty_machine_lists_nothing() {
        let app = app_with(vec![]);
        assert!(app.view().rows.is_empty());
        assert!(app.view().selected.is_none());
        assert!(app.selected_advice().is_none());
    }

    #[test]
    fn selecting_a_volume_sets_state_and_advice() {
        let mut app = app_with(vec![
            volume("/", MediaType::Ssd),
            volume("/data", MediaType::Hdd),
        ]);
        app.handle(UiEvent::Select(1));
        assert_eq!(app.view().selected, Some(1));
        assert!(app.view().selected_row().unwrap().error.is_none());
        assert_eq!(
            app.selected_advice().unwrap().title,
            "Caring for HDD drives"
        );
    }

    #[test]
    fn access_denied_shows_inline_and_leaves_others_selectable() {
        let mut app = app_with(vec![
            volume("/", MediaType::Ssd),
            volume("/secure", MediaType::Hdd),
        ]);
        app.source.denied.insert("/secure".to_string());

        app.handle(UiEvent::Select(1));
        assert_eq!(app.view().selected, Some(1));
        let err = app.view().selected_row().unwrap().error.as_deref();
        assert!(err.unwrap().contains("access denied"));

        app.handle(UiEvent::Select(0));
        assert_eq!(app.view().selected, Some(0));
        assert!(app.view().selected_row().unwrap().error.is_none());
    }

    #[test]
    fn arrow_selection_clamps_at_list_edges() {
        let mut app = app_with(vec![
            volume("/", MediaType::Ssd),
            volume("/data", MediaType::Hdd),
        ]);
        app.handle(UiEvent::SelectPrev);
        assert_eq!(app.view().selected, None);
        app.handle(UiEvent::SelectNext);
        assert_eq!(app.view().selected, Some(0));
        app.handle(UiEvent::SelectNext);
        app.handle(UiEvent::SelectNext);
        assert_eq!(app.view().selected, Some(1));
    }

    #[test]
    fn tick_keeps_selection_by_mount_point() {
        let mut app = app_with(vec![
            volume("/", MediaType::Ssd),
            volume("/data", MediaType::Hdd),
        ]);
        app.handle(UiEvent::Select(1));
        // Device order flips on re-enumeration.
        app.source.volumes.reverse();
        app.tick();
        assert_eq!(app.view().selected, Some(0));
        assert_eq!(app.view().selected_row().unwrap().volume.mount_point, "/data");
    }

    #[test]
    fn tick_drops_selection_when_volume_unmounts() {
        let mut app = app_with(vec![volume("/usb", MediaType::Removable)]);
        app.handle(UiEvent::Select(0));
        app.source.volumes.clear();
        app.tick();
        assert!(app.view().rows.is_empty());
        assert!(app.view().selected.is_none());
    }

    #[test]
    fn overview_toggles() {
        let mut app = app_with(vec![]);
        assert!(!app.view().show_overview);
        app.handle(UiEvent::ToggleOverview);
        assert!(app.view().show_overview);
        app.handle(UiEvent::ToggleOverview);
        assert!(!app.view().show_overview);
    }
}
