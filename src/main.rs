#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod advice;
mod app;
mod chart;
mod config;
mod human;
mod model;
mod monitor;
mod theme;
mod ui;

use app::App;
use config::Config;
use model::UiEvent;
use monitor::DiskQuery;
use std::time::{Duration, Instant};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use ui::main_window::MainWindow;

fn main() {
    // Level is runtime-selectable so problems can be diagnosed without a
    // rebuild; unknown values fall back to INFO.
    let log_level = std::env::var("DRIVE_ADVISOR_LOG")
        .ok()
        .and_then(|v| v.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        tracing::error!(error = %e, "startup failed");
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Drive Advisor failed to start")
            .set_description(format!("{e:#}"))
            .show();
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let event_loop = EventLoopBuilder::<()>::with_user_event().build();

    let config = Config::load();
    let mut app = App::new(config, DiskQuery::new());
    app.tick();
    tracing::info!(volumes = app.view().rows.len(), "drive-advisor starting");

    let mut window = MainWindow::new();
    window.create(&event_loop)?;
    window.request_redraw();

    let poll_interval = Duration::from_secs(app.config().refresh_interval_secs.max(1));
    let mut last_tick = Instant::now();

    event_loop.run(move |event, _event_loop, control_flow| {
        let now = Instant::now();
        if now.duration_since(last_tick) >= poll_interval {
            app.tick();
            window.request_redraw();
            last_tick = now;
        }
        *control_flow = ControlFlow::WaitUntil(last_tick + poll_interval);

        match event {
            Event::WindowEvent {
                event, window_id, ..
            } if Some(window_id) == window.window_id() => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                other => {
                    if let Some(ui_event) = window.handle_event(&other) {
                        match ui_event {
                            UiEvent::SaveChart => save_chart(&app),
                            ui_event => {
                                app.handle(ui_event);
                                window.request_redraw();
                            }
                        }
                    }
                }
            },
            Event::RedrawRequested(id) if Some(id) == window.window_id() => {
                window.render(app.view(), app.selected_advice());
            }
            _ => {}
        }
    });
}

/// Re-render the current chart at export size and write it where the user
/// picks. Cancelling the dialog is not an error.
fn save_chart(app: &App<DiskQuery>) {
    let view = app.view();
    let export = &app.config().chart_export;

    let frame = match view.selected_row() {
        Some(row) if !view.show_overview => {
            let side = export.width.min(export.height);
            chart::usage_pie(row.volume.used_bytes, row.volume.available_bytes, side, side)
        }
        _ => {
            let volumes: Vec<_> = view.rows.iter().map(|r| r.volume.clone()).collect();
            chart::usage_bars(&volumes, export.width, export.height)
        }
    };

    let Some(path) = rfd::FileDialog::new()
        .add_filter("PNG image", &["png"])
        .set_file_name("drive-usage.png")
        .save_file()
    else {
        tracing::debug!("chart export cancelled");
        return;
    };

    match chart::encode_png(&frame, &path) {
        Ok(()) => tracing::info!(path = %path.display(), "chart saved"),
        Err(e) => {
            tracing::error!(error = %e, "chart export failed");
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Could not save chart")
                .set_description(format!("{e:#}"))
                .show();
        }
    }
}
