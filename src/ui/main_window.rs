//! The single application window. Paints the volume list, the selected
//! volume's figures, the embedded chart and the advice text into a
//! softbuffer surface, and translates raw window input into `UiEvent`s.

use crate::advice::AdviceEntry;
use crate::chart::{self, ChartFrame};
use crate::human;
use crate::model::{UiEvent, ViewState};
use crate::theme;
use anyhow::{anyhow, Context as _};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use std::num::NonZeroU32;
use tao::dpi::LogicalSize;
use tao::event::{ElementState, MouseButton, WindowEvent};
use tao::event_loop::EventLoopWindowTarget;
use tao::keyboard::KeyCode;
use tao::window::{Window, WindowBuilder};

const LIST_WIDTH: u32 = 300;
const LIST_TOP: u32 = 56;
const ROW_HEIGHT: u32 = 56;
const STATUS_HEIGHT: u32 = 28;
const PANE_GAP: u32 = 16;

pub struct MainWindow {
    window: Option<Box<Window>>,
    context: Option<softbuffer::Context<&'static Window>>,
    surface: Option<softbuffer::Surface<&'static Window, &'static Window>>,
    cursor: (f64, f64),
    row_count: usize,
}

impl MainWindow {
    pub fn new() -> Self {
        Self {
            window: None,
            context: None,
            surface: None,
            cursor: (0.0, 0.0),
            row_count: 0,
        }
    }

    /// Window and surface creation is the one fatal failure path of the
    /// application; errors propagate up to `main` instead of panicking.
    pub fn create(&mut self, event_loop: &EventLoopWindowTarget<()>) -> anyhow::Result<()> {
        let mut builder = WindowBuilder::new()
            .with_title("Drive Advisor")
            .with_inner_size(LogicalSize::new(1000.0, 660.0))
            .with_min_inner_size(LogicalSize::new(780.0, 540.0));

        // The icon is cosmetic; missing or undecodable files are ignored.
        match load_window_icon() {
            Ok(icon) => builder = builder.with_window_icon(Some(icon)),
            Err(e) => tracing::debug!(error = %e, "no window icon"),
        }

        let window = Box::new(
            builder
                .build(event_loop)
                .context("creating the main window")?,
        );

        let window_ref: &'static Window = unsafe { &*(window.as_ref() as *const Window) };

        let context = softbuffer::Context::new(window_ref)
            .map_err(|e| anyhow!("creating softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window_ref)
            .map_err(|e| anyhow!("creating softbuffer surface: {e}"))?;

        self.window = Some(window);
        self.context = Some(unsafe { std::mem::transmute(context) });
        self.surface = Some(unsafe { std::mem::transmute(surface) });
        Ok(())
    }

    pub fn window_id(&self) -> Option<tao::window::WindowId> {
        self.window.as_ref().map(|w| w.id())
    }

    pub fn request_redraw(&self) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    /// Raw window input in, `UiEvent` messages out. This is the only place
    /// that knows about the GUI toolkit's event types.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<UiEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
                None
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.hit_test(),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed =>
            {
                match event.physical_key {
                    KeyCode::ArrowUp => Some(UiEvent::SelectPrev),
                    KeyCode::ArrowDown => Some(UiEvent::SelectNext),
                    KeyCode::KeyR => Some(UiEvent::Refresh),
                    KeyCode::KeyO => Some(UiEvent::ToggleOverview),
                    KeyCode::KeyS => Some(UiEvent::SaveChart),
                    _ => None,
                }
            }
            WindowEvent::Resized(_) => {
                self.request_redraw();
                None
            }
            _ => None,
        }
    }

    fn hit_test(&self) -> Option<UiEvent> {
        let (x, y) = self.cursor;
        if x < 8.0 || x > (8 + LIST_WIDTH) as f64 || y < LIST_TOP as f64 {
            return None;
        }
        let index = ((y - LIST_TOP as f64) / ROW_HEIGHT as f64) as usize;
        if index < self.row_count {
            Some(UiEvent::Select(index))
        } else {
            None
        }
    }

    pub fn render(&mut self, view: &ViewState, advice: Option<&AdviceEntry>) {
        let window = match &self.window {
            Some(w) => w,
            None => return,
        };

        let phys = window.inner_size();
        let (width, height) = (phys.width, phys.height);
        if width == 0 || height == 0 {
            return;
        }

        let surface = match &mut self.surface {
            Some(s) => s,
            None => return,
        };
        let (Some(nw), Some(nh)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        let _ = surface.resize(nw, nh);

        self.row_count = view.rows.len();

        let pane_x = 8 + LIST_WIDTH + PANE_GAP;
        let pane_w = width.saturating_sub(pane_x + PANE_GAP);
        let pane_h = height.saturating_sub(LIST_TOP + STATUS_HEIGHT + PANE_GAP);

        // The chart is rendered headlessly first, then blitted into the
        // frame once the UI backend has been dropped.
        let chart_frame = chart_for(view, pane_w, pane_h);

        let (w, h) = (width as usize, height as usize);
        let mut pixel_buf = vec![0u8; w * h * 3];
        {
            let backend = BitMapBackend::with_buffer(&mut pixel_buf, (width, height));
            let root = backend.into_drawing_area();
            let _ = root.fill(&theme::BACKGROUND);

            draw_header(&root);
            draw_volume_list(&root, view, height);
            if !view.show_overview {
                draw_detail_pane(&root, view, advice, pane_x, pane_w, &chart_frame);
            }
            draw_status_bar(&root, view, width, height);

            let _ = root.present();
        }

        if let Some(frame) = &chart_frame {
            let (x0, y0) = chart_origin(view, pane_x, pane_w);
            blit(&mut pixel_buf, width, height, frame, x0, y0);
        }

        let Ok(mut buf) = surface.buffer_mut() else {
            return;
        };
        for i in 0..w * h {
            let r = pixel_buf[i * 3] as u32;
            let g = pixel_buf[i * 3 + 1] as u32;
            let b = pixel_buf[i * 3 + 2] as u32;
            buf[i] = (255 << 24) | (r << 16) | (g << 8) | b;
        }
        let _ = buf.present();
    }
}

/// Chart for the current view: the overview bars fill the whole right
/// pane, the per-volume pie sits below the figures.
fn chart_for(view: &ViewState, pane_w: u32, pane_h: u32) -> Option<ChartFrame> {
    if pane_w < 80 || pane_h < 80 {
        return None;
    }
    if view.show_overview {
        let volumes: Vec<_> = view.rows.iter().map(|r| r.volume.clone()).collect();
        return Some(chart::usage_bars(&volumes, pane_w, pane_h));
    }
    let row = view.selected_row()?;
    let side = pane_w.min(pane_h.saturating_sub(150)).clamp(80, 300);
    Some(chart::usage_pie(
        row.volume.used_bytes,
        row.volume.available_bytes,
        side,
        side,
    ))
}

fn chart_origin(view: &ViewState, pane_x: u32, _pane_w: u32) -> (u32, u32) {
    if view.show_overview {
        (pane_x, LIST_TOP)
    } else {
        (pane_x, LIST_TOP + 150)
    }
}

type Root<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn draw_header(root: &Root) {
    let _ = root.draw(&Text::new(
        "Drive Advisor",
        (16, 14),
        ("sans-serif", 22).into_font().color(&theme::TEXT),
    ));
    let _ = root.draw(&Text::new(
        "click or \u{2191}/\u{2193} select    R refresh    O overview    S save chart",
        (180, 22),
        ("sans-serif", 12).into_font().color(&theme::TEXT_SECONDARY),
    ));
}

fn draw_volume_list(root: &Root, view: &ViewState, height: u32) {
    let list_bottom = height.saturating_sub(STATUS_HEIGHT + 8);
    let visible = ((list_bottom.saturating_sub(LIST_TOP)) / ROW_HEIGHT) as usize;

    if view.rows.is_empty() {
        let _ = root.draw(&Text::new(
            "No volumes detected",
            (20, LIST_TOP as i32 + 12),
            ("sans-serif", 14).into_font().color(&theme::TEXT_SECONDARY),
        ));
        return;
    }

    for (i, row) in view.rows.iter().take(visible).enumerate() {
        let y0 = (LIST_TOP + i as u32 * ROW_HEIGHT) as i32;
        let bg = if view.selected == Some(i) {
            theme::CARD_ALT
        } else {
            theme::CARD
        };
        let _ = root.draw(&Rectangle::new(
            [(8, y0), ((8 + LIST_WIDTH) as i32, y0 + ROW_HEIGHT as i32 - 4)],
            bg.filled(),
        ));

        let vol = &row.volume;
        let _ = root.draw(&Text::new(
            vol.mount_point.clone(),
            (20, y0 + 8),
            ("sans-serif", 15).into_font().color(&theme::TEXT),
        ));
        let _ = root.draw(&Text::new(
            format!("{} | {}", vol.media, vol.file_system),
            (20, y0 + 30),
            ("sans-serif", 12).into_font().color(&theme::TEXT_SECONDARY),
        ));

        let (pct_text, pct_color) = if row.error.is_some() {
            ("!".to_string(), theme::DANGER)
        } else if vol.total_bytes == 0 {
            ("--".to_string(), theme::TEXT_SECONDARY)
        } else {
            (
                format!("{:.0}%", vol.fill_percent()),
                theme::fill_color(vol.fill_status()),
            )
        };
        let _ = root.draw(&Text::new(
            pct_text,
            ((8 + LIST_WIDTH) as i32 - 52, y0 + 12),
            ("sans-serif", 17).into_font().color(&pct_color),
        ));
    }
}

fn draw_detail_pane(
    root: &Root,
    view: &ViewState,
    advice: Option<&AdviceEntry>,
    pane_x: u32,
    pane_w: u32,
    chart_frame: &Option<ChartFrame>,
) {
    let x = pane_x as i32;
    let Some(row) = view.selected_row() else {
        let _ = root.draw(&Text::new(
            "Select a volume to see details and advice",
            (x, LIST_TOP as i32 + 12),
            ("sans-serif", 15).into_font().color(&theme::TEXT_SECONDARY),
        ));
        return;
    };

    let vol = &row.volume;
    let _ = root.draw(&Text::new(
        format!("{}  ({})", vol.mount_point, vol.media),
        (x, LIST_TOP as i32),
        ("sans-serif", 19).into_font().color(&theme::TEXT),
    ));

    let mut y = LIST_TOP as i32 + 30;
    if let Some(err) = &row.error {
        let _ = root.draw(&Text::new(
            format!("error: {}", err),
            (x, y),
            ("sans-serif", 14).into_font().color(&theme::DANGER),
        ));
        y += 22;
    }

    let figures = [
        format!("Total   {}", human::format_bytes(vol.total_bytes)),
        format!("Used    {}", human::format_bytes(vol.used_bytes)),
        format!("Free    {}", human::format_bytes(vol.available_bytes)),
        format!("Device  {}", vol.name),
    ];
    for line in figures {
        let _ = root.draw(&Text::new(
            line,
            (x, y),
            ("sans-serif", 14).into_font().color(&theme::TEXT),
        ));
        y += 20;
    }

    if vol.figures_consistent {
        let _ = root.draw(&Text::new(
            vol.fill_status().label().to_string(),
            (x, y),
            ("sans-serif", 14)
                .into_font()
                .color(&theme::fill_color(vol.fill_status())),
        ));
    } else {
        let _ = root.draw(&Text::new(
            "reported figures are inconsistent or unavailable",
            (x, y),
            ("sans-serif", 14).into_font().color(&theme::WARNING),
        ));
    }

    // Advice column, right of the pie chart.
    let chart_w = chart_frame.as_ref().map(|f| f.width).unwrap_or(0);
    let advice_x = x + chart_w as i32 + 20;
    let advice_cols = ((pane_w.saturating_sub(chart_w + 20)) / 8).max(20) as usize;
    if let Some(entry) = advice {
        let mut ay = LIST_TOP as i32 + 150;
        let _ = root.draw(&Text::new(
            entry.title.clone(),
            (advice_x, ay),
            ("sans-serif", 16).into_font().color(&theme::SECONDARY),
        ));
        ay += 26;
        for item in &entry.items {
            for (j, line) in wrap_text(item, advice_cols).into_iter().enumerate() {
                let prefix = if j == 0 { "\u{2022} " } else { "  " };
                let _ = root.draw(&Text::new(
                    format!("{}{}", prefix, line),
                    (advice_x, ay),
                    ("sans-serif", 13).into_font().color(&theme::TEXT),
                ));
                ay += 18;
            }
            ay += 4;
        }
    }
}

fn draw_status_bar(root: &Root, view: &ViewState, width: u32, height: u32) {
    let y0 = (height - STATUS_HEIGHT) as i32;
    let _ = root.draw(&Rectangle::new(
        [(0, y0), (width as i32, height as i32)],
        theme::CARD.filled(),
    ));
    let status = format!(
        "{}   |   {} volumes   |   average fill {:.0}%   |   up {}",
        view.summary.os,
        view.rows.len(),
        view.average_fill_percent(),
        human::format_uptime(view.summary.uptime_secs),
    );
    let _ = root.draw(&Text::new(
        status,
        (16, y0 + 7),
        ("sans-serif", 12).into_font().color(&theme::TEXT_SECONDARY),
    ));
}

/// Copy a rendered chart frame into the window's RGB buffer.
fn blit(dst: &mut [u8], dst_w: u32, dst_h: u32, frame: &ChartFrame, x0: u32, y0: u32) {
    for row in 0..frame.height {
        let dy = y0 + row;
        if dy >= dst_h {
            break;
        }
        let copy_w = frame.width.min(dst_w.saturating_sub(x0)) as usize;
        if copy_w == 0 {
            break;
        }
        let src_start = (row * frame.width * 3) as usize;
        let dst_start = ((dy * dst_w + x0) * 3) as usize;
        dst[dst_start..dst_start + copy_w * 3]
            .copy_from_slice(&frame.pixels[src_start..src_start + copy_w * 3]);
    }
}

/// Greedy word wrap; long words get their own line.
pub fn wrap_text(text: &str, max_cols: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_cols {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Optional cosmetic icon next to the executable.
fn load_window_icon() -> anyhow::Result<tao::window::Icon> {
    let exe = std::env::current_exe().context("locating executable")?;
    let path = exe
        .parent()
        .map(|d| d.join("drive-advisor.png"))
        .context("executable has no parent directory")?;

    let decoder = png::Decoder::new(std::fs::File::open(&path)?);
    let mut reader = decoder.read_info().context("reading PNG header")?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).context("decoding PNG frame")?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        other => return Err(anyhow!("unsupported icon color type {:?}", other)),
    };
    tao::window::Icon::from_rgba(rgba, info.width, info.height)
        .map_err(|e| anyhow!("building icon: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_column_limit() {
        let lines = wrap_text("keep ten to fifteen percent of the capacity free", 16);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 16));
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text("short", 40), vec!["short".to_string()]);
    }

    #[test]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 40), vec![String::new()]);
    }

    #[test]
    fn blit_clips_at_frame_edges() {
        let frame = ChartFrame {
            width: 4,
            height: 4,
            pixels: vec![200u8; 4 * 4 * 3],
        };
        let mut dst = vec![0u8; 6 * 6 * 3];
        // Origin near the corner: only a 2x2 region fits.
        blit(&mut dst, 6, 6, &frame, 4, 4);
        assert_eq!(dst[(4 * 6 + 4) * 3], 200);
        assert_eq!(dst[(5 * 6 + 5) * 3 + 2], 200);
        // Nothing outside the destination was touched.
        assert_eq!(dst[(3 * 6 + 4) * 3], 0);
    }
}
