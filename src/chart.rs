//! Headless chart rendering. Everything here draws into plain RGB buffers
//! through plotters; the window layer blits the result, and tests inspect
//! the pixels directly.

use crate::human;
use crate::model::Volume;
use crate::theme;
use anyhow::Context;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use std::path::Path;

/// RGB, row-major, 3 bytes per pixel.
pub struct ChartFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Used-vs-free pie for one volume. A zero-byte total renders a labelled
/// placeholder instead of dividing by zero.
pub fn usage_pie(used: u64, free: u64, width: u32, height: u32) -> ChartFrame {
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        let _ = root.fill(&theme::CARD);

        let center = ((width / 2) as i32, (height / 2) as i32);
        let radius = f64::from(width.min(height)) * 0.36;
        let total = used.saturating_add(free);

        if total == 0 {
            let _ = root.draw(&Circle::new(center, radius as i32, theme::SURFACE));
            let _ = root.draw(&Text::new(
                "no usage data",
                (center.0 - 52, center.1 - 8),
                ("sans-serif", 16).into_font().color(&theme::TEXT_SECONDARY),
            ));
        } else {
            let sizes = vec![used as f64, free as f64];
            let colors = vec![theme::PRIMARY, theme::SUCCESS];
            let labels = vec![
                format!("Used {}", human::format_bytes(used)),
                format!("Free {}", human::format_bytes(free)),
            ];
            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(-90.0);
            pie.label_style(("sans-serif", 15).into_font().color(&theme::TEXT));
            let _ = root.draw(&pie);
        }
        let _ = root.present();
    }
    ChartFrame {
        width,
        height,
        pixels,
    }
}

/// Fill percentage of every volume as a bar chart, bar colour stepped by
/// fill status. An empty volume list renders a placeholder.
pub fn usage_bars(volumes: &[Volume], width: u32, height: u32) -> ChartFrame {
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        let _ = root.fill(&theme::CARD);

        if volumes.is_empty() {
            let _ = root.draw(&Text::new(
                "no volumes detected",
                ((width / 2) as i32 - 70, (height / 2) as i32 - 8),
                ("sans-serif", 16).into_font().color(&theme::TEXT_SECONDARY),
            ));
        } else {
            draw_bars(&root, volumes);
        }
        let _ = root.present();
    }
    ChartFrame {
        width,
        height,
        pixels,
    }
}

fn draw_bars(area: &DrawingArea<BitMapBackend, plotters::coord::Shift>, volumes: &[Volume]) {
    let mut chart = ChartBuilder::on(area)
        .caption(
            "Disk space usage",
            ("sans-serif", 17).into_font().color(&theme::TEXT),
        )
        .margin(8)
        .x_label_area_size(24)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..volumes.len() as f32, 0f32..110f32)
        .unwrap();

    let _ = chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(theme::SURFACE.mix(0.3))
        .bold_line_style(theme::SURFACE.mix(0.6))
        .y_labels(5)
        .y_label_formatter(&|v| format!("{:.0}%", v))
        .x_labels(volumes.len())
        .x_label_formatter(&|v| {
            volumes
                .get(*v as usize)
                .map(|vol| vol.mount_point.clone())
                .unwrap_or_default()
        })
        .label_style(
            ("sans-serif", 11)
                .into_font()
                .color(&theme::TEXT_SECONDARY),
        )
        .draw();

    for (i, vol) in volumes.iter().enumerate() {
        let pct = vol.fill_percent();
        let color = theme::fill_color(vol.fill_status());
        let x0 = i as f32 + 0.2;
        let x1 = i as f32 + 0.8;
        let _ = chart.draw_series(std::iter::once(Rectangle::new(
            [(x0, 0.0), (x1, pct)],
            color.filled(),
        )));
        let _ = chart.draw_series(std::iter::once(Text::new(
            format!("{:.1}%", pct),
            (x0, pct + 6.0),
            ("sans-serif", 12).into_font().color(&theme::TEXT),
        )));
    }
}

/// Write a rendered frame out as a PNG file.
pub fn encode_png(frame: &ChartFrame, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().context("writing PNG header")?;
    writer
        .write_image_data(&frame.pixels)
        .context("writing PNG image data")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaType;
    use plotters::style::RGBColor;

    fn count_color(frame: &ChartFrame, color: RGBColor) -> usize {
        frame
            .pixels
            .chunks_exact(3)
            .filter(|px| px[0] == color.0 && px[1] == color.1 && px[2] == color.2)
            .count()
    }

    fn volume(mount: &str, total: u64, used: u64) -> Volume {
        Volume {
            name: mount.to_string(),
            mount_point: mount.to_string(),
            total_bytes: total,
            used_bytes: used,
            available_bytes: total.saturating_sub(used),
            file_system: "ext4".into(),
            media: MediaType::Ssd,
            figures_consistent: total > 0,
        }
    }

    #[test]
    fn pie_proportion_matches_input() {
        let frame = usage_pie(30, 70, 240, 240);
        let used_px = count_color(&frame, theme::PRIMARY);
        let free_px = count_color(&frame, theme::SUCCESS);
        assert!(used_px > 0 && free_px > 0);
        let ratio = used_px as f64 / (used_px + free_px) as f64;
        assert!(
            (ratio - 0.30).abs() < 0.05,
            "used slice ratio {} not near 0.30",
            ratio
        );
    }

    #[test]
    fn pie_zero_total_renders_placeholder() {
        let frame = usage_pie(0, 0, 200, 160);
        assert_eq!(frame.pixels.len(), 200 * 160 * 3);
        assert_eq!(count_color(&frame, theme::PRIMARY), 0);
        assert_eq!(count_color(&frame, theme::SUCCESS), 0);
    }

    #[test]
    fn bars_empty_list_renders_placeholder() {
        let frame = usage_bars(&[], 320, 200);
        assert_eq!(frame.pixels.len(), 320 * 200 * 3);
        assert_eq!(count_color(&frame, theme::SUCCESS), 0);
        assert_eq!(count_color(&frame, theme::DANGER), 0);
    }

    #[test]
    fn bars_color_follows_fill_status() {
        let vols = vec![volume("/", 100, 50), volume("/full", 100, 95)];
        let frame = usage_bars(&vols, 400, 300);
        assert!(count_color(&frame, theme::SUCCESS) > 0);
        assert!(count_color(&frame, theme::DANGER) > 0);
    }

    #[test]
    fn png_round_trips_to_disk() {
        let frame = usage_pie(40, 60, 64, 64);
        let path = std::env::temp_dir().join("drive-advisor-chart-test.png");
        encode_png(&frame, &path).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
        let _ = std::fs::remove_file(&path);
    }
}
