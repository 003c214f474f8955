//! Dark palette shared by the chart renderer and the window painter.

use plotters::style::RGBColor;

pub const BACKGROUND: RGBColor = RGBColor(15, 23, 42);
pub const CARD: RGBColor = RGBColor(30, 41, 59);
pub const CARD_ALT: RGBColor = RGBColor(41, 52, 71);
pub const SURFACE: RGBColor = RGBColor(51, 65, 85);
pub const TEXT: RGBColor = RGBColor(248, 250, 252);
pub const TEXT_SECONDARY: RGBColor = RGBColor(148, 163, 184);
pub const PRIMARY: RGBColor = RGBColor(79, 70, 229);
pub const SECONDARY: RGBColor = RGBColor(59, 130, 246);
pub const SUCCESS: RGBColor = RGBColor(16, 185, 129);
pub const WARNING: RGBColor = RGBColor(245, 158, 11);
pub const DANGER: RGBColor = RGBColor(239, 68, 68);

use crate::model::FillStatus;

pub fn fill_color(status: FillStatus) -> RGBColor {
    match status {
        FillStatus::Critical => DANGER,
        FillStatus::Warning => WARNING,
        FillStatus::Ok | FillStatus::Plenty => SUCCESS,
    }
}
