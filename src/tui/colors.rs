//! Color palette for the browser UI
use ratatui::style::Color;

/// Errors, failed thumbnails
pub const ACCENT_PRIMARY: Color = Color::Rgb(229, 83, 83);
/// Navigation buttons, ready markers
pub const ACCENT_SECONDARY: Color = Color::Rgb(98, 195, 132);
/// Titles and the selected file name
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(97, 175, 239);

pub const TEXT_PRIMARY: Color = Color::Rgb(220, 223, 228);
pub const TEXT_SECONDARY: Color = Color::Rgb(128, 134, 145);
pub const TEXT_DISABLED: Color = Color::Rgb(75, 80, 90);

pub const BORDER_COLOR: Color = Color::Rgb(70, 76, 88);
pub const BG_DARK: Color = Color::Rgb(24, 26, 31);
pub const SELECTED_BG: Color = Color::Rgb(44, 50, 64);
