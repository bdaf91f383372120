// TUI module for rendering the browser: navigation bar, thumbnail list, scaled preview
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::{centered_rect, directory_label, format_file_size, scroll_offset};
pub use input::{handle_help_input, handle_key_event, handle_mouse_event, Action};

use crate::domain::{AppState, ImageSlot};
use crate::preview::{build_preview_lines, folder_icon, render_halfblocks, PreviewCache, PreviewKey};
use helpers::rect_contains;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Terminal columns used by a list thumbnail
pub const THUMB_COLS: u16 = 8;
/// Terminal rows used by a list thumbnail (two pixels per row)
pub const THUMB_ROWS: u16 = 4;
/// Pixel box thumbnails are scaled into
pub const THUMB_BOX: (u32, u32) = (THUMB_COLS as u32, THUMB_ROWS as u32 * 2);
/// Rows taken by one cell of the thumbnail list
const CELL_HEIGHT: u16 = THUMB_ROWS;

/// UI view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Main browsing view
    Browsing,
    /// Help overlay visible
    Help,
}

/// Screen regions of one frame, kept so mouse clicks can be mapped back to widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserLayout {
    pub bar: Rect,
    pub previous_button: Rect,
    pub label: Rect,
    pub next_button: Rect,
    pub list: Rect,
    pub list_inner: Rect,
    pub preview: Rect,
    pub preview_inner: Rect,
    pub footer: Rect,
}

impl BrowserLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Navigation bar
                Constraint::Min(0),    // Thumbnails and preview
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let bar = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(14),
                Constraint::Min(0),
                Constraint::Length(10),
            ])
            .split(rows[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(rows[1]);

        Self {
            bar: rows[0],
            previous_button: bar[0],
            label: bar[1],
            next_button: bar[2],
            list: body[0],
            list_inner: bordered_inner(body[0]),
            preview: body[2],
            preview_inner: bordered_inner(body[2]),
            footer: rows[2],
        }
    }

    /// True when the list is large enough to draw at least one whole cell
    pub fn list_drawable(&self) -> bool {
        self.list_inner.width > 0 && self.list_inner.height >= CELL_HEIGHT
    }

    /// Number of whole cells that fit in the thumbnail list
    pub fn visible_cells(&self) -> usize {
        (self.list_inner.height / CELL_HEIGHT).max(1) as usize
    }

    /// First list cell drawn; cell 0 is the directory, cell `i + 1` is image `i`
    pub fn list_offset(&self, state: &AppState) -> usize {
        scroll_offset(state.current_index + 1, self.visible_cells(), state.len() + 1)
    }

    /// Maps a click position to the action of the widget under it
    pub fn hit_test(&self, column: u16, row: u16, state: &AppState) -> Action {
        if rect_contains(self.previous_button, column, row) {
            return Action::Previous;
        }
        if rect_contains(self.next_button, column, row) {
            return Action::Next;
        }
        if !self.list_drawable() || !rect_contains(self.list_inner, column, row) {
            return Action::None;
        }

        let cell = self.list_offset(state) + ((row - self.list_inner.y) / CELL_HEIGHT) as usize;
        match cell {
            0 => Action::None,
            n if n <= state.len() => Action::Select(n - 1),
            _ => Action::None,
        }
    }
}

fn bordered_inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Renders the browser and returns the layout it used
pub fn render(
    frame: &mut Frame,
    state: &AppState,
    cache: &mut PreviewCache,
    stretch: bool,
) -> BrowserLayout {
    let layout = BrowserLayout::new(frame.area());

    frame.render_widget(Block::default().style(Style::default().bg(BG_DARK)), frame.area());

    render_bar(frame, &layout, state);
    render_thumbnail_list(frame, &layout, state);
    render_preview(frame, &layout, state, cache, stretch);
    render_footer(frame, &layout, state);

    layout
}

fn button(label: &str, enabled: bool) -> Paragraph<'_> {
    let color = if enabled { ACCENT_SECONDARY } else { TEXT_DISABLED };
    Paragraph::new(Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color)),
    )
}

/// Renders the navigation bar: Previous, file name, Next
fn render_bar(frame: &mut Frame, layout: &BrowserLayout, state: &AppState) {
    let has_previous = state.current_index > 0;
    let has_next = state.current_index + 1 < state.len();

    frame.render_widget(button("◀ Previous", has_previous), layout.previous_button);
    frame.render_widget(button("Next ▶", has_next), layout.next_button);

    let label = match state.current_file() {
        Some(file) => Line::from(vec![
            Span::styled(
                file.name.clone(),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}/{}", state.current_index + 1, state.len()),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
        None => Line::from(Span::styled(
            "No images",
            Style::default().fg(TEXT_SECONDARY),
        )),
    };

    let paragraph = Paragraph::new(label).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );

    frame.render_widget(paragraph, layout.label);
}

/// Renders the directory cell followed by one thumbnail cell per image
fn render_thumbnail_list(frame: &mut Frame, layout: &BrowserLayout, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(Span::styled(
            " Images ",
            Style::default().fg(ACCENT_HIGHLIGHT),
        ));
    frame.render_widget(block, layout.list);

    if !layout.list_drawable() {
        return;
    }
    let inner = layout.list_inner;

    let offset = layout.list_offset(state);
    let total = state.len() + 1;
    let end = (offset + layout.visible_cells()).min(total);

    for (slot_row, cell) in (offset..end).enumerate() {
        let area = Rect {
            x: inner.x,
            y: inner.y + slot_row as u16 * CELL_HEIGHT,
            width: inner.width,
            height: CELL_HEIGHT,
        };

        if cell == 0 {
            render_directory_cell(frame, area, state);
        } else {
            render_image_cell(frame, area, state, cell - 1);
        }
    }
}

fn cell_areas(area: Rect) -> (Rect, Rect) {
    let thumb_width = THUMB_COLS.min(area.width);
    let thumb = Rect {
        width: thumb_width,
        ..area
    };
    let text = Rect {
        x: area.x + thumb_width + 1,
        width: area.width.saturating_sub(thumb_width + 1),
        ..area
    };
    (thumb, text)
}

fn render_directory_cell(frame: &mut Frame, area: Rect, state: &AppState) {
    let (thumb, text) = cell_areas(area);

    let icon = folder_icon(THUMB_BOX.0, THUMB_BOX.1);
    frame.render_widget(Paragraph::new(render_halfblocks(&icon)), thumb);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            directory_label(&state.directory),
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} images", state.len()),
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), text);
}

fn render_image_cell(frame: &mut Frame, area: Rect, state: &AppState, index: usize) {
    let selected = index == state.current_index;
    if selected {
        frame.render_widget(Block::default().style(Style::default().bg(SELECTED_BG)), area);
    }

    let (thumb, text) = cell_areas(area);
    let Some(file) = state.files.get(index) else {
        return;
    };

    let status = match state.slot(index) {
        Some(ImageSlot::Ready(loaded)) => {
            frame.render_widget(Paragraph::new(render_halfblocks(&loaded.thumbnail)), thumb);
            Span::styled(
                format!("{}×{}", loaded.width, loaded.height),
                Style::default().fg(TEXT_SECONDARY),
            )
        }
        Some(ImageSlot::Failed(_)) => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled("   ✗", Style::default().fg(ACCENT_PRIMARY))),
                ]),
                thumb,
            );
            Span::styled("failed", Style::default().fg(ACCENT_PRIMARY))
        }
        Some(ImageSlot::Loading) | None => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled("  ···", Style::default().fg(TEXT_DISABLED))),
                ]),
                thumb,
            );
            Span::styled("loading", Style::default().fg(TEXT_DISABLED))
        }
    };

    let name_style = if selected {
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_PRIMARY)
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(file.name.clone(), name_style)),
        Line::from(status),
    ];
    frame.render_widget(Paragraph::new(lines), text);
}

/// Renders the current image scaled into the preview pane
fn render_preview(
    frame: &mut Frame,
    layout: &BrowserLayout,
    state: &AppState,
    cache: &mut PreviewCache,
    stretch: bool,
) {
    let (Some(file), Some(slot)) = (state.current_file(), state.current_slot()) else {
        frame.render_widget(render_empty_state_widget(), layout.preview);
        return;
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(format!(" {} ", file.name));

    let inner = layout.preview_inner;

    match slot {
        ImageSlot::Ready(loaded) => {
            block = block.title_bottom(Line::from(Span::styled(
                format!(
                    " {}×{} · {} ",
                    loaded.width,
                    loaded.height,
                    format_file_size(file.size)
                ),
                Style::default().fg(TEXT_SECONDARY),
            )));
            frame.render_widget(block, layout.preview);

            let key = PreviewKey {
                index: state.current_index,
                cols: inner.width,
                rows: inner.height,
                stretch,
            };
            let image_lines = cache.get_or_insert_with(key, || {
                build_preview_lines(&loaded.image, inner.width, inner.height, stretch)
            });

            // Center vertically; each line is centered horizontally by the paragraph
            let padding = (inner.height as usize).saturating_sub(image_lines.len()) / 2;
            let mut lines = vec![Line::from(""); padding];
            lines.extend_from_slice(image_lines);

            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        }
        ImageSlot::Loading => {
            frame.render_widget(block, layout.preview);

            let spinners = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis();
            let spinner = spinners[(now / 100) as usize % spinners.len()];

            let padding = (inner.height / 2).saturating_sub(1) as usize;
            let mut lines = vec![Line::from(""); padding];
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", spinner), Style::default().fg(ACCENT_HIGHLIGHT)),
                Span::styled("Loading ", Style::default().fg(TEXT_PRIMARY)),
                Span::styled(
                    file.name.clone(),
                    Style::default()
                        .fg(TEXT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));

            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        }
        ImageSlot::Failed(message) => {
            let block = block.border_style(Style::default().fg(ACCENT_PRIMARY));
            let error_lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  [!] Could not load image",
                    Style::default()
                        .fg(ACCENT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("  {}", message)),
                Line::from(""),
                Line::from(format!("  Path: {}", file.path.display())),
                Line::from(format!("  Size: {}", format_file_size(file.size))),
            ];

            let paragraph = Paragraph::new(error_lines)
                .block(block)
                .style(Style::default().fg(TEXT_PRIMARY))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, layout.preview);
        }
    }
}

/// Creates an empty state widget for when the directory holds no images
fn render_empty_state_widget() -> Paragraph<'static> {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No Images Found",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This directory has no .jpg, .jpeg, .png or .gif files.",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(" Preview "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
}

/// Renders key hints and load progress
fn render_footer(frame: &mut Frame, layout: &BrowserLayout, state: &AppState) {
    let mut spans = vec![
        Span::styled(" ←/→ ", Style::default().fg(ACCENT_SECONDARY)),
        Span::styled("Navigate", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled(
            format!("Loaded {}/{}", state.loaded_count(), state.len()),
            Style::default().fg(TEXT_SECONDARY),
        ),
    ];

    let failed = state.failed_count();
    if failed > 0 {
        spans.push(Span::styled(
            format!("  ({} failed)", failed),
            Style::default().fg(ACCENT_PRIMARY),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        layout.footer,
    );
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(50, 70, frame.area());

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<16}", keys), Style::default().fg(ACCENT_SECONDARY)),
            Span::styled(what, Style::default().fg(TEXT_PRIMARY)),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        entry("← ↑ h k p", "Previous image"),
        entry("→ ↓ l j n Space", "Next image"),
        entry("Home / g", "First image"),
        entry("End / G", "Last image"),
        entry("?", "Toggle help"),
        entry("q / Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Mouse: click a thumbnail or the Previous/Next buttons,",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "scroll to step through images.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}
