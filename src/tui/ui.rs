//! UI rendering for the disturbed board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use glitch_engine::{CosmeticFlag, CrypticMessage, Player, Position};

use super::app::{App, CellView};

const BOARD_WIDTH: u16 = 40;
const BOARD_HEIGHT: u16 = 11;
const SHAKE: [(i16, i16); 4] = [(-1, 0), (1, 1), (0, -1), (1, 0)];
const CORRUPT_GLYPHS: [&str; 4] = ["Ø", "▒", "◌", "0"];

/// Colours for the current tier.
#[derive(Debug, Clone, Copy)]
struct Palette {
    accent: Color,
    grid: Color,
    background: Color,
}

impl Palette {
    fn for_app(app: &App) -> Self {
        if app.has(CosmeticFlag::Disturbed3) {
            Palette {
                accent: Color::Rgb(140, 0, 0),
                grid: Color::Rgb(60, 0, 0),
                background: Color::Black,
            }
        } else if app.has(CosmeticFlag::Disturbed2) {
            Palette {
                accent: Color::Red,
                grid: Color::Rgb(110, 40, 40),
                background: Color::Reset,
            }
        } else if app.has(CosmeticFlag::Disturbed1) {
            Palette {
                accent: Color::LightRed,
                grid: Color::Gray,
                background: Color::Reset,
            }
        } else {
            Palette {
                accent: Color::Cyan,
                grid: Color::DarkGray,
                background: Color::Reset,
            }
        }
    }
}

/// Draws one frame and records where the cells landed.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let palette = Palette::for_app(app);

    if app.has(CosmeticFlag::FlashGlitch) {
        frame.render_widget(Block::default().style(Style::default().bg(Color::White)), area);
    } else {
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.background)),
            area,
        );
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title
            Constraint::Min(BOARD_HEIGHT + 2), // Board
            Constraint::Length(3),             // Status
            Constraint::Length(1),             // Help and ambient
        ])
        .split(area);

    let title = Paragraph::new(title_text(app))
        .style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let areas = draw_board(frame, chunks[1], app, palette);
    app.set_cell_areas(areas);

    let status = Paragraph::new(app.status().to_string())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.grid)),
        );
    frame.render_widget(status, chunks[2]);

    frame.render_widget(footer(app), chunks[3]);

    for message in app.messages() {
        draw_message(frame, area, message);
    }
}

fn title_text(app: &App) -> &'static str {
    if app.has(CosmeticFlag::GlitchFlicker) && app.frame() % 17 == 0 {
        "T1c T4c T0e"
    } else {
        "Tic Tac Toe"
    }
}

fn footer(app: &App) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        "1-9 / arrows+Enter / click: play   r: reset   q: quit",
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(cue) = app.ambient() {
        let text = if app.audio_failed() {
            format!("   ♪ {} (unavailable)", cue.sound)
        } else {
            format!("   ♪ {} {:.0}%", cue.sound, cue.volume * 100.0)
        };
        spans.push(Span::styled(text, Style::default().fg(Color::Red)));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App, palette: Palette) -> [Rect; 9] {
    let mut board_area = center_rect(area, BOARD_WIDTH, BOARD_HEIGHT);
    if app.has(CosmeticFlag::ShakeBoard) {
        let (dx, dy) = SHAKE[(app.frame() % SHAKE.len() as u64) as usize];
        board_area.x = board_area.x.saturating_add_signed(dx);
        board_area.y = board_area.y.saturating_add_signed(dy);
        board_area = board_area.intersection(area);
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    let mut areas = [Rect::default(); 9];
    for (row, row_area) in [rows[0], rows[2], rows[4]].into_iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
            ])
            .split(row_area);

        for (col, cell_area) in [cols[0], cols[2], cols[4]].into_iter().enumerate() {
            let Some(pos) = Position::from_row_col(row, col) else {
                continue;
            };
            draw_cell(frame, cell_area, app, pos, palette);
            areas[pos.to_index()] = cell_area;
        }
        draw_separator_vertical(frame, cols[1], palette);
        draw_separator_vertical(frame, cols[3], palette);
    }
    draw_separator(frame, rows[1], palette);
    draw_separator(frame, rows[3], palette);

    areas
}

fn draw_cell(frame: &mut Frame, area: Rect, app: &App, pos: Position, palette: Palette) {
    let cell = app.cell(pos);
    let mut style = mark_style(cell, palette);

    if app.has(CosmeticFlag::GlitchFlicker) && (app.frame() + pos.to_index() as u64) % 13 == 0 {
        style = style.add_modifier(Modifier::DIM);
    }
    if app.cursor_visible() && pos == app.selection() {
        style = style.bg(Color::White).fg(Color::Black);
    }

    let glyph = mark_glyph(cell, app.frame());
    let line = if app.has(CosmeticFlag::GlitchRgb) && cell.mark.is_some() {
        Line::from(vec![
            Span::styled(" ", Style::default().bg(Color::Red)),
            Span::styled(glyph, style),
            Span::styled(" ", Style::default().bg(Color::Cyan)),
        ])
    } else {
        Line::from(Span::styled(format!(" {glyph} "), style))
    };

    let paragraph = Paragraph::new(vec![Line::default(), line]).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn mark_style(cell: CellView, palette: Palette) -> Style {
    match cell.mark {
        None => Style::default().fg(palette.grid),
        Some(Player::X) => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        Some(Player::O) if cell.corrupted => Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::CROSSED_OUT | Modifier::RAPID_BLINK),
        Some(Player::O) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

fn mark_glyph(cell: CellView, frame: u64) -> &'static str {
    match cell.mark {
        None => " ",
        Some(_) if cell.corrupted => CORRUPT_GLYPHS[((frame / 3) % CORRUPT_GLYPHS.len() as u64) as usize],
        Some(Player::X) => "X",
        Some(Player::O) => "O",
    }
}

fn draw_message(frame: &mut Frame, area: Rect, message: &CrypticMessage) {
    let text = if message.scale >= 2.0 {
        message.text.to_uppercase()
    } else {
        message.text.to_string()
    };
    let width = (text.chars().count() as u16).min(area.width);
    let x = area.x + ((area.width as f64 * message.left_pct / 100.0) as u16).min(area.width - width);
    let y = area.y + ((area.height as f64 * message.top_pct / 100.0) as u16).min(area.height.saturating_sub(1));
    let target = Rect::new(x, y, width, 1).intersection(area);

    let mut style = Style::default().fg(Color::Rgb(message.red, 0, 0));
    if message.scale >= 1.75 {
        style = style.add_modifier(Modifier::BOLD);
    }
    if message.alpha < 0.75 {
        style = style.add_modifier(Modifier::DIM);
    }

    frame.render_widget(Clear, target);
    frame.render_widget(Paragraph::new(text).style(style), target);
}

fn draw_separator(frame: &mut Frame, area: Rect, palette: Palette) {
    let sep = Paragraph::new("─".repeat(area.width as usize)).style(Style::default().fg(palette.grid));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect, palette: Palette) {
    let sep = Paragraph::new(vec![Line::from("│"); area.height as usize])
        .style(Style::default().fg(palette.grid));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AmbientPlayer;
    use glitch_engine::{DisturbanceLevel, Engine, GameRng, Timings};
    use ratatui::{Terminal, backend::TestBackend};

    fn engine() -> Engine<App> {
        let app = App::new(AmbientPlayer::new(std::env::temp_dir().join("glitch_tictactoe_no_assets")));
        Engine::new(app, GameRng::new(1), Timings::default())
    }

    fn render(engine: &mut Engine<App>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f, engine.presenter_mut())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draw_records_cell_areas() {
        let mut e = engine();
        render(&mut e);
        let areas = e.presenter().cell_areas();
        assert!(areas.iter().all(|a| a.width == 12 && a.height == 3));
        assert!(areas[0].x < areas[1].x && areas[1].x < areas[2].x);
        assert!(areas[0].y < areas[3].y && areas[3].y < areas[6].y);
    }

    #[test]
    fn test_status_and_marks_are_drawn() {
        let mut e = engine();
        e.click(0);
        let screen = render(&mut e);
        assert!(screen.contains("It's O's turn."));
        assert!(screen.contains(" X "));
    }

    #[test]
    fn test_ambient_indicator_appears_from_level_three() {
        let mut e = engine();
        e.restore_disturbance(DisturbanceLevel::new(3));
        let screen = render(&mut e);
        assert!(screen.contains("♪ static (unavailable)"));
    }

    #[test]
    fn test_message_is_drawn() {
        let mut e = engine();
        e.restore_disturbance(DisturbanceLevel::new(1));
        let screen = render(&mut e).to_lowercase();
        let text = e.presenter().messages().next().map(|m| m.text.to_lowercase()).unwrap();
        assert!(screen.contains(&text));
    }
}
