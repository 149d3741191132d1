mod help;
mod home;
mod nav;
mod not_found;
mod recommender;

use crate::app::{App, InputMode};
use crate::route::Route;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

/// Top-level render: navigation bar, the routed page, then the status line.
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    nav::render(app, frame, chunks[0]);

    match &app.route {
        Route::Home => home::render(frame, chunks[1]),
        Route::Recommender => recommender::render(app, frame, chunks[1]),
        Route::NotFound(_) => not_found::render(frame, chunks[1]),
    }

    render_status(app, frame, chunks[2]);

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

fn key_hint(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_status(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) {
    if app.input_mode == InputMode::Editing {
        let label = " Go to: ";
        let prompt = Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Yellow)),
            Span::raw(app.path_input.as_str()),
        ]);
        frame.render_widget(Paragraph::new(prompt), area);
        let typed = u16::try_from(app.path_input.width()).unwrap_or(u16::MAX);
        let cursor_x = area.x.saturating_add(label.width() as u16).saturating_add(typed);
        frame.set_cursor_position((cursor_x, area.y));
        return;
    }

    let mut spans = vec![key_hint(" Tab"), Span::raw(" Page  ")];
    if app.route == Route::Recommender {
        spans.extend([
            key_hint("↑↓"),
            Span::raw(" Choose  "),
            key_hint("Enter"),
            Span::raw(" Select  "),
            key_hint("r"),
            Span::raw(" Recommend  "),
        ]);
    }
    spans.extend([
        key_hint(":"),
        Span::raw(" Go to  "),
        key_hint("?"),
        Span::raw(" Help  "),
        key_hint("q"),
        Span::raw(" Quit  "),
        Span::styled(app.status_msg.as_str(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    /// Draw `app` on a fresh test terminal and return the screen as text.
    pub(crate) fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_routes_render_their_pages() {
        let screen = draw(&App::new(Route::Home), 100, 30);
        assert!(screen.contains("Welcome to the Recommender App"));

        let screen = draw(&App::new(Route::Recommender), 120, 40);
        assert!(screen.contains("Select an Item ID"));

        let screen = draw(&App::new(Route::parse("/missing")), 100, 30);
        assert!(screen.contains("404 - Page Not Found"));
    }

    #[test]
    fn test_nav_bar_on_every_page() {
        for route in [Route::Home, Route::Recommender, Route::parse("/x")] {
            let screen = draw(&App::new(route), 120, 40);
            let first_lines: String = screen.lines().take(3).collect();
            assert!(first_lines.contains("Home"));
            assert!(first_lines.contains("Recommender"));
        }
    }

    #[test]
    fn test_path_prompt_in_status_line() {
        let mut app = App::new(Route::Home);
        app.start_path_prompt();
        app.path_input = "/somewhere".to_string();
        let screen = draw(&app, 100, 30);
        assert!(screen.lines().last().unwrap().contains("Go to: /somewhere"));
    }

    #[test]
    fn test_path_prompt_cursor_follows_display_width() {
        let mut app = App::new(Route::Home);
        app.start_path_prompt();
        app.path_input = "/café日".to_string();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();

        // " Go to: " is 8 columns, "/café日" is 7.
        assert_eq!((cursor.x, cursor.y), (15, 29));
    }

    #[test]
    fn test_path_prompt_very_long_input() {
        let mut app = App::new(Route::Home);
        app.start_path_prompt();
        app.path_input = "/".repeat(70_000);
        let screen = draw(&app, 100, 30);
        assert!(screen.lines().last().unwrap().contains("Go to: //"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = App::new(Route::Home);
        app.show_help = true;
        let screen = draw(&app, 100, 40);
        assert!(screen.contains("Keybindings"));
    }
}
