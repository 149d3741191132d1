use crate::app::App;
use crate::route::Route;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let active = app.route.nav_index();

    let mut spans = vec![
        Span::styled(
            format!(" {} ", Route::BRAND.label),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
    ];

    for (i, link) in Route::NAV_LINKS.iter().enumerate() {
        let style = if active == Some(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!(" {} ", link.label), style));
        spans.push(Span::raw(" "));
    }

    let nav = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(nav, area);
}
