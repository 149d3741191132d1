use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Padding, Paragraph, Wrap},
};

pub fn render(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled(
            "Welcome to the Recommender App",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled(
            "This is the homepage. Use the navigation bar to explore different pages.",
            Style::default().fg(Color::Gray),
        ),
    ];

    let page = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(page, area);
}
