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
            "404 - Page Not Found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("Oops! The page you are looking for does not exist."),
    ];

    let page = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::uniform(1)));
    frame.render_widget(page, area);
}
