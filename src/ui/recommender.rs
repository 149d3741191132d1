use crate::api::Source;
use crate::app::App;
use crate::catalog;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthChar;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    // Layout: title(1) + picker + action(3) + cards(min)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(catalog::OPTION_COUNT as u16 + 2),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let title = Paragraph::new(" Recommender").style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, chunks[0]);

    render_picker(app, frame, chunks[1]);
    render_action(app, frame, chunks[2]);

    // ── Result cards, side by side ──
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[3]);
    for (source, column) in Source::ALL.into_iter().zip(columns.iter()) {
        render_card(app.recommender.results.get(source), source, frame, *column);
    }
}

fn render_picker(app: &App, frame: &mut Frame, area: Rect) {
    let view = &app.recommender;
    let items: Vec<ListItem> = (0..catalog::OPTION_COUNT)
        .map(|i| {
            let value = catalog::option_value(i).unwrap_or_default();
            let label = if i == 0 { catalog::PLACEHOLDER_OPTION } else { value };
            let chosen = value == view.item_id;
            let marker = if chosen { "(•) " } else { "( ) " };
            let style = if i == 0 {
                Style::default().fg(Color::DarkGray)
            } else if chosen {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(label, style),
            ]))
        })
        .collect();

    let picker = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Select an Item ID: "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(view.cursor));
    frame.render_stateful_widget(picker, area, &mut state);
}

fn render_action(app: &App, frame: &mut Frame, area: Rect) {
    let view = &app.recommender;

    let (button_style, hint) = if view.can_recommend() {
        (
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            if view.is_loading() { "  fetching…" } else { "" },
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            "  select an item to enable",
        )
    };

    let line = Line::from(vec![
        Span::styled(" [r] Get Recommendations ", button_style),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
    ]);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    if let Some(error) = &view.last_error {
        block = block.title_bottom(
            Line::from(format!(" Last request failed: {error} ")).style(Style::default().fg(Color::Red)),
        );
    } else if let Some(at) = view.updated_at {
        block = block.title_bottom(
            Line::from(format!(" Updated {} ", at.format("%H:%M:%S"))).alignment(Alignment::Right),
        );
    }

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_card(items: &[String], source: Source, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", source.title()));

    if items.is_empty() {
        let empty = Paragraph::new("No recommendations yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = (area.width as usize).saturating_sub(7);
    let rows: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(truncate_str(item, width)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(rows).block(block), area);
}

/// Truncate `s` to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::route::Route;
    use crate::ui::tests::draw;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("abc", 5), "abc");
        assert_eq!(truncate_str("abcdef", 4), "abc…");
        assert_eq!(truncate_str("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn test_empty_cards_show_placeholder() {
        let app = App::new(Route::Recommender);
        let screen = draw(&app, 150, 40);
        assert_eq!(screen.matches("No recommendations yet.").count(), 3);
        assert!(screen.contains("Collaborative Filtering"));
        assert!(screen.contains("Content-Based Filtering"));
        assert!(screen.contains("Azure ML Model"));
    }

    #[test]
    fn test_action_hint_tracks_selection() {
        let mut app = App::new(Route::Recommender);
        assert!(draw(&app, 150, 40).contains("select an item to enable"));

        app.recommender.select(catalog::VALID_ITEM_IDS[3]);
        assert!(!draw(&app, 150, 40).contains("select an item to enable"));
    }

    #[test]
    fn test_picker_lists_every_id() {
        let app = App::new(Route::Recommender);
        let screen = draw(&app, 150, 40);
        assert!(screen.contains(catalog::PLACEHOLDER_OPTION));
        for id in catalog::VALID_ITEM_IDS {
            assert!(screen.contains(id), "missing {id}");
        }
    }

    #[test]
    fn test_results_render_in_their_cards() {
        let mut app = App::new(Route::Recommender);
        app.recommender.results.collaborative = vec!["item-a".to_string()];
        app.recommender.results.content = vec!["item-b".to_string(), "item-c".to_string()];

        let screen = draw(&app, 150, 40);

        assert!(screen.contains("1. item-a"));
        assert!(screen.contains("2. item-c"));
        assert_eq!(screen.matches("No recommendations yet.").count(), 1);
    }

    #[test]
    fn test_failure_notice() {
        let mut app = App::new(Route::Recommender);
        app.recommender.last_error = Some("Could not reach the server".to_string());
        assert!(draw(&app, 150, 40).contains("Last request failed"));
    }
}
