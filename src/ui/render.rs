//! Drawing the visible prompt

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::keybindings::{buttons_text, footer_text};
use super::screen::{PromptKind, PromptState, Screen};

pub(crate) fn draw(frame: &mut Frame, screen: &Screen) {
    if let Some(prompt) = screen.visible() {
        draw_prompt(frame, prompt);
    }
}

fn draw_prompt(frame: &mut Frame, prompt: &PromptState) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);

    let (title, step, total_steps) = match &prompt.kind {
        PromptKind::Pick { view, .. } => (&view.title, view.step, view.total_steps),
        PromptKind::Input { view, .. } => (&view.title, view.step, view.total_steps),
    };
    let border = if prompt.enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" {title} ({step}/{total_steps}) "))
        .borders(Borders::ALL)
        .border_style(border);

    let mut lines = match &prompt.kind {
        PromptKind::Pick { view, highlighted } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    view.placeholder.as_str(),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(""),
            ];
            for (index, item) in view.items.iter().enumerate() {
                if index == *highlighted {
                    lines.push(Line::from(Span::styled(
                        format!("> {item}"),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )));
                } else {
                    lines.push(Line::from(format!("  {item}")));
                }
            }
            lines
        }
        PromptKind::Input { view, value } => {
            let entry = if value.is_empty() {
                Span::styled(
                    view.placeholder.clone().unwrap_or_default(),
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::raw(value.as_str())
            };
            vec![
                Line::from(view.prompt.as_str()),
                Line::from(""),
                Line::from(vec![Span::styled("> ", Style::default().fg(Color::Yellow)), entry]),
            ]
        }
    };

    if let Some(buttons) = buttons_text(prompt.kind.buttons()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(buttons, Style::default().fg(Color::Cyan))));
    }
    if let Some(message) = &prompt.message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        )));
    }
    if prompt.busy {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Working...",
            Style::default().fg(Color::Yellow),
        )));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);
    frame.render_widget(
        Paragraph::new(footer_text(prompt.kind.context(), prompt.kind.back_button()))
            .style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{InputBoxView, QuickPickView};
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(screen: &Screen) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, screen)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(70, 60, outer);
        assert_eq!(inner.width, 70);
        assert_eq!(inner.height, 30);
        assert_eq!(inner.x, 15);
    }

    #[test]
    fn test_draws_pick_with_step_and_highlight() {
        let mut screen = Screen::default();
        let id = screen.register(PromptKind::pick(QuickPickView {
            title: "Provide container metadata".to_string(),
            step: 2,
            total_steps: 5,
            placeholder: "Choose architecture".to_string(),
            items: vec!["x64".to_string(), "x86".to_string()],
            active_item: Some("x86".to_string()),
            back_button: true,
            buttons: vec!["Refresh".to_string()],
        }));
        screen.show(id);

        let text = rendered(&screen);
        assert!(text.contains("Provide container metadata (2/5)"));
        assert!(text.contains("Choose architecture"));
        assert!(text.contains("> x86"));
        assert!(text.contains("F1 Refresh"));
        assert!(text.contains("Esc Back"));
    }

    #[test]
    fn test_draws_input_message_and_busy() {
        let mut screen = Screen::default();
        let id = screen.register(PromptKind::input(InputBoxView {
            title: "Provide container metadata".to_string(),
            step: 3,
            total_steps: 5,
            value: String::new(),
            prompt: "Provide a base container image URI".to_string(),
            placeholder: Some("e.g., mcr.microsoft.com/dotnet/aspnet:7.0".to_string()),
            back_button: true,
            buttons: Vec::new(),
        }));
        screen.show(id);
        {
            let prompt = screen.prompt_mut(id).unwrap();
            prompt.message = Some("Must not be empty".to_string());
            prompt.busy = true;
        }

        let text = rendered(&screen);
        assert!(text.contains("Provide a base container image URI"));
        assert!(text.contains("e.g., mcr.microsoft.com/dotnet/aspnet:7.0"));
        assert!(text.contains("Must not be empty"));
        assert!(text.contains("Working..."));
    }

    #[test]
    fn test_nothing_visible_draws_nothing() {
        let text = rendered(&Screen::default());
        assert!(text.trim().is_empty());
    }
}
