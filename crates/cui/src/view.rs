use crate::app::App;
use forcedeck_core::{Face, Stage};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Style, Stylize};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

const CARD_WIDTH: u16 = 15;
const CARD_HEIGHT: u16 = 11;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(CARD_HEIGHT + 2),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let table = if app.show_log {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(root[1]);
        draw_log(frame, cols[1], app);
        cols[0]
    } else {
        root[1]
    };
    draw_table(frame, table, app.stage());
    app.retry_button = None;
    if app.stage().retry_visible {
        app.retry_button = Some(draw_retry(frame, table, app));
    }
    draw_indicator(frame, root[2], app.stage());

    if app.show_help {
        draw_help_popup(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        "forcedeck".bold(),
        format!("  {}", app.phase_label()).dark_gray(),
        format!("  {}", app.locale.text("? help", "? ajuda")).dark_gray(),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_table(frame: &mut Frame, area: Rect, stage: &Stage) {
    let card_area = centered_fixed(CARD_WIDTH, CARD_HEIGHT, area);
    if !stage.card_visible {
        let outline = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(outline, card_area);
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::White));
    let inner_height = usize::from(CARD_HEIGHT.saturating_sub(2));
    let inner_width = usize::from(CARD_WIDTH.saturating_sub(2));
    let lines = match stage.face {
        Face::Back => (0..inner_height)
            .map(|_| Line::from("▚".repeat(inner_width)).fg(Color::Blue))
            .collect::<Vec<_>>(),
        Face::Card(card) => {
            let color = if card.suit.is_red() {
                Color::Red
            } else {
                Color::White
            };
            let pretty = card.pretty();
            let mut lines = vec![Line::from(pretty.clone()).fg(color)];
            let middle = inner_height / 2;
            for row in 1..inner_height.saturating_sub(1) {
                if row == middle {
                    lines.push(
                        Line::from(card.suit.symbol().to_string())
                            .alignment(Alignment::Center)
                            .fg(color)
                            .bold(),
                    );
                } else {
                    lines.push(Line::from(""));
                }
            }
            lines.push(Line::from(pretty).alignment(Alignment::Right).fg(color));
            lines
        }
    };
    frame.render_widget(Paragraph::new(lines).block(block), card_area);
}

fn draw_retry(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let label = format!(" {} ", app.retry_label());
    let button = retry_button_area(area, &label);
    frame.render_widget(Clear, button);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray));
    frame.render_widget(
        Paragraph::new(label)
            .alignment(Alignment::Center)
            .block(block),
        button,
    );
    button
}

fn retry_button_area(area: Rect, label: &str) -> Rect {
    let width = u16::try_from(label.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    centered_fixed(width, 3, area)
}

// Dim and tucked into the corner; meant to be easy to miss.
fn draw_indicator(frame: &mut Frame, area: Rect, stage: &Stage) {
    if !stage.indicator_visible {
        return;
    }
    let text = Paragraph::new(stage.indicator_text.as_str())
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

fn draw_log(frame: &mut Frame, area: Rect, app: &App) {
    let visible = usize::from(area.height.saturating_sub(2));
    let skip = app.event_log.len().saturating_sub(visible);
    let items: Vec<ListItem<'_>> = app
        .event_log
        .iter()
        .skip(skip)
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Log", "Registro"));
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_help_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text(
            "space tap | enter tap or retry | r retry",
            "espaço toque | enter toque ou repetir | r repetir",
        )),
        Line::from(app.locale.text(
            "arrows swipe | mouse drag swipe | click tap",
            "setas deslizar | arrastar deslizar | clique toque",
        )),
        Line::from(app.locale.text(
            "l log | ctrl-r reset | ? help | q quit",
            "l registro | ctrl-r reiniciar | ? ajuda | q sair",
        )),
        Line::from(format!(
            "{}: {} | {}: {} | {}",
            app.locale.text("Preset", "Modo"),
            app.preset.name(),
            app.locale.text("Seed", "Semente"),
            app.trick.seed(),
            app.locale.code()
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Help", "Ajuda"));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
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

    #[test]
    fn centered_fixed_clamps_to_area() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(centered_fixed(15, 11, area), Rect::new(0, 0, 10, 5));
        assert_eq!(centered_fixed(4, 3, area), Rect::new(3, 1, 4, 3));
    }

    #[test]
    fn retry_button_sits_in_the_middle() {
        let area = Rect::new(0, 1, 80, 20);
        assert_eq!(
            retry_button_area(area, " Try again "),
            Rect::new(33, 9, 13, 3)
        );
    }
}
