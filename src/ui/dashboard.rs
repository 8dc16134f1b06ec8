use crate::ui::app::ReviewApp;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table,
    },
    Frame,
};

const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C);
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0);
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68);
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C);
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65);

const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const CHANGED_COLOR: Color = BRAND_GREEN;
const UNMATCHED_COLOR: Color = BRAND_ORANGE;

pub fn draw_review(frame: &mut Frame, app: &ReviewApp) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Materials | Options
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let changed = app.approved_map().len();
    let title = format!(
        " Material Review | {} materials | {} replaced ",
        app.materials.len(),
        changed
    );
    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let main = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    draw_materials(frame, main[0], app);
    draw_options(frame, main[1], app);

    draw_footer(
        frame,
        chunks[2],
        " ↑↓ Material | ←→ Replacement | Enter Review changes | q Quit ",
    );
}

fn draw_materials(frame: &mut Frame, area: Rect, app: &ReviewApp) {
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll_offset = if app.selected >= visible_rows {
        app.selected - visible_rows + 1
    } else {
        0
    };

    let header = Row::new(vec!["Original", "Replacement", "Matches"])
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = app
        .materials
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, m)| {
            let chosen = app.chosen_name(i);
            let style = if i == app.selected {
                SELECTED_STYLE
            } else if m.suggestions.is_empty() {
                Style::default().fg(UNMATCHED_COLOR)
            } else if chosen != m.original {
                Style::default().fg(CHANGED_COLOR)
            } else {
                Style::default()
            };
            Row::new(vec![
                m.original.clone(),
                chosen.to_string(),
                m.suggestions.len().to_string(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(42),
        Constraint::Percentage(42),
        Constraint::Percentage(16),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Materials ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BRAND_ORANGE)),
    );
    frame.render_widget(table, area);

    if app.materials.len() > visible_rows {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(app.materials.len()).position(app.selected);

        let scrollbar_area = Rect {
            x: area.x + area.width - 1,
            y: area.y + 2,
            width: 1,
            height: area.height.saturating_sub(3),
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

fn draw_options(frame: &mut Frame, area: Rect, app: &ReviewApp) {
    let choice = app.choices.get(app.selected).copied().unwrap_or(0);

    let items: Vec<ListItem> = (0..app.option_count(app.selected))
        .map(|option| {
            let is_chosen = option == choice;
            let style = if is_chosen {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            let marker = if is_chosen { " ◄" } else { "" };
            let label = if option == 0 {
                format!("keep \"{}\"", app.option_label(app.selected, 0))
            } else {
                app.option_label(app.selected, option).to_string()
            };

            ListItem::new(Line::from(vec![
                Span::styled(label, style),
                Span::styled(marker, Style::default().fg(BRAND_ORANGE)),
            ]))
        })
        .collect();

    let title = app
        .selected_material()
        .map_or_else(|| " Options ".to_string(), |m| format!(" {} ", m.original));
    let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));

    frame.render_widget(list, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str) {
    let footer = Paragraph::new(help)
        .style(Style::default().fg(BRAND_MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

pub fn draw_summary(frame: &mut Frame, app: &ReviewApp) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(6),    // Approved replacements
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let mut approved: Vec<(String, String)> = app.approved_map().into_iter().collect();
    approved.sort();

    let header = Paragraph::new(format!(" Apply {} replacements? ", approved.len()))
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let rows: Vec<Row> = approved
        .into_iter()
        .map(|(original, replacement)| Row::new(vec![original, replacement]))
        .collect();
    let widths = [Constraint::Percentage(50), Constraint::Percentage(50)];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Original", "Replacement"]).style(HEADER_STYLE))
        .block(Block::default().title(" Changes ").borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);

    draw_footer(frame, chunks[2], " Enter Apply | Esc Back | q Quit without changes ");
}
