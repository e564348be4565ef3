use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use profilecard_core::{LoadState, User};

use crate::app::{App, AppState};

use super::styles;

/// Size of the profile card
const CARD_WIDTH: u16 = 60;
const CARD_HEIGHT: u16 = 9;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_card(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  Profile Card";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_card(frame: &mut Frame, app: &App, area: Rect) {
    let card_area = centered_rect_fixed(CARD_WIDTH, CARD_HEIGHT, area);

    let lines = match &app.load_state {
        LoadState::Loading => loading_lines(app),
        LoadState::Failed(message) => failed_lines(message),
        LoadState::Ready(user) => ready_lines(user, app.can_refresh()),
    };

    let block = Block::default()
        .title(Span::styled(" User ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(!app.load_state.is_loading()));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, card_area);
}

fn loading_lines(app: &App) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled(app.spinner_frame(), styles::spinner_style()),
            Span::styled(" Loading...", styles::muted_style()),
        ])
        .alignment(Alignment::Center),
    ]
}

fn failed_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" Error: {}", message),
            styles::error_style(),
        )),
        Line::from(""),
        Line::from(""),
        refresh_hint(true),
    ]
}

fn ready_lines(user: &User, can_refresh: bool) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Name:  ", styles::label_style()),
            Span::styled(user.full_name(), styles::value_style()),
        ]),
        Line::from(vec![
            Span::styled(" Email: ", styles::label_style()),
            Span::styled(user.email().to_string(), styles::value_style()),
        ]),
        Line::from(""),
        Line::from(""),
        refresh_hint(can_refresh),
    ]
}

fn refresh_hint(enabled: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled("[r]", styles::action_style(enabled)),
        Span::styled(" Refresh", styles::muted_style()),
    ])
    .alignment(Alignment::Center)
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(
            " Updated {} ",
            app.cache_age.as_deref().unwrap_or("never")
        ),
    };
    let right_text = " [r]efresh | [q]uit ".to_string();

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(40, 12, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!(" Profile Card v{}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  r         ", styles::action_style(app.can_refresh())),
            Span::styled("Fetch a new user", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ?         ", styles::help_key_style()),
            Span::styled("Toggle help", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
