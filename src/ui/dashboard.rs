// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// ┌──────────────── header (titre, dernière mise à jour) ───────────────────┐
// │ Recent Launches        │  [All Tokens | Watchlist]                       │
// │                        │                                                 │
// │ Leaderboards           │  table des tokens                               │
// │ [Top ROI|Volume|Creat] │                                                 │
// └──────────────── footer (raccourcis / confirmation) ─────────────────────┘
//
// CONCEPTS RATATUI :
// 1. Layout imbriqués : vertical puis horizontal
// 2. Table + TableState : sélection d'une ligne
// 3. Tabs : onglets avec highlight
// ============================================================================

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState, Tabs},
    Frame,
};

use crate::app::{App, LeaderboardTab, Screen, TokenTab};
use crate::models::Token;
use crate::ui::details;
use crate::ui::format::{
    change_color, format_change, format_currency, format_number, format_price, format_time_ago,
};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le dashboard est toujours dessiné
/// - La popup de détails vient par-dessus (overlay)
pub fn render(frame: &mut Frame, app: &App) {
    render_dashboard(frame, app);

    match app.current_screen {
        Screen::Dashboard => {}
        Screen::Details => {
            let area = frame.size();
            details::render_details(frame, app, area);
        }
    }
}

/// Dessine le dashboard (feed, leaderboards, liste de tokens)
fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);

    render_launch_feed(frame, app, sidebar[0]);
    render_leaderboards(frame, app, sidebar[1]);
    render_token_panel(frame, app, columns[1]);

    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Launchboard ")
        .title_alignment(Alignment::Center);

    let text = Line::from(vec![
        Span::styled(
            "Simulated token launches",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  ·  "),
        Span::styled(
            format!("Last updated: {} UTC", app.last_updated.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  ·  "),
        Span::styled(
            format!("tick #{}  ·  {} tokens", app.tick_count, app.store.len()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Sidebar : Recent Launches
// ============================================================================

/// Feed des derniers lancements (plus récent en premier)
fn render_launch_feed(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Recent Launches ");

    let now = Utc::now();
    let items: Vec<ListItem> = app
        .store
        .recent_launches()
        .into_iter()
        .take(app.feed_size)
        .map(|token| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("${:<6}", token.ticker),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" @{:<18}", token.creator_handle),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(format_time_ago(token.launch_time, now)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Sidebar : Leaderboards
// ============================================================================

fn render_leaderboards(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Leaderboards ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let tabs = Tabs::new(vec!["Top ROI", "Volume", "Creators"])
        .select(app.leaderboard_tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let items: Vec<ListItem> = match app.leaderboard_tab {
        LeaderboardTab::TopReturn => app
            .store
            .top_by_return()
            .into_iter()
            .enumerate()
            .map(|(rank, token)| {
                leaderboard_item(
                    rank,
                    token,
                    Span::styled(
                        format_change(token.price_change_24h),
                        Style::default().fg(change_color(token.price_change_24h)),
                    ),
                )
            })
            .collect(),
        LeaderboardTab::Volume => app
            .store
            .top_by_volume()
            .into_iter()
            .enumerate()
            .map(|(rank, token)| {
                leaderboard_item(rank, token, Span::raw(format_currency(token.volume_24h)))
            })
            .collect(),
        LeaderboardTab::Creators => app
            .store
            .top_creators()
            .into_iter()
            .enumerate()
            .map(|(rank, creator)| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("{}. ", rank + 1), Style::default().fg(Color::Yellow)),
                        Span::styled(
                            format!("@{}", creator.handle),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!("  {} tokens", creator.count)),
                    ]),
                    Line::from(Span::styled(
                        format!("   {}", creator.tickers()),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect(),
    };

    frame.render_widget(List::new(items), chunks[1]);
}

/// Une ligne de leaderboard : rang, ticker, créateur, métrique
fn leaderboard_item<'a>(rank: usize, token: &'a Token, metric: Span<'a>) -> ListItem<'a> {
    ListItem::new(Line::from(vec![
        Span::styled(format!("{}. ", rank + 1), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("${:<6}", token.ticker),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" @{:<16} ", token.creator_handle),
            Style::default().fg(Color::Gray),
        ),
        metric,
    ]))
}

// ============================================================================
// Main Content : onglets + table des tokens
// ============================================================================

fn render_token_panel(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let watch_count = app.store.watchlist_tokens().len();
    let tabs = Tabs::new(vec![
        format!("All Tokens ({})", app.store.len()),
        format!("Watchlist ({})", watch_count),
    ])
    .select(app.token_tab.index())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let tokens = app.visible_tokens();
    let title = match app.token_tab {
        TokenTab::All => " Tokens ",
        TokenTab::Watchlist => " Watchlist ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    // Watchlist vide : message d'aide au lieu d'une table vide
    if tokens.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Your watchlist is empty.",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "Press [w] on any token to add it to your watchlist.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let hint = Paragraph::new(text).block(block).alignment(Alignment::Center);
        frame.render_widget(hint, chunks[1]);
        return;
    }

    let now = Utc::now();
    let header = Row::new(vec![
        "", "Ticker", "Creator", "Price", "24h", "Market Cap", "Vol 24h", "Holders", "Launched",
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = tokens
        .iter()
        .map(|token| {
            let star = if token.in_watchlist { "★" } else { "☆" };
            Row::new(vec![
                Cell::from(star).style(Style::default().fg(Color::Yellow)),
                Cell::from(format!("${}", token.ticker)),
                Cell::from(format!("@{}", token.creator_handle)),
                Cell::from(format_price(token.current_price)),
                Cell::from(format_change(token.price_change_24h))
                    .style(Style::default().fg(change_color(token.price_change_24h))),
                Cell::from(format_currency(token.market_cap)),
                Cell::from(format_currency(token.volume_24h)),
                Cell::from(format_number(token.holder_count)),
                Cell::from(format_time_ago(token.launch_time, now)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Length(7),
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(13),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));

    // CONCEPT RATATUI : TableState
    // - État de sélection passé à render_stateful_widget
    // - Construit à chaque frame depuis app.selected_index
    let mut state = TableState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = |k: &'static str| {
        Span::styled(k, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    };

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_on_details() {
        Line::from(vec![
            key("[ESC]"),
            Span::raw(" Close  "),
            key("[←→ / h l]"),
            Span::raw(" Inspect history  "),
            key("[w]"),
            Span::raw(" Watchlist  "),
            key("[q]"),
            Span::raw(" Quit"),
        ])
    } else {
        let mut spans = vec![
            key("[q]"),
            Span::raw(" Quit  "),
            key("[↑↓ / j k]"),
            Span::raw(" Navigate  "),
            key("[Enter]"),
            Span::raw(" Details  "),
            key("[w]"),
            Span::raw(" Watchlist  "),
            key("[Tab]"),
            Span::raw(" All/Watchlist  "),
            key("[ ]"),
            Span::raw(" Leaderboard  "),
            key("[r]"),
            Span::raw(" Refresh"),
        ];
        if let Some(status) = &app.status_message {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(status.as_str(), Style::default().fg(Color::Green)));
        }
        Line::from(spans)
    };

    let paragraph = Paragraph::new(vec![line]).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::{TickParams, TokenStore};
    use ratatui::{backend::TestBackend, Terminal};

    pub(crate) fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut out = String::new();
        for (i, cell) in buffer.content.iter().enumerate() {
            out.push_str(cell.symbol());
            if (i + 1) % width == 0 {
                out.push('\n');
            }
        }
        out
    }

    pub(crate) fn sample_app() -> App {
        let params = TickParams { launch_probability: 0.0, max_tokens: None };
        App::new(TokenStore::generate(20, Some(5), params))
    }

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(160, 48);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_render_dashboard_panels() {
        let app = sample_app();
        let text = draw(&app);

        assert!(text.contains("Launchboard"));
        assert!(text.contains("Recent Launches"));
        assert!(text.contains("Leaderboards"));
        assert!(text.contains("All Tokens (20)"));
        assert!(text.contains("Last updated"));
    }

    #[test]
    fn test_render_empty_watchlist_hint() {
        let mut app = sample_app();
        let starred: Vec<_> = app.store.watchlist_tokens().iter().map(|t| t.id).collect();
        for id in starred {
            app.store.toggle_watchlist(id);
        }
        app.switch_token_tab();

        let text = draw(&app);
        assert!(text.contains("Your watchlist is empty."));
    }

    #[test]
    fn test_render_quit_confirmation() {
        let mut app = sample_app();
        app.request_quit();
        let text = draw(&app);
        assert!(text.contains("again to quit"));
    }

    #[test]
    fn test_render_creators_tab() {
        let mut app = sample_app();
        app.leaderboard_tab = LeaderboardTab::Creators;
        let expected = app
            .store
            .top_creators()
            .first()
            .map(|c| format!("@{}  {} tokens", c.handle, c.count))
            .unwrap();

        let text = draw(&app);
        assert!(text.contains(&expected));
    }
}
