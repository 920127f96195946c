// ============================================================================
// Popup de détails d'un token
// ============================================================================
// Affichée par-dessus le dashboard quand on presse Enter
//
// Contenu :
// - Prix, variations 24h / 30m
// - Sparkline de l'historique avec curseur (←/→)
// - Statistiques (market cap, volume, fees, holders, liquidité)
// - Top holders et hype meter
// - Liens de trade et profil du créateur
//
// CONCEPTS RATATUI :
// 1. Clear : efface la zone sous la popup
// 2. Sparkline : ne prend que des u64, d'où la normalisation
// 3. Gauge : barre de progression colorée
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Sparkline},
    Frame,
};

use crate::app::App;
use crate::models::{Token, HISTORY_LEN};
use crate::ui::format::{
    change_color, format_change, format_currency, format_number, format_price, hype_color,
    hype_percent, sparkline_points,
};

/// Nombre de mentions correspondant à un hype meter plein
const HYPE_SCALE: u64 = 100;

/// Hauteur max des barres de la sparkline
const SPARKLINE_RESOLUTION: u64 = 64;

/// Dessine la popup de détails
pub fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let Some(token) = app.details() else {
        return;
    };

    let popup = centered_rect(80, 85, area);
    frame.render_widget(Clear, popup);

    let star = if token.in_watchlist { "★" } else { "☆" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ${} · {} ({}) ", star, token.ticker, token.name, token.id))
        .title_alignment(Alignment::Center);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Prix et variations
            Constraint::Length(10), // Sparkline
            Constraint::Length(1),  // Curseur
            Constraint::Min(7),     // Stats + holders
            Constraint::Length(3),  // Hype meter
            Constraint::Length(2),  // Liens
        ])
        .split(inner);

    render_price_line(frame, token, chunks[0]);
    render_history(frame, app, token, chunks[1], chunks[2]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);
    render_stats(frame, token, middle[0]);
    render_holders(frame, app, middle[1]);

    render_hype(frame, token, chunks[4]);
    render_links(frame, token, chunks[5]);
}

fn render_price_line(frame: &mut Frame, token: &Token, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format_price(token.current_price),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   24h "),
        Span::styled(
            format_change(token.price_change_24h),
            Style::default().fg(change_color(token.price_change_24h)),
        ),
        Span::raw("   30m "),
        Span::styled(
            format_change(token.price_change_30m),
            Style::default().fg(change_color(token.price_change_30m)),
        ),
        Span::raw(format!("   by @{}", token.creator_handle)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Sparkline + ligne du curseur
///
/// La sparkline dessine une barre par colonne en partant du début des
/// données : on ne lui passe que la fenêtre visible, calée sur les
/// échantillons récents ou décalée pour garder le curseur à l'écran.
fn render_history(frame: &mut Frame, app: &App, token: &Token, area: Rect, cursor_area: Rect) {
    let color = change_color(token.price_change_24h);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Price history (last {} samples) ", HISTORY_LEN));
    let width = block.inner(area).width as usize;

    let points = sparkline_points(&token.price_history, SPARKLINE_RESOLUTION);
    let start = history_window_start(points.len(), width, app.history_cursor);
    let end = (start + width).min(points.len());
    let visible = &points[start..end];

    let sparkline = Sparkline::default()
        .block(block)
        .data(visible)
        .max(SPARKLINE_RESOLUTION)
        .style(Style::default().fg(color));
    frame.render_widget(sparkline, area);

    let line = match app.cursor_value() {
        Some((index, price)) => {
            // +1 pour la bordure gauche du bloc
            let column = index.saturating_sub(start) + 1;
            Line::from(vec![
                Span::raw(" ".repeat(column)),
                Span::styled("▲ ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("#{} {}", index, format_price(price)),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ])
        }
        None => Line::from(Span::styled(
            " [←/→] inspect a sample",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), cursor_area);
}

/// Premier échantillon visible pour une sparkline de `width` colonnes
pub fn history_window_start(len: usize, width: usize, cursor: Option<usize>) -> usize {
    if len <= width {
        return 0;
    }
    let latest = len - width;
    match cursor {
        Some(index) if index < latest => index,
        _ => latest,
    }
}

fn render_stats(frame: &mut Frame, token: &Token, area: Rect) {
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Gray));

    let lines = vec![
        Line::from(vec![label("Market cap     "), Span::raw(format_currency(token.market_cap))]),
        Line::from(vec![label("Volume 24h     "), Span::raw(format_currency(token.volume_24h))]),
        Line::from(vec![label("Transactions   "), Span::raw(format_number(token.transactions_24h))]),
        Line::from(vec![label("Fees 24h       "), Span::raw(format_currency(token.fees_24h))]),
        Line::from(vec![label("Holders        "), Span::raw(format_number(token.holder_count))]),
        Line::from(vec![label("Liquidity      "), Span::raw(format_currency(token.liquidity_depth))]),
        Line::from(vec![
            label("Launched       "),
            Span::raw(token.launch_time.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Stats ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_holders(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .details_wallets
        .iter()
        .map(|wallet| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<10}", wallet.label)),
                Span::styled(
                    format!("{:>3}%", wallet.percentage),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Top Holders ");
    frame.render_widget(List::new(items).block(block), area);
}

fn render_hype(frame: &mut Frame, token: &Token, area: Rect) {
    let percent = hype_percent(token.mentions, HYPE_SCALE);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Hype Meter "),
        )
        .gauge_style(Style::default().fg(hype_color(percent)))
        .percent(percent)
        .label(format!("{} mentions", token.mentions));
    frame.render_widget(gauge, area);
}

fn render_links(frame: &mut Frame, token: &Token, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Trade   ", Style::default().fg(Color::Gray)),
            Span::styled(token.trade_url(), Style::default().fg(Color::Blue)),
        ]),
        Line::from(vec![
            Span::styled("Creator ", Style::default().fg(Color::Gray)),
            Span::styled(token.creator_url(), Style::default().fg(Color::Blue)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Rectangle centré occupant `percent_x` × `percent_y` de `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dashboard::tests::{buffer_text, sample_app};
    use crate::ui::render;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_history_window_start() {
        assert_eq!(history_window_start(50, 80, None), 0);
        assert_eq!(history_window_start(100, 60, None), 40);
        assert_eq!(history_window_start(100, 60, Some(90)), 40);
        assert_eq!(history_window_start(100, 60, Some(10)), 10);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(80, 80, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 80);
    }

    #[test]
    fn test_render_details_popup() {
        let mut app = sample_app();
        app.open_details();
        app.cursor_left();
        let ticker = app.details().map(|t| t.ticker.clone()).unwrap();

        let backend = TestBackend::new(160, 50);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains(&format!("${}", ticker)));
        assert!(text.contains("Top Holders"));
        assert!(text.contains("Hype Meter"));
        assert!(text.contains("Wallet A"));
        assert!(text.contains("#99"));
        assert!(text.contains("jup.ag/swap/USDC-"));
    }
}
