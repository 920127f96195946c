// ============================================================================
// Formatage pour l'affichage
// ============================================================================
// Montants compacts ($1.23M), pourcentages signés, temps relatif, sparkline
// ============================================================================

use chrono::{DateTime, Utc};
use ratatui::style::Color;

/// Formate un montant en dollars avec suffixe K / M / B
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.2}K", value / 1_000.0)
    } else {
        format!("${:.2}", value)
    }
}

/// Formate un entier de façon compacte (12.3K, 1.5M)
pub fn format_number(value: u64) -> String {
    let v = value as f64;
    if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.1}K", v / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Prix à 6 décimales : les tokens valent souvent moins d'un centime
pub fn format_price(price: f64) -> String {
    format!("${:.6}", price)
}

/// Pourcentage signé : "+12.34%" / "-3.10%"
pub fn format_change(change: f64) -> String {
    format!("{:+.2}%", change)
}

/// Vert si positif ou nul, rouge sinon
pub fn change_color(change: f64) -> Color {
    if change >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

/// Temps relatif : "just now", "5 minutes ago", "3 days ago"
///
/// CONCEPT RUST : chrono::Duration
/// - now - then donne une durée signée
/// - Une date dans le futur est traitée comme "just now"
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let (amount, unit) = if elapsed.num_days() >= 1 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() >= 1 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() >= 1 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };

    let plural = if amount > 1 { "s" } else { "" };
    format!("{} {}{} ago", amount, unit, plural)
}

/// Convertit un historique de prix en hauteurs entières pour le widget Sparkline
///
/// CONCEPT : Normalisation min/max
/// - Le widget Sparkline de ratatui n'accepte que des u64
/// - On ramène chaque prix dans [1, resolution] (0 est réservé au vide)
/// - Série plate (max == min) : toutes les barres à mi-hauteur
pub fn sparkline_points<'a, I>(history: I, resolution: u64) -> Vec<u64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let values: Vec<f64> = history.into_iter().copied().collect();
    if values.is_empty() {
        return Vec::new();
    }

    let (min, max) = values
        .iter()
        .fold((f64::MAX, f64::MIN), |(min, max), &v| (min.min(v), max.max(v)));
    let range = max - min;
    let resolution = resolution.max(1);

    values
        .iter()
        .map(|&v| {
            if range <= 0.0 || !range.is_finite() {
                resolution.div_ceil(2)
            } else {
                1 + (((v - min) / range) * (resolution - 1) as f64).round() as u64
            }
        })
        .collect()
}

/// Couleur du hype meter : vert < 33%, jaune < 66%, rouge sinon
pub fn hype_color(percent: u16) -> Color {
    if percent < 33 {
        Color::Green
    } else if percent < 66 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Pourcentage du hype meter (mentions sur 100, plafonné à 100)
pub fn hype_percent(mentions: u64, max_mentions: u64) -> u16 {
    if max_mentions == 0 {
        return 100;
    }
    (mentions.saturating_mul(100) / max_mentions).min(100) as u16
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(1_500.0), "$1.50K");
        assert_eq!(format_currency(2_340_000.0), "$2.34M");
        assert_eq!(format_currency(7_000_000_000.0), "$7.00B");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(12_345), "12.3K");
        assert_eq!(format_number(1_500_000), "1.5M");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(12.345), "+12.35%");
        assert_eq!(format_change(-3.1), "-3.10%");
        assert_eq!(format_change(0.0), "+0.00%");
    }

    #[test]
    fn test_format_time_ago() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now, now), "just now");
        assert_eq!(format_time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_time_ago(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(format_time_ago(now - Duration::days(3), now), "3 days ago");
        assert_eq!(format_time_ago(now + Duration::hours(1), now), "just now");
    }

    #[test]
    fn test_sparkline_points() {
        let history = [1.0, 2.0, 3.0];
        assert_eq!(sparkline_points(&history, 11), vec![1, 6, 11]);

        let flat = [4.0, 4.0];
        assert_eq!(sparkline_points(&flat, 8), vec![4, 4]);

        let empty: [f64; 0] = [];
        assert!(sparkline_points(&empty, 8).is_empty());

        let single = [0.5];
        assert_eq!(sparkline_points(&single, 8).len(), 1);
    }

    #[test]
    fn test_hype_meter() {
        assert_eq!(hype_percent(20, 100), 20);
        assert_eq!(hype_percent(250, 100), 100);
        assert_eq!(hype_color(10), Color::Green);
        assert_eq!(hype_color(50), Color::Yellow);
        assert_eq!(hype_color(90), Color::Red);
    }
}
