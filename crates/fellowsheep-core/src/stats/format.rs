//! Display formatting for the tracker dashboard (pt-BR locale).

use chrono::{DateTime, Utc};
use std::fmt;

const NOT_AVAILABLE: &str = "N/A";

/// Render a number the way JavaScript prints it: no trailing `.0`.
fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Format with `.` as thousands separator and `,` for decimals (at most three).
pub fn format_number(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{},{}", sign, grouped, frac_part)
    }
}

/// Rating band used to colour Elo values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EloTier {
    Master,
    Diamond,
    Gold,
    Silver,
    Bronze,
    Unrated,
}

impl EloTier {
    pub fn from_rating(rating: Option<f64>) -> Self {
        match rating.filter(|r| r.is_finite()) {
            None => EloTier::Unrated,
            Some(r) if r >= 2000.0 => EloTier::Master,
            Some(r) if r >= 1800.0 => EloTier::Diamond,
            Some(r) if r >= 1600.0 => EloTier::Gold,
            Some(r) if r >= 1400.0 => EloTier::Silver,
            Some(_) => EloTier::Bronze,
        }
    }

    /// CSS class name.
    pub fn class_name(&self) -> &'static str {
        match self {
            EloTier::Master => "elo-master",
            EloTier::Diamond => "elo-diamond",
            EloTier::Gold => "elo-gold",
            EloTier::Silver => "elo-silver",
            EloTier::Bronze => "elo-bronze",
            EloTier::Unrated => "elo-na",
        }
    }
}

/// A value ready for display together with its CSS class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styled {
    pub value: String,
    pub class_name: &'static str,
}

impl fmt::Display for Styled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

pub fn format_elo(rating: Option<f64>) -> Styled {
    let tier = EloTier::from_rating(rating);
    let value = match rating.filter(|r| r.is_finite()) {
        Some(r) => plain_number(r),
        None => NOT_AVAILABLE.to_string(),
    };
    Styled {
        value,
        class_name: tier.class_name(),
    }
}

/// Signed rating change: `+12`, `-8`, `+0`.
pub fn format_delta(delta: Option<f64>) -> Styled {
    match delta.filter(|d| d.is_finite()) {
        None => Styled {
            value: NOT_AVAILABLE.to_string(),
            class_name: "delta-neutral",
        },
        Some(d) if d >= 0.0 => Styled {
            value: format!("+{}", plain_number(d)),
            class_name: "delta-positive",
        },
        Some(d) => Styled {
            value: plain_number(d),
            class_name: "delta-negative",
        },
    }
}

/// `"62.5%"`, or `"0%"` without games.
pub fn calculate_winrate(wins: f64, total: f64) -> String {
    if !wins.is_finite() || !total.is_finite() || total == 0.0 {
        return "0%".to_string();
    }
    format!("{:.1}%", wins / total * 100.0)
}

/// `dd/mm/yyyy` for an RFC 3339 date; other input is returned unchanged.
pub fn format_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(parsed) => parsed.with_timezone(&Utc).format("%d/%m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// `dd/mm/yyyy, HH:MM` (UTC) for Unix seconds.
pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(at) => at.format("%d/%m/%Y, %H:%M").to_string(),
        None => "Data inválida".to_string(),
    }
}

/// Coarse "time ago" label for Unix seconds.
pub fn relative_time(timestamp: i64, now: DateTime<Utc>) -> String {
    let diff = now.timestamp() - timestamp;
    match diff {
        d if d < 60 => "Agora mesmo".to_string(),
        d if d < 3_600 => format!("{} min atrás", d / 60),
        d if d < 86_400 => format!("{} h atrás", d / 3_600),
        d if d < 604_800 => format!("{} dias atrás", d / 86_400),
        d if d < 2_592_000 => format!("{} sem atrás", d / 604_800),
        d => format!("{} meses atrás", d / 2_592_000),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltKind {
    LossStreak,
    EloDrop,
    Other,
}

impl TiltKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "loss_streak" => TiltKind::LossStreak,
            "elo_drop" => TiltKind::EloDrop,
            _ => TiltKind::Other,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TiltKind::LossStreak => "red",
            TiltKind::EloDrop => "orange",
            TiltKind::Other => "gray",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TiltKind::LossStreak => "Sequência de derrotas",
            TiltKind::EloDrop => "Queda de Elo",
            TiltKind::Other => "Tilt detectado",
        }
    }
}
