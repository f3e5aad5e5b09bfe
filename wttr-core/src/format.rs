//! Renders decoded reports as chat-sized, emoji-annotated text blocks.
//!
//! Output is a pure function of the [`WeatherReport`]; both renderings are
//! wrapped in a code fence so chat clients show them fixed-width.

use std::fmt::Write;

use crate::{
    emoji::{compass_emoji, condition_emoji},
    model::{ForecastDay, WeatherReport},
};

const FENCE: &str = "```";
const DAY_DIVIDER: &str = "---\n";

/// Current conditions for the report's nearest area.
pub fn format_current(report: &WeatherReport) -> String {
    let current = &report.current;
    let mut out = String::from(FENCE);

    let _ = writeln!(out, "📍 {}", location_line(report));
    let _ = writeln!(
        out,
        "🌡️ {}°C (feels like {}°C)",
        current.temp_c, current.feels_like_c
    );
    let _ = writeln!(out, "💧 {}% humidity", current.humidity_pct);
    let _ = writeln!(
        out,
        "🌬️ {} {}km/h",
        compass_emoji(&current.wind_compass),
        current.wind_speed_kmph
    );
    let _ = write!(
        out,
        "{} {}",
        condition_emoji(current.condition_code),
        current.description
    );

    out.push_str(FENCE);
    out
}

/// One block per forecast day, separated by divider lines.
pub fn format_forecast(report: &WeatherReport) -> String {
    let mut out = String::from(FENCE);

    for (i, day) in report.days.iter().enumerate() {
        if i > 0 {
            out.push_str(DAY_DIVIDER);
        }
        write_day(&mut out, day);
    }

    out.push_str(FENCE);
    out
}

fn location_line(report: &WeatherReport) -> String {
    let area = &report.area;
    if area.region.is_empty() {
        format!("{}, {}", area.name, area.country)
    } else {
        format!("{}, {} ({})", area.name, area.country, area.region)
    }
}

fn write_day(out: &mut String, day: &ForecastDay) {
    let _ = writeln!(out, "📅 {}", day.date);
    let _ = writeln!(out, "🌡️ {}°C / {}°C", day.max_temp_c, day.min_temp_c);

    if let Some(first) = day.hourly.first() {
        let _ = writeln!(
            out,
            "🌬️ {} {}km/h",
            compass_emoji(&first.wind_compass),
            first.wind_speed_kmph
        );
        let _ = writeln!(
            out,
            "{} {}",
            condition_emoji(first.condition_code),
            first.description
        );
    }

    out.push_str(&precipitation_line(day));
    out.push('\n');
}

/// Snow then rain, joined with ` / `; empty when the day is dry.
fn precipitation_line(day: &ForecastDay) -> String {
    let mut segments = Vec::with_capacity(2);

    if day.total_snow_cm > 0.0 {
        segments.push(format!("❄️ {}cm", day.total_snow_cm));
    }

    let rain = day.mean_precip_mm();
    if rain > 0.0 {
        segments.push(format!("🌧️ {rain:.2}mm"));
    }

    segments.join(" / ")
}
