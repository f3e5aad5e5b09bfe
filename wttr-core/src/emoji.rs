//! Static glyph tables for wttr.in condition codes and compass headings.

use tracing::warn;

/// Returned for any code or heading the tables do not know.
pub const FALLBACK_EMOJI: &str = "🌈";

/// wttr.in (WWO) condition codes, sorted by code.
pub const CONDITION_EMOJI: &[(u16, &str)] = &[
    (113, "☀️"),   // Sunny
    (116, "⛅"),    // Partly cloudy
    (119, "☁️"),   // Cloudy
    (122, "☁️"),   // Very cloudy
    (143, "🌫️"),   // Mist
    (176, "🌦️"),   // Patchy rain nearby
    (179, "🌨️"),   // Patchy snow nearby
    (182, "🌨️"),   // Patchy sleet nearby
    (185, "🌨️"),   // Patchy freezing drizzle
    (200, "⛈️"),   // Thundery outbreaks
    (227, "🌨️"),   // Blowing snow
    (230, "❄️"),   // Blizzard
    (248, "🌫️"),   // Fog
    (260, "🌫️"),   // Freezing fog
    (263, "🌦️"),   // Patchy light drizzle
    (266, "🌧️"),   // Light drizzle
    (281, "🌨️"),   // Freezing drizzle
    (284, "🌨️"),   // Heavy freezing drizzle
    (293, "🌧️"),   // Patchy light rain
    (296, "🌧️"),   // Light rain
    (299, "🌧️"),   // Moderate rain at times
    (302, "🌧️"),   // Moderate rain
    (305, "🌧️"),   // Heavy rain at times
    (308, "🌧️"),   // Heavy rain
    (311, "🌨️"),   // Light freezing rain
    (314, "🌨️"),   // Moderate or heavy freezing rain
    (317, "🌨️"),   // Light sleet
    (320, "🌨️"),   // Moderate or heavy sleet
    (323, "🌨️"),   // Patchy light snow
    (326, "🌨️"),   // Light snow
    (329, "❄️"),   // Patchy moderate snow
    (332, "❄️"),   // Moderate snow
    (335, "❄️"),   // Patchy heavy snow
    (338, "❄️"),   // Heavy snow
    (350, "🌨️"),   // Ice pellets
    (353, "🌦️"),   // Light rain shower
    (356, "🌧️"),   // Moderate or heavy rain shower
    (359, "🌧️"),   // Torrential rain shower
    (362, "🌨️"),   // Light sleet showers
    (365, "🌨️"),   // Moderate or heavy sleet showers
    (368, "🌨️"),   // Light snow showers
    (371, "❄️"),   // Moderate or heavy snow showers
    (374, "🌨️"),   // Light showers of ice pellets
    (377, "🌨️"),   // Moderate or heavy showers of ice pellets
    (386, "⛈️"),   // Patchy light rain with thunder
    (389, "⛈️"),   // Moderate or heavy rain with thunder
    (392, "❄️⛈️"), // Patchy light snow with thunder
    (395, "❄️"),   // Moderate or heavy snow with thunder
];

/// 16-point compass labels folded onto eight arrows. A half-wind shares the
/// arrow of the point counter-clockwise of it.
pub const COMPASS_EMOJI: &[(&str, &str)] = &[
    ("N", "⬆️"),
    ("NNE", "⬆️"),
    ("NE", "↗️"),
    ("ENE", "↗️"),
    ("E", "➡️"),
    ("ESE", "➡️"),
    ("SE", "↘️"),
    ("SSE", "↘️"),
    ("S", "⬇️"),
    ("SSW", "⬇️"),
    ("SW", "↙️"),
    ("WSW", "↙️"),
    ("W", "⬅️"),
    ("WNW", "⬅️"),
    ("NW", "↖️"),
    ("NNW", "↖️"),
];

/// Glyph for a condition code, or [`FALLBACK_EMOJI`] with a warning.
pub fn condition_emoji(code: u16) -> &'static str {
    match CONDITION_EMOJI.binary_search_by_key(&code, |&(c, _)| c) {
        Ok(idx) => CONDITION_EMOJI[idx].1,
        Err(_) => {
            warn!(code, "unknown weather condition code");
            FALLBACK_EMOJI
        }
    }
}

/// Arrow for a 16-point compass label, or [`FALLBACK_EMOJI`] with a warning.
pub fn compass_emoji(label: &str) -> &'static str {
    let label = label.trim();
    COMPASS_EMOJI
        .iter()
        .find(|(point, _)| point.eq_ignore_ascii_case(label))
        .map(|&(_, glyph)| glyph)
        .unwrap_or_else(|| {
            warn!(label, "unknown compass point");
            FALLBACK_EMOJI
        })
}
