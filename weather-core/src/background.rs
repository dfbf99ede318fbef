//! Picks the backdrop shown behind a weather report.

use serde::Serialize;

/// Backdrop image chosen from a condition description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    Thunderstorm,
    Cloudy,
    Clear,
    Drizzle,
    Snow,
    Rain,
    Default,
}

/// Checked in order; the first keyword found in the condition wins.
const KEYWORDS: &[(&str, Background)] = &[
    ("thunderstorm", Background::Thunderstorm),
    ("cloud", Background::Cloudy),
    ("clear", Background::Clear),
    ("sunny", Background::Clear),
    ("drizzle", Background::Drizzle),
    ("snow", Background::Snow),
    ("rain", Background::Rain),
];

impl Background {
    pub fn from_condition(condition: &str) -> Self {
        let condition = condition.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| condition.contains(keyword))
            .map(|(_, background)| *background)
            .unwrap_or(Background::Default)
    }

    pub fn image(&self) -> &'static str {
        match self {
            Background::Thunderstorm => "/images/thunderstorm.jpg",
            Background::Cloudy => "/images/cloudy.jpg",
            Background::Clear => "/images/clear.jpg",
            Background::Drizzle => "/images/drizzle.jpg",
            Background::Snow => "/images/snow.jpg",
            Background::Rain => "/images/rain.jpg",
            Background::Default => "/images/default.jpg",
        }
    }
}

/// Background plus whether the night filter applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Backdrop {
    pub background: Background,
    pub darken: bool,
}

impl Backdrop {
    /// `local_hour` is 0..=23.
    pub fn select(condition: &str, local_hour: u32) -> Self {
        Self {
            background: Background::from_condition(condition),
            darken: is_night(local_hour),
        }
    }
}

pub fn is_night(local_hour: u32) -> bool {
    !(6..18).contains(&local_hour)
}
