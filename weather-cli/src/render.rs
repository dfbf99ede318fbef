use std::fmt;

use weather_core::WeatherDisplay;

/// Human-readable rendering of the displayed report.
pub struct Rendered<'a>(pub &'a WeatherDisplay);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = self.0;
        let report = &display.report;

        if let Some(place) = &display.place {
            writeln!(f, "Location: {}, {}, {}", place.city, place.state, place.country)?;
        }
        writeln!(f, "{}, {} ({})", report.city, report.country, report.day_of_week)?;
        writeln!(f)?;
        writeln!(f, "Weather Details")?;
        writeln!(f, "  Temperature: {}°C", report.temperature)?;
        writeln!(f, "  Feels like:  {:.1}°C", report.feels_like)?;
        writeln!(f, "  Humidity:    {}%", report.humidity)?;
        writeln!(f, "  Wind Speed:  {} m/s", report.wind_speed)?;
        writeln!(f, "  Condition:   {}", report.weather)?;
        writeln!(f)?;
        writeln!(f, "Additional Info")?;
        writeln!(f, "  Pressure:    {} mb", report.pressure_mb)?;
        match report.wind_dir {
            Some(deg) => writeln!(f, "  Wind Dir:    {deg}°")?,
            None => writeln!(f, "  Wind Dir:    n/a")?,
        }
        match report.visibility_km {
            Some(km) => writeln!(f, "  Visibility:  {km} km")?,
            None => writeln!(f, "  Visibility:  n/a")?,
        }
        writeln!(f, "  Icon:        {}", report.icon)?;
        writeln!(
            f,
            "  Background:  {}{}",
            display.backdrop.background.image(),
            if display.backdrop.darken { " (night)" } else { "" }
        )
    }
}
