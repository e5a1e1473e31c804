//! Projection of a lookup result onto labelled display rows, and a plain-text
//! rendering of the whole view state.

use std::fmt;

use crate::{LookupResult, Scalar, ViewState};

pub const UNKNOWN_WEATHER: &str = "Unknown Weather";
pub const NO_NOTES: &str = "None";
pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub rows: Vec<Row>,
}

impl Section {
    fn new(title: &'static str, rows: Vec<(&'static str, String)>) -> Self {
        Self {
            title,
            rows: rows.into_iter().map(|(label, value)| Row { label, value }).collect(),
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows.iter().find(|row| row.label == label).map(|row| row.value.as_str())
    }
}

/// Display-ready view of a [`LookupResult`]. Absent leaves are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub icon: Option<String>,
    pub description: String,
    pub location: Section,
    pub weather: Section,
    pub astro: Section,
    pub notes: String,
}

impl Projection {
    pub fn sections(&self) -> [&Section; 3] {
        [&self.location, &self.weather, &self.astro]
    }

    /// Look a row up by label across all sections.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.sections().into_iter().find_map(|section| section.value(label))
    }
}

pub fn project(result: &LookupResult) -> Projection {
    let location = &result.location;
    let weather = &result.weather;
    let astro = &weather.astro;

    let wind = [
        with_unit(&weather.wind_speed, " km/h"),
        text(&weather.wind_dir),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    Projection {
        icon: weather.icon().map(str::to_owned),
        description: weather.description().unwrap_or(UNKNOWN_WEATHER).to_string(),
        location: Section::new(
            "Location Information",
            vec![
                ("Name", text(&location.name)),
                ("Region", text(&location.region)),
                ("Country", text(&location.country)),
                ("Latitude", with_unit(&location.lat, "")),
                ("Longitude", with_unit(&location.lon, "")),
                ("Timezone", text(&location.timezone_id)),
                ("Local Time", text(&location.localtime)),
            ],
        ),
        weather: Section::new(
            "Weather Conditions",
            vec![
                ("Temperature", with_unit(&weather.temperature, "°C")),
                ("Feels Like", with_unit(&weather.feelslike, "°C")),
                ("Humidity", with_unit(&weather.humidity, "%")),
                ("Wind", wind),
                ("Pressure", with_unit(&weather.pressure, " mb")),
                ("Visibility", with_unit(&weather.visibility, " km")),
                ("Cloud Cover", with_unit(&weather.cloudcover, "%")),
                ("UV Index", with_unit(&weather.uv_index, "")),
            ],
        ),
        astro: Section::new(
            "Astronomical Data",
            vec![
                ("Sunrise", text(&astro.sunrise)),
                ("Sunset", text(&astro.sunset)),
                ("Moonrise", text(&astro.moonrise)),
                ("Moonset", text(&astro.moonset)),
                ("Moon Phase", text(&astro.moon_phase)),
                ("Moon Illumination", with_unit(&astro.moon_illumination, "%")),
            ],
        ),
        notes: result
            .notes
            .as_deref()
            .filter(|notes| !notes.is_empty())
            .unwrap_or(NO_NOTES)
            .to_string(),
    }
}

impl Projection {
    /// Width of the label column: the longest label plus its colon.
    fn label_width(&self) -> usize {
        self.sections()
            .into_iter()
            .flat_map(|section| section.rows.iter())
            .map(|row| row.label.chars().count() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Three aligned tables plus a notes line; no trailing blanks on any line.
impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.label_width();

        write_section(f, &self.location, width, None)?;
        let summary = match &self.icon {
            Some(icon) => format!("[{icon}] {}", self.description),
            None => self.description.clone(),
        };
        write_section(f, &self.weather, width, Some(&summary))?;
        write_section(f, &self.astro, width, None)?;
        write!(f, "Notes: {}", self.notes)
    }
}

/// Render a successful lookup as text tables.
pub fn render(result: &LookupResult) -> String {
    project(result).to_string()
}

/// Text for the whole view: nothing when idle, a spinner label while loading,
/// the message on error and the tables on success.
pub fn render_state(state: &ViewState) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading => LOADING_TEXT.to_string(),
        ViewState::Error(message) => message.clone(),
        ViewState::Success(result) => render(result),
    }
}

fn write_section(
    f: &mut fmt::Formatter<'_>,
    section: &Section,
    width: usize,
    summary: Option<&str>,
) -> fmt::Result {
    writeln!(f, "{}", section.title)?;
    if let Some(summary) = summary {
        writeln!(f, "  {summary}")?;
    }
    for row in &section.rows {
        let label = format!("{}:", row.label);
        let line = format!("  {label:<width$} {}", row.value);
        writeln!(f, "{}", line.trim_end())?;
    }
    writeln!(f)
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// The value is printed as the service sent it, then the unit.
fn with_unit(value: &Option<Scalar>, unit: &str) -> String {
    value.as_ref().map(|v| format!("{v}{unit}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Astro, Location, Weather};

    #[test]
    fn empty_result_uses_placeholders_and_blank_cells() {
        let projection = project(&LookupResult::default());

        assert_eq!(projection.description, UNKNOWN_WEATHER);
        assert_eq!(projection.icon, None);
        assert_eq!(projection.notes, NO_NOTES);
        assert_eq!(projection.value("Name"), Some(""));
        assert_eq!(projection.value("Temperature"), Some(""));
        assert_eq!(projection.value("Wind"), Some(""));
        assert_eq!(projection.value("Moon Illumination"), Some(""));
    }

    #[test]
    fn units_are_suffixed() {
        let result = LookupResult {
            weather: Weather {
                temperature: Some(Scalar::from(10_i64)),
                humidity: Some(Scalar::from(70_i64)),
                wind_speed: Some(Scalar::from(15_i64)),
                wind_dir: Some("NW".into()),
                pressure: Some(Scalar::from(1013_i64)),
                visibility: Some("10".into()),
                astro: Astro { moon_illumination: Some(Scalar::from(60_i64)), ..Astro::default() },
                ..Weather::default()
            },
            ..LookupResult::default()
        };
        let projection = project(&result);

        assert_eq!(projection.value("Temperature"), Some("10°C"));
        assert_eq!(projection.value("Humidity"), Some("70%"));
        assert_eq!(projection.value("Wind"), Some("15 km/h NW"));
        assert_eq!(projection.value("Pressure"), Some("1013 mb"));
        assert_eq!(projection.value("Visibility"), Some("10 km"));
        assert_eq!(projection.value("Moon Illumination"), Some("60%"));
    }

    #[test]
    fn wind_direction_alone() {
        let result = LookupResult {
            weather: Weather { wind_dir: Some("SSE".into()), ..Weather::default() },
            ..LookupResult::default()
        };
        assert_eq!(project(&result).value("Wind"), Some("SSE"));
    }

    #[test]
    fn empty_notes_show_placeholder() {
        let result = LookupResult { notes: Some(String::new()), ..LookupResult::default() };
        assert_eq!(project(&result).notes, NO_NOTES);
    }

    #[test]
    fn render_lists_sections_in_order() {
        let result = LookupResult {
            location: Location { name: Some("Paris".into()), ..Location::default() },
            notes: Some("bring an umbrella".into()),
            ..LookupResult::default()
        };
        let out = render(&result);

        let location = out.find("Location Information").unwrap();
        let weather = out.find("Weather Conditions").unwrap();
        let astro = out.find("Astronomical Data").unwrap();
        assert!(location < weather && weather < astro);
        assert!(out.contains("Name:"));
        assert!(out.contains("Paris"));
        assert!(out.contains(UNKNOWN_WEATHER));
        assert!(out.ends_with("Notes: bring an umbrella"));
        assert!(out.lines().all(|line| line == line.trim_end()));
    }

    #[test]
    fn render_state_per_variant() {
        assert_eq!(render_state(&ViewState::Idle), "");
        assert_eq!(render_state(&ViewState::Loading), LOADING_TEXT);
        assert_eq!(render_state(&ViewState::Error("Not found".into())), "Not found");
        assert!(
            render_state(&ViewState::Success(Box::default())).contains("Location Information")
        );
    }

    #[test]
    fn coordinates_are_shown_as_sent() {
        let result = LookupResult::from_body(
            r#"{"location":{"lat":"48.8670","lon":"1e3"},"weather":{"temperature":10}}"#,
        )
        .unwrap();
        let projection = project(&result);

        assert_eq!(projection.value("Latitude"), Some("48.8670"));
        assert_eq!(projection.value("Longitude"), Some("1e3"));
        assert_eq!(projection.value("Temperature"), Some("10°C"));
    }

    #[test]
    fn display_matches_render() {
        let result = LookupResult {
            weather: Weather {
                weather_icons: vec![Some("sun.png".into())],
                weather_descriptions: vec![Some("Sunny".into())],
                ..Weather::default()
            },
            ..LookupResult::default()
        };
        let out = render(&result);

        assert_eq!(project(&result).to_string(), out);
        assert!(out.contains("Weather Conditions\n  [sun.png] Sunny\n  Temperature:"));
    }
}
