use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Number, Value};

/// A stored weather record as returned by `GET /weather/{id}`.
///
/// Every field is optional. Leaves of the wrong JSON type are dropped at the
/// parse boundary instead of failing the whole payload, so a partially shaped
/// record still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupResult {
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub location: Location,
    #[serde(deserialize_with = "lenient")]
    pub weather: Weather,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub lat: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub lon: Option<Scalar>,
    #[serde(deserialize_with = "lenient_text")]
    pub timezone_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub localtime: Option<String>,
}

/// Current conditions, in the units the service reports them (metric).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    #[serde(deserialize_with = "lenient_text_list")]
    pub weather_descriptions: Vec<Option<String>>,
    #[serde(deserialize_with = "lenient_text_list")]
    pub weather_icons: Vec<Option<String>>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub temperature: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub feelslike: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub humidity: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub wind_speed: Option<Scalar>,
    #[serde(deserialize_with = "lenient_text")]
    pub wind_dir: Option<String>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub pressure: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub visibility: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub cloudcover: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub uv_index: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    pub astro: Astro,
}

/// A numeric leaf exactly as the service sent it: a JSON number, or text
/// (the upstream provider reports some numbers as strings, e.g. `"48.8670"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Number),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl LookupResult {
    /// Parse a response body. Only a JSON object is accepted as a record.
    pub fn from_body(body: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }
}

impl Weather {
    /// First textual description, if the service sent any.
    pub fn description(&self) -> Option<&str> {
        first_text(&self.weather_descriptions)
    }

    pub fn icon(&self) -> Option<&str> {
        first_text(&self.weather_icons)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Astro {
    #[serde(deserialize_with = "lenient_text")]
    pub sunrise: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sunset: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub moonrise: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub moonset: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub moon_phase: Option<String>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub moon_illumination: Option<Scalar>,
}

/// Body of `POST /weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequest {
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

/// Response of `POST /weather`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
}

/// Deserialize any nested value, falling back to its default on a type mismatch.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_scalar<'de, D>(de: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => Some(Scalar::Number(n)),
        Value::String(s) => Some(Scalar::Text(s)),
        _ => None,
    })
}

/// Keeps positions: a badly typed element becomes `None` without discarding
/// its neighbours. A non-array value yields an empty list.
fn lenient_text_list<'de, D>(de: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn first_text(items: &[Option<String>]) -> Option<&str> {
    items.first()?.as_deref().filter(|s| !s.is_empty())
}
