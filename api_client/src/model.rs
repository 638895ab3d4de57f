//! Wire types exchanged with the PhotoMind backend.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single uploaded photo as returned by `/api/search`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub s3_url: String,
    /// Display date. Arrives as Unix seconds and is rewritten by [`Photo::normalize_date`].
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub date_modified: String,
    /// Parsed instant behind `date_modified`, when it could be parsed.
    #[serde(skip)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable_vec")]
    pub tags: Vec<Tag>,
    #[serde(default, rename = "thumbnail_url")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl Photo {
    /// Rewrite the epoch-seconds `date_modified` into a short `M/D/YYYY` date in `tz`.
    ///
    /// Values that are not epoch seconds are left untouched.
    pub fn normalize_date<Tz>(&mut self, tz: &Tz)
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if let Some((instant, display)) = normalize_epoch_date(&self.date_modified, tz) {
            self.modified_at = Some(instant);
            self.date_modified = display;
        }
    }

    /// URL used for grid thumbnails.
    pub fn preview_url(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or(&self.s3_url)
    }

    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("No name found")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    #[serde(default, deserialize_with = "de::confidence")]
    pub confidence: f64,
}

/// A user-defined album. The backend keys it by user and tab id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tab {
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub tab_id: String,
    pub tab_name: String,
}

/// One tag inferred by the deep search endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TagHit {
    pub tag: String,
    #[serde(default, deserialize_with = "de::confidence")]
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTabsResponse {
    #[serde(default, deserialize_with = "de::nullable_vec")]
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTabResponse {
    pub tab: Tab,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTabRequest<'a> {
    pub tab_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeepSearchEnvelope {
    pub results: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// Parse a Unix-seconds string such as `"1712345678.25"`.
pub fn parse_epoch_seconds(raw: &str) -> Option<DateTime<Utc>> {
    let secs: f64 = raw.trim().parse().ok()?;
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Returns the parsed instant and its `M/D/YYYY` rendering in `tz`.
pub fn normalize_epoch_date<Tz>(raw: &str, tz: &Tz) -> Option<(DateTime<Utc>, String)>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let instant = parse_epoch_seconds(raw)?;
    let display = instant.with_timezone(tz).format("%-m/%-d/%Y").to_string();
    Some((instant, display))
}

/// Scale a confidence into `[0, 1]`; the tagger reports percentages.
pub fn normalize_confidence(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let scaled = if value > 1.0 { value / 100.0 } else { value };
    scaled.clamp(0.0, 1.0)
}

mod de {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Str(String),
        Num(serde_json::Number),
    }

    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
            Some(StringOrNumber::Str(s)) => s,
            Some(StringOrNumber::Num(n)) => n.to_string(),
            None => String::new(),
        })
    }

    pub fn confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match Option::<StringOrNumber>::deserialize(deserializer)? {
            Some(StringOrNumber::Str(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| serde::de::Error::custom(format!("invalid confidence {:?}: {}", s, e)))?,
            Some(StringOrNumber::Num(n)) => n.as_f64().unwrap_or_default(),
            None => 0.0,
        };
        Ok(normalize_confidence(raw))
    }

    pub fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_without_tags_gets_empty_list() {
        let json = r#"{"id":"1","s3Url":"http://b/1.jpg","dateModified":"0","userId":"u"}"#;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert!(photo.tags.is_empty());

        let json = r#"{"id":"1","s3Url":"http://b/1.jpg","dateModified":"0","tags":null}"#;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert!(photo.tags.is_empty());
        assert!(photo.user_id.is_none());
    }

    #[test]
    fn test_photo_fields_follow_backend_names() {
        let json = r#"{
            "id": "abc",
            "s3Url": "https://bucket.s3.us-east-1.amazonaws.com/abc_dog.jpg",
            "dateModified": "1700000000.5",
            "userId": "user-1",
            "tags": [{"name": "Dog", "confidence": 97.5}],
            "thumbnail_url": "https://cdn/abc?w=300&h=300",
            "filename": "dog.jpg"
        }"#;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(photo.filename.as_deref(), Some("dog.jpg"));
        assert_eq!(photo.preview_url(), "https://cdn/abc?w=300&h=300");
        assert_eq!(photo.tags[0].name, "Dog");
        assert!((photo.tags[0].confidence - 0.975).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_date_in_utc() {
        let mut photo: Photo = serde_json::from_str(
            r#"{"id":"1","s3Url":"u","dateModified":"1700000000.123456","tags":[]}"#,
        )
        .unwrap();
        photo.normalize_date(&Utc);
        assert_eq!(photo.date_modified, "11/14/2023");
        assert_eq!(photo.modified_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_numeric_date_is_accepted() {
        let mut photo: Photo =
            serde_json::from_str(r#"{"id":"1","s3Url":"u","dateModified":86400}"#).unwrap();
        photo.normalize_date(&Utc);
        assert_eq!(photo.date_modified, "1/2/1970");
    }

    #[test]
    fn test_unparseable_date_left_alone() {
        let mut photo: Photo =
            serde_json::from_str(r#"{"id":"1","s3Url":"u","dateModified":"yesterday"}"#).unwrap();
        photo.normalize_date(&Utc);
        assert_eq!(photo.date_modified, "yesterday");
        assert!(photo.modified_at.is_none());
    }

    #[test]
    fn test_confidence_normalization() {
        assert_eq!(normalize_confidence(0.42), 0.42);
        assert_eq!(normalize_confidence(85.0), 0.85);
        assert_eq!(normalize_confidence(250.0), 1.0);
        assert_eq!(normalize_confidence(-3.0), 0.0);
        assert_eq!(normalize_confidence(f64::NAN), 0.0);

        let hit: TagHit = serde_json::from_str(r#"{"tag":"Dog","confidence":"0.9"}"#).unwrap();
        assert_eq!(hit.confidence, 0.9);
    }

    #[test]
    fn test_tab_id_may_be_numeric() {
        let tab: Tab =
            serde_json::from_str(r#"{"user_id":"u","tab_id":7,"tab_name":"Dogs"}"#).unwrap();
        assert_eq!(tab.tab_id, "7");
        assert_eq!(tab.tab_name, "Dogs");
    }
}
