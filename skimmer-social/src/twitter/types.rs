//! Wire and normalized record types for the v1.1-style endpoints.
//!
//! Post and profile ids are carried as decimal strings throughout: the API
//! hands out ids past the 53-bit-safe integer range, so they never touch a
//! native float and never render in exponential notation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Normalized account record.
///
/// Holds empty/zero defaults until a profile fetch succeeds and is replaced
/// wholesale on every successful fetch, never merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Profile {
    pub favourites_count: i64,
    pub description: String,
    pub listed_count: i64,
    pub url: String,
    pub time_zone: String,
    pub lang: String,
    /// Account creation time as epoch seconds.
    pub created_at: i64,
    pub location: String,
    pub followers_count: i64,
    pub friends_count: i64,
    pub name: String,
    pub screen_name: String,
    /// Decimal-integer string, never a native numeric.
    pub id: String,
    pub statuses_count: i64,
    pub utc_offset: i64,
}

/// A post as decoded from the timeline endpoint.
///
/// The fields the projection needs are typed; everything else the API sent
/// stays verbatim in `extra`, so callers still see the unprocessed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    #[serde(deserialize_with = "decimal_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, deserialize_with = "decimal_id_opt")]
    pub in_reply_to_status_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display-ready projection of a non-reply [`RawPost`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub favorited: bool,
    /// Post creation time as epoch seconds.
    pub created_at: i64,
    /// Escaped and linkified text.
    pub text: String,
    pub hashtags: Vec<String>,
    /// Descending position counter seeded from the profile's total status
    /// count; not contiguous across the filtered sequence.
    pub counter: i64,
    pub id: String,
    pub source: String,
    /// Always `None` for projected posts; kept for shape symmetry with the
    /// raw record.
    pub in_reply_to_status_id: Option<String>,
}

/// Profile payload as returned by `users/show.json`. Every field is optional
/// on the wire; normalization maps absent values to empty/zero defaults.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    #[serde(default, deserialize_with = "decimal_id_opt")]
    pub id: Option<String>,
    #[serde(default)]
    pub favourites_count: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub listed_count: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub followers_count: Option<i64>,
    #[serde(default)]
    pub friends_count: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub statuses_count: Option<i64>,
    #[serde(default)]
    pub utc_offset: Option<i64>,
}

/// Render a JSON id as a decimal string with no fractional digits and no
/// exponent. Integer ids stay exact; the float fallback formats fixed-point.
pub(crate) fn decimal_string(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| format!("{f:.0}"))
            }
        }
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn decimal_id<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    decimal_string(&v).ok_or_else(|| serde::de::Error::custom("expected a numeric or string id"))
}

fn decimal_id_opt<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    if v.is_null() {
        return Ok(None);
    }
    decimal_string(&v)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("expected a numeric or string id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn large_ids_decode_as_exact_decimal_strings() {
        let post: RawPost = serde_json::from_value(json!({
            "id": 90071992547409923u64,
            "text": "hello",
            "created_at": "Wed Aug 27 13:08:45 +0000 2008",
            "source": "web",
            "in_reply_to_status_id": null
        }))
        .unwrap();
        assert_eq!(post.id, "90071992547409923");
        assert_eq!(post.in_reply_to_status_id, None);
    }

    #[test]
    fn reply_reference_decodes_from_number_or_string() {
        let post: RawPost = serde_json::from_value(json!({
            "id": 1,
            "text": "a reply",
            "in_reply_to_status_id": 1234567890123456789u64
        }))
        .unwrap();
        assert_eq!(
            post.in_reply_to_status_id.as_deref(),
            Some("1234567890123456789")
        );

        let post: RawPost = serde_json::from_value(json!({
            "id": 2,
            "text": "a reply",
            "in_reply_to_status_id": "42"
        }))
        .unwrap();
        assert_eq!(post.in_reply_to_status_id.as_deref(), Some("42"));
    }

    #[test]
    fn float_ids_render_fixed_point_not_exponential() {
        assert_eq!(decimal_string(&json!(1.2e3)).as_deref(), Some("1200"));
        assert!(!decimal_string(&json!(1.0e17)).unwrap().contains('e'));
    }

    #[test]
    fn unknown_fields_survive_in_extra_and_reserialize() {
        let post: RawPost = serde_json::from_value(json!({
            "id": 7,
            "text": "kept",
            "retweet_count": 3,
            "truncated": false
        }))
        .unwrap();
        assert_eq!(post.extra.get("retweet_count"), Some(&json!(3)));

        let back = serde_json::to_value(&post).unwrap();
        assert_eq!(back.get("truncated"), Some(&json!(false)));
        assert_eq!(back.get("id"), Some(&json!("7")));
    }

    #[test]
    fn profile_defaults_are_empty() {
        let profile = Profile::default();
        assert!(profile.id.is_empty());
        assert_eq!(profile.statuses_count, 0);
        assert!(profile.screen_name.is_empty());
    }
}
