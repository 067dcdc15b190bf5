//! Timeline reader over the v1.1-style REST endpoints.
//!
//! One profile lookup plus one timeline fetch per call, strictly sequential:
//! each request completes or fails before the method returns, nothing is
//! retried, and state is only committed after the whole payload decodes and
//! validates. Fetch methods hand back `&mut Self` so calls chain:
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), skimmer_social::twitter::TimelineError> {
//! use skimmer_social::twitter::TimelineReader;
//!
//! let mut reader = TimelineReader::new();
//! reader
//!     .fetch_profile_by_screen_name("SomeAccount")
//!     .await?
//!     .fetch_timeline()
//!     .await?;
//! for post in reader.timeline() {
//!     println!("{} {}", post.counter, post.text);
//! }
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::time::Instant;

use chrono::DateTime;
use serde_json::Value;
use thiserror::Error;

use skimmer_http::{HttpClient, HttpError, RequestOpts};

use crate::twitter::enrich::{extract_tags, process_text};
use crate::twitter::types::{ApiUser, Post, Profile, RawPost};

/// Root of the v1-era REST API.
pub const DEFAULT_API_BASE: &str = "http://api.twitter.com/1/";

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("no user id available")]
    MissingUserId,
    #[error("no response")]
    EmptyResponse,
    #[error("Twitter API: {0}")]
    Api(String),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Query parameters applied to every timeline fetch.
///
/// Supplied once at construction and immutable afterwards. A non-empty
/// caller-supplied set replaces the defaults wholesale; an empty set keeps
/// them. Parameters are appended to the request in insertion order.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    params: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            params: vec![
                ("count".into(), "20".into()),
                ("include_rts".into(), "1".into()),
            ],
        }
    }
}

impl RequestOptions {
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if params.is_empty() {
            Self::default()
        } else {
            Self { params }
        }
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Client for one account's profile and timeline.
#[derive(Debug)]
pub struct TimelineReader {
    http: HttpClient,
    options: RequestOptions,
    profile: Profile,
    raw_timeline: Vec<RawPost>,
    timeline: Vec<Post>,
}

impl Default for TimelineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineReader {
    /// Reader with the default timeline options (`count=20`, `include_rts=1`).
    pub fn new() -> Self {
        Self::with_options(RequestOptions::default())
    }

    pub fn with_options(options: RequestOptions) -> Self {
        let http = HttpClient::new(DEFAULT_API_BASE).expect("api base url");
        Self {
            http,
            options,
            profile: Profile::default(),
            raw_timeline: Vec::new(),
            timeline: Vec::new(),
        }
    }

    /// Point the reader at a different API root (tests, proxies).
    pub fn with_api_base(mut self, base: &str) -> Result<Self, TimelineError> {
        self.http = HttpClient::new(base)?;
        Ok(self)
    }

    /// Fetch the profile for a display handle.
    ///
    /// The stored `screen_name` is the sanitized *input*, preserving the
    /// caller's casing; only the request lowercases it.
    pub async fn fetch_profile_by_screen_name(
        &mut self,
        screen_name: &str,
    ) -> Result<&mut Self, TimelineError> {
        let screen_name = sanitize(screen_name);
        let started = Instant::now();
        tracing::info!(
            target: "social.twitter",
            screen_name = %screen_name,
            "twitter.user.start"
        );

        let query: Vec<(&str, Cow<'_, str>)> = vec![
            ("screen_name", screen_name.to_lowercase().into()),
            ("include_entities", "true".into()),
        ];
        let body = self
            .http
            .get_text(
                "users/show.json",
                RequestOpts {
                    query: Some(query),
                    ..Default::default()
                },
            )
            .await?;

        let user = match decode_user(&body) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(
                    target: "social.twitter",
                    screen_name = %screen_name,
                    error = %e,
                    "twitter.user.error"
                );
                return Err(e);
            }
        };

        let id = user.id.clone().unwrap_or_default();
        self.profile = build_profile(user, screen_name, id);
        tracing::info!(
            target: "social.twitter",
            user_id = %self.profile.id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "twitter.user.success"
        );
        Ok(self)
    }

    /// Fetch the profile for a numeric id (as a decimal string).
    ///
    /// The stored id is the caller-supplied one reformatted as a decimal
    /// string; the handle comes from the response since the caller supplied
    /// none.
    pub async fn fetch_profile_by_id(&mut self, id: &str) -> Result<&mut Self, TimelineError> {
        let id = sanitize(id);
        tracing::info!(target: "social.twitter", user_id = %id, "twitter.user.start");

        let query: Vec<(&str, Cow<'_, str>)> = vec![
            ("user_id", Cow::from(id.clone())),
            ("include_entities", "true".into()),
        ];
        let body = self
            .http
            .get_text(
                "users/show.json",
                RequestOpts {
                    query: Some(query),
                    ..Default::default()
                },
            )
            .await?;

        let user = decode_user(&body)?;
        let screen_name = user.screen_name.clone().unwrap_or_default();
        self.profile = build_profile(user, screen_name, reformat_id(&id));
        tracing::info!(target: "social.twitter", user_id = %self.profile.id, "twitter.user.success");
        Ok(self)
    }

    /// Fetch the timeline for the loaded profile, filter replies, keep
    /// reposts, and append to the accumulated sequences.
    pub async fn fetch_timeline(&mut self) -> Result<&mut Self, TimelineError> {
        if self.profile.id.is_empty() {
            return Err(TimelineError::MissingUserId);
        }

        let mut query: Vec<(&str, Cow<'_, str>)> =
            vec![("user_id", Cow::from(self.profile.id.clone()))];
        for (key, value) in self.options.params() {
            query.push((key.as_str(), Cow::from(value.as_str())));
        }

        let body = self
            .http
            .get_text(
                "statuses/user_timeline.json",
                RequestOpts {
                    query: Some(query),
                    ..Default::default()
                },
            )
            .await?;

        let posts = decode_timeline(&body)?;
        tracing::debug!(
            target: "social.twitter",
            user_id = %self.profile.id,
            count = posts.len(),
            "twitter.timeline.decoded"
        );
        self.ingest(posts);
        Ok(self)
    }

    /// Project decoded posts into the accumulated sequences. The counter is
    /// re-seeded from the profile's total status count on every call and
    /// decremented once per raw post, skipped replies included.
    fn ingest(&mut self, posts: Vec<RawPost>) {
        let mut counter = self.profile.statuses_count;
        for post in posts {
            if post.in_reply_to_status_id.is_none() {
                self.timeline.push(Post {
                    favorited: post.favorited,
                    created_at: parse_created_at(&post.created_at),
                    text: process_text(&post.text),
                    hashtags: extract_tags(&post.text),
                    counter,
                    id: post.id.clone(),
                    source: post.source.clone(),
                    in_reply_to_status_id: None,
                });
            }
            counter -= 1;
            self.raw_timeline.push(post);
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Filtered, enriched posts accumulated across timeline fetches.
    pub fn timeline(&self) -> &[Post] {
        &self.timeline
    }

    /// Posts exactly as decoded, accumulated across timeline fetches.
    pub fn raw_timeline(&self) -> &[RawPost] {
        &self.raw_timeline
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }
}

/// Transport-safety sanitization: trim, drop control and other
/// non-printable characters. Display escaping happens later and only for
/// timeline text.
fn sanitize(input: &str) -> String {
    input.trim().chars().filter(|c| !c.is_control()).collect()
}

/// Render a caller-supplied id as a plain decimal string, guarding against
/// exponential notation without losing precision on long ids.
fn reformat_id(id: &str) -> String {
    if let Ok(n) = id.parse::<u64>() {
        return n.to_string();
    }
    if let Ok(f) = id.parse::<f64>() {
        return format!("{f:.0}");
    }
    id.to_string()
}

/// Dates on the wire look like `Wed Aug 27 13:08:45 +0000 2008`.
/// Unparseable input normalizes to the zero default.
fn parse_created_at(raw: &str) -> i64 {
    DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y")
        .map(|dt| dt.timestamp())
        .unwrap_or_default()
}

/// Message carried by a payload-level `error` field, if any.
fn api_error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_user(body: &str) -> Result<ApiUser, TimelineError> {
    if body.is_empty() {
        return Err(TimelineError::EmptyResponse);
    }
    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = api_error_message(&value) {
        return Err(TimelineError::Api(message));
    }
    Ok(serde_json::from_value(value)?)
}

fn decode_timeline(body: &str) -> Result<Vec<RawPost>, TimelineError> {
    if body.is_empty() {
        return Err(TimelineError::EmptyResponse);
    }
    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = api_error_message(&value) {
        return Err(TimelineError::Api(message));
    }
    Ok(serde_json::from_value(value)?)
}

fn build_profile(user: ApiUser, screen_name: String, id: String) -> Profile {
    Profile {
        favourites_count: user.favourites_count.unwrap_or_default(),
        description: user.description.unwrap_or_default(),
        listed_count: user.listed_count.unwrap_or_default(),
        url: user.url.unwrap_or_default(),
        time_zone: user.time_zone.unwrap_or_default(),
        lang: user.lang.unwrap_or_default(),
        created_at: user
            .created_at
            .as_deref()
            .map(parse_created_at)
            .unwrap_or_default(),
        location: user.location.unwrap_or_default(),
        followers_count: user.followers_count.unwrap_or_default(),
        friends_count: user.friends_count.unwrap_or_default(),
        name: user.name.unwrap_or_default(),
        screen_name,
        id,
        statuses_count: user.statuses_count.unwrap_or_default(),
        utc_offset: user.utc_offset.unwrap_or_default(),
    }
}
