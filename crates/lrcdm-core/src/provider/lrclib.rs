//! LRCLIB `/api/get` client.
//!
//! Uses the curl crate for the request itself; callers run it through
//! `spawn_blocking` via [`LrclibClient::get_lyrics`]. Responses are matched
//! on status and mapped to a lyrics variant or a typed [`FetchError`].

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::FetchError;
use crate::config::LrcdmConfig;
use crate::lyrics::strip_timestamps;

const USER_AGENT: &str = concat!("lrcdm v", env!("CARGO_PKG_VERSION"), " (https://github.com/lrcdm/lrcdm)");

/// Successful lookup result, reduced to what the downloader acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum LyricsResponse {
    /// Synced `.lrc` body plus its plain-text rendition.
    Synced { synced: String, plain: String },
    Plain(String),
    Instrumental,
    /// 200/404 with no usable lyrics of any kind.
    None,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    plain_lyrics: Option<String>,
    synced_lyrics: Option<String>,
    #[serde(default)]
    instrumental: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawError {
    error: Option<String>,
    message: Option<String>,
}

/// Client for one LRCLIB instance.
#[derive(Debug, Clone)]
pub struct LrclibClient {
    instance: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl LrclibClient {
    pub fn new(cfg: &LrcdmConfig) -> Self {
        Self {
            instance: cfg.lrclib_instance.trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
        }
    }

    fn get_url(&self, title: &str, album: &str, artist: &str, duration_secs: f64) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/api/get", self.instance))
            .map_err(|e| FetchError::Network(format!("bad instance URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("artist_name", artist)
            .append_pair("track_name", title)
            .append_pair("album_name", album)
            .append_pair("duration", &format!("{}", duration_secs.round()));
        Ok(url)
    }

    /// Look up lyrics for one track. Blocking HTTP runs on the blocking pool.
    pub async fn get_lyrics(
        &self,
        title: &str,
        album: &str,
        artist: &str,
        duration_secs: f64,
    ) -> Result<LyricsResponse, FetchError> {
        let url = self.get_url(title, album, artist, duration_secs)?;
        let connect_timeout = self.connect_timeout;
        let request_timeout = self.request_timeout;

        let (status, body) = tokio::task::spawn_blocking(move || {
            http_get(url.as_str(), connect_timeout, request_timeout)
        })
        .await
        .map_err(|e| FetchError::Network(format!("request task join: {}", e)))??;

        parse_get_response(status, &body)
    }
}

/// Perform a plain GET, returning status code and body bytes.
fn http_get(
    url: &str,
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<(u32, Vec<u8>), FetchError> {
    curl_get(url, connect_timeout, request_timeout)
        .map_err(|e| FetchError::Network(e.to_string()))
}

fn curl_get(
    url: &str,
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<(u32, Vec<u8>), curl::Error> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.useragent(USER_AGENT)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(request_timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok((status, body))
}

/// Map one `/api/get` response to a lyrics variant or error.
fn parse_get_response(status: u32, body: &[u8]) -> Result<LyricsResponse, FetchError> {
    match status {
        200 => {
            let raw: RawResponse = serde_json::from_slice(body)
                .map_err(|e| FetchError::Network(format!("malformed response body: {}", e)))?;
            Ok(reduce_raw(raw))
        }
        404 => Ok(LyricsResponse::None),
        _ => {
            let raw: RawError = serde_json::from_slice(body).unwrap_or(RawError {
                error: None,
                message: None,
            });
            Err(FetchError::Api {
                error: raw.error.unwrap_or_else(|| format!("HTTP {}", status)),
                message: raw
                    .message
                    .unwrap_or_else(|| "unknown error happened".to_string()),
            })
        }
    }
}

fn reduce_raw(raw: RawResponse) -> LyricsResponse {
    match raw.synced_lyrics {
        Some(synced) if !synced.is_empty() => {
            let plain = match raw.plain_lyrics {
                Some(plain) if !plain.is_empty() => plain,
                _ => strip_timestamps(&synced),
            };
            LyricsResponse::Synced { synced, plain }
        }
        _ => match raw.plain_lyrics {
            Some(plain) if !plain.is_empty() => LyricsResponse::Plain(plain),
            _ => {
                if raw.instrumental {
                    LyricsResponse::Instrumental
                } else {
                    LyricsResponse::None
                }
            }
        },
    }
}
