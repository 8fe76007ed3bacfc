use std::{result::Result as StdResult, time::Duration};

use kguild_models::{
    id::GuildId,
    response::{ApiResponse, MissingData},
};
use reqwest::{header::HeaderMap, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("decoding: {0}")]
    Decoding(#[from] serde_json::Error),

    #[error("koreanbots responded with {status}: {}", api_message(.message))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("rate limited")]
    RateLimited {
        retry_after: Option<Duration>,
        /// Unix timestamp (seconds) at which the bucket resets.
        reset_at: Option<u64>,
    },

    #[error("{0}")]
    MissingData(#[from] MissingData),
}

pub type Result<T = ()> = StdResult<T, HttpError>;

fn api_message(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no message")
}

/// Authorization sent along with each request.
///
/// Vote checks work without a token, but KoreanBots may rate limit
/// anonymous requests more aggressively.
#[derive(Clone)]
pub enum HttpAuthentication {
    Anonymous,
    Token { token: String },
}

impl From<Option<String>> for HttpAuthentication {
    fn from(token: Option<String>) -> Self {
        match token {
            Some(token) => Self::Token { token },
            None => Self::Anonymous,
        }
    }
}

pub(crate) trait AuthExt: Sized {
    fn auth(self, auth: &HttpAuthentication) -> Self;
}

impl AuthExt for RequestBuilder {
    fn auth(self, auth: &HttpAuthentication) -> Self {
        match auth {
            HttpAuthentication::Anonymous => self,
            HttpAuthentication::Token { token } => self.header("Authorization", token),
        }
    }
}

pub const ROOT_LINK: &str = "https://koreanbots.dev/api";
pub const DEFAULT_VERSION: u8 = 2;

/// Construction parameters for [`Http`]. Every field is optional.
#[derive(Clone, Default)]
pub struct HttpOptions {
    /// Server token issued by KoreanBots.
    pub token: Option<String>,
    /// A client to share connections with; a new one is made if missing.
    pub client: Option<reqwest::Client>,
    /// Api root, without the version and without a trailing `/`.
    pub root_url: Option<String>,
    pub version: Option<u8>,
}

impl HttpOptions {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = Some(version);
        self
    }
}

/// Low-level KoreanBots client, bound to a single guild.
pub struct Http {
    guild_id: GuildId,
    auth: HttpAuthentication,
    client: reqwest::Client,
    root_url: String,
    version: u8,
    api_url: String,
}

macro_rules! ep {
    ($self:ident, $ep:literal $($args:tt)*) => {
        format!(concat!("{}", $ep), $self.api_url, $($args)*)
    };
}

pub(crate) mod impl_prelude {
    pub(crate) use super::{AuthExt, Http, Result};
}

pub mod servers;

impl Http {
    pub fn new(guild_id: GuildId, options: HttpOptions) -> Self {
        let HttpOptions {
            token,
            client,
            root_url,
            version,
        } = options;

        let root_url = root_url
            .as_deref()
            .unwrap_or(ROOT_LINK)
            .trim_end_matches('/')
            .to_string();
        let version = version.unwrap_or(DEFAULT_VERSION);
        let api_url = format!("{}/v{}", root_url, version);

        Self {
            guild_id,
            auth: HttpAuthentication::from(token),
            client: client.unwrap_or_default(),
            root_url,
            version,
            api_url,
        }
    }

    /// Like [`Http::new`], but talks to the api at `root_url` instead of [`ROOT_LINK`].
    pub fn new_with_url(guild_id: GuildId, options: HttpOptions, root_url: &str) -> Self {
        Self::new(
            guild_id,
            HttpOptions {
                root_url: Some(root_url.to_string()),
                ..options
            },
        )
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn token(&self) -> Option<&str> {
        match &self.auth {
            HttpAuthentication::Anonymous => None,
            HttpAuthentication::Token { token } => Some(token.as_str()),
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// The underlying session. Cloning it shares the connection pool.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Turns a raw response into the payload of its envelope.
    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let (retry_after, reset_at) = rate_limit_info(response.headers());
            tracing::warn!(?retry_after, ?reset_at, "rate limited by koreanbots");
            return Err(HttpError::RateLimited {
                retry_after,
                reset_at,
            });
        }

        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|it| it.message);
            tracing::warn!(%status, ?message, "koreanbots api error");
            return Err(HttpError::Api { status, message });
        }

        let envelope = serde_json::from_slice::<ApiResponse<T>>(&body)?;
        tracing::debug!(code = envelope.code, version = ?envelope.version, "got response");

        Ok(envelope.into_data()?)
    }
}

fn rate_limit_info(headers: &HeaderMap) -> (Option<Duration>, Option<u64>) {
    let parse = |name: &str| {
        headers
            .get(name)
            .and_then(|it| it.to_str().ok())
            .and_then(|it| it.trim().parse::<u64>().ok())
    };

    (
        parse("retry-after").map(Duration::from_secs),
        parse("x-ratelimit-reset"),
    )
}

pub trait HasHttp: Send + Sync {
    fn get_http(&self) -> &Http;
}

impl HasHttp for Http {
    fn get_http(&self) -> &Http {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let http = Http::new(GuildId::new(1), HttpOptions::default());

        assert_eq!(http.root_url(), ROOT_LINK);
        assert_eq!(http.version(), 2);
        assert_eq!(http.token(), None);
        assert_eq!(http.api_url, "https://koreanbots.dev/api/v2");
    }

    #[test]
    fn custom_root_and_version() {
        let http = Http::new_with_url(
            GuildId::new(1),
            HttpOptions::default().token("abc").version(3),
            "http://localhost:8080/api/",
        );

        assert_eq!(http.root_url(), "http://localhost:8080/api");
        assert_eq!(http.api_url, "http://localhost:8080/api/v3");
        assert_eq!(http.token(), Some("abc"));
    }

    #[test]
    fn api_error_display_has_message() {
        let err = HttpError::Api {
            status: StatusCode::NOT_FOUND,
            message: Some("Not Found".to_string()),
        };
        assert_eq!(err.to_string(), "koreanbots responded with 404 Not Found: Not Found");

        let err = HttpError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert_eq!(err.to_string(), "koreanbots responded with 502 Bad Gateway: no message");
    }

    #[test]
    fn rate_limit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", "3".parse().unwrap());
        headers.insert("x-ratelimit-reset", "1620000000".parse().unwrap());

        assert_eq!(
            rate_limit_info(&headers),
            (Some(Duration::from_secs(3)), Some(1620000000))
        );
        assert_eq!(rate_limit_info(&HeaderMap::new()), (None, None));
    }
}
