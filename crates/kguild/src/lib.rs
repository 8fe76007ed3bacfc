pub extern crate kguild_http;
pub extern crate kguild_models;

pub use async_trait::async_trait;

use kguild_http::{HasHttp, Http, HttpError, HttpOptions};
use kguild_models::vote::Vote;
use tokio::runtime::Handle;

use self::model::{Bot, Guild, User};

pub mod model;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] HttpError),
}

pub type Result<T = ()> = std::result::Result<T, Error>;

/// Optional parameters of [`Client::new`].
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Server token issued by KoreanBots.
    pub token: Option<String>,
    /// Shared http session. A new one is made if missing.
    pub session: Option<reqwest::Client>,
    /// Runtime to associate with the client; defaults to the bot's,
    /// then to the one the client is created on.
    pub runtime: Option<Handle>,
    /// Api root, for self-hosted or mocked instances.
    pub root_url: Option<String>,
}

impl ClientOptions {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn session(mut self, session: reqwest::Client) -> Self {
        self.session = Some(session);
        self
    }

    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = Some(root_url.into());
        self
    }
}

/// A KoreanBots client bound to a bot and one of its guilds.
pub struct Client<B, G> {
    bot: B,
    guild: G,
    runtime: Option<Handle>,
    http: Http,
}

impl<B, G> Client<B, G>
where
    B: Bot,
    G: Guild,
{
    pub fn new(bot: B, guild: G, options: ClientOptions) -> Self {
        let ClientOptions {
            token,
            session,
            runtime,
            root_url,
        } = options;

        let runtime = runtime
            .or_else(|| bot.runtime())
            .or_else(|| Handle::try_current().ok());

        let http = Http::new(
            guild.id(),
            HttpOptions {
                token,
                client: session,
                root_url,
                version: None,
            },
        );

        tracing::debug!(guild = %guild.id(), has_runtime = runtime.is_some(), "created kguild client");

        Self {
            bot,
            guild,
            runtime,
            http,
        }
    }

    /// Checks whether `user` has hearted the guild.
    ///
    /// Same as calling [`Http::vote`] with the user's id.
    pub async fn vote(&self, user: &(impl User + ?Sized)) -> Result<Vote> {
        Ok(self.http.vote(user.id()).await?)
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn guild(&self) -> &G {
        &self.guild
    }

    pub fn token(&self) -> Option<&str> {
        self.http.token()
    }

    pub fn runtime(&self) -> Option<&Handle> {
        self.runtime.as_ref()
    }

    pub fn http(&self) -> &Http {
        &self.http
    }
}

impl<B, G> HasHttp for Client<B, G>
where
    B: Bot,
    G: Guild + Send + Sync,
{
    fn get_http(&self) -> &Http {
        &self.http
    }
}
