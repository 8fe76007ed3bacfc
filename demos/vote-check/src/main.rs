//! Checks whether a user hearted a server on KoreanBots.
//!
//! Usage: `TOKEN=... GUILD_ID=... USER_ID=... cargo run -p vote-check`
//! Set `KOREANBOTS_API` to talk to another api root.

use kguild::model::{Bot, Guild, User};
use kguild::{Client, ClientOptions, Error};
use kguild_http::HttpError;
use kguild_models::id::{GuildId, UserId};
use tokio::runtime::Handle;

/// Stand-in for a framework's bot object.
struct MyBot {
    runtime: Handle,
}

impl Bot for MyBot {
    fn runtime(&self) -> Option<Handle> {
        Some(self.runtime.clone())
    }
}

struct MyGuild {
    id: GuildId,
    name: String,
}

impl Guild for MyGuild {
    fn id(&self) -> GuildId {
        self.id
    }
}

struct MyUser {
    id: UserId,
}

impl User for MyUser {
    fn id(&self) -> UserId {
        self.id
    }
}

fn env_id<T: std::str::FromStr>(name: &str) -> T {
    std::env::var(name)
        .ok()
        .and_then(|it| it.parse().ok())
        .unwrap_or_else(|| panic!("Cannot get {0}; set environment variable {0}=... and run again", name))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let guild = MyGuild {
        id: env_id("GUILD_ID"),
        name: "my server".to_string(),
    };
    let user = MyUser {
        id: env_id("USER_ID"),
    };

    let mut options = ClientOptions::default();
    if let Ok(token) = std::env::var("TOKEN") {
        options = options.token(token);
    }
    if let Ok(root_url) = std::env::var("KOREANBOTS_API") {
        options = options.root_url(root_url);
    }

    let bot = MyBot {
        runtime: Handle::current(),
    };
    let client = Client::new(bot, guild, options);

    let vote = match client.vote(&user).await {
        Ok(vote) => vote,
        Err(Error::Http(HttpError::RateLimited { retry_after, .. })) => {
            match retry_after {
                Some(after) => tracing::warn!("rate limited; try again in {}s", after.as_secs()),
                None => tracing::warn!("rate limited; try again later"),
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let name = &client.guild().name;
    match (vote.voted, vote.last_vote) {
        (true, Some(at)) => tracing::info!("{} hearted {} at {}", user.id, name, at),
        (true, None) => tracing::info!("{} hearted {}", user.id, name),
        (false, _) => tracing::info!("{} hasn't hearted {} yet", user.id, name),
    }

    Ok(())
}
