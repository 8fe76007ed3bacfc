//! Seams between kguild and whatever bot framework drives it.
//!
//! A framework only has to say what the id of its guild and user types is;
//! the id newtypes implement the traits themselves, so plain ids work too.

use std::sync::Arc;

use kguild_http::HasHttp;
use kguild_models::{
    id::{GuildId, UserId},
    vote::Vote,
};
use tokio::runtime::Handle;

use crate::Result;

/// The bot (connection) object of the host framework.
pub trait Bot: Send + Sync {
    /// The runtime the bot's event loop runs on, if the bot knows it.
    fn runtime(&self) -> Option<Handle> {
        None
    }
}

/// A guild (server) of the host framework.
pub trait Guild {
    fn id(&self) -> GuildId;
}

/// A user of the host framework.
pub trait User {
    fn id(&self) -> UserId;
}

impl Bot for () {}

impl Bot for Handle {
    fn runtime(&self) -> Option<Handle> {
        Some(self.clone())
    }
}

impl Guild for GuildId {
    fn id(&self) -> GuildId {
        *self
    }
}

impl User for UserId {
    fn id(&self) -> UserId {
        *self
    }
}

macro_rules! forward_impls {
    ($($wrapper:ty),*) => {
        $(
            impl<T: Bot + ?Sized> Bot for $wrapper {
                fn runtime(&self) -> Option<Handle> {
                    (**self).runtime()
                }
            }

            impl<T: Guild + ?Sized> Guild for $wrapper {
                fn id(&self) -> GuildId {
                    (**self).id()
                }
            }

            impl<T: User + ?Sized> User for $wrapper {
                fn id(&self) -> UserId {
                    (**self).id()
                }
            }
        )*
    };
}

forward_impls! {&T, Arc<T>, Box<T>}

#[async_trait::async_trait]
pub trait UserExt {
    /// Checks whether this user has hearted the guild `ctx` is bound to.
    async fn vote(&self, ctx: &impl HasHttp) -> Result<Vote>;
}

#[async_trait::async_trait]
impl<T> UserExt for T
where
    T: User + Sync + ?Sized,
{
    async fn vote(&self, ctx: &impl HasHttp) -> Result<Vote> {
        Ok(ctx.get_http().vote(self.id()).await?)
    }
}
