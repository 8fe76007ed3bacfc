use kguild_models::{id::UserId, vote::Vote};

use super::impl_prelude::*;

#[derive(serde::Serialize)]
struct VoteQuery {
    #[serde(rename = "userID")]
    user_id: UserId,
}

impl Http {
    /// Checks whether `user_id` has hearted the guild this client is bound to.
    pub async fn vote(&self, user_id: UserId) -> Result<Vote> {
        tracing::debug!(
            guild = %self.guild_id,
            user = %user_id,
            version = self.version,
            "checking vote"
        );

        let response = self
            .client
            .get(ep!(self, "/servers/{}/vote" self.guild_id))
            .auth(&self.auth)
            .query(&VoteQuery { user_id })
            .send()
            .await?;

        Self::decode(response).await
    }
}
