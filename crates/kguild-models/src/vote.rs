use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// https://koreanbots.dev/developers/docs (GET /servers/{id}/vote)

/// Whether a user has hearted (voted for) a server on KoreanBots.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct Vote {
    pub voted: bool,
    /// Time of the last vote; the API sends `0` for users who never voted.
    #[serde(
        rename = "lastVote",
        default,
        deserialize_with = "deserialize_last_vote",
        serialize_with = "serialize_last_vote"
    )]
    pub last_vote: Option<DateTime<Utc>>,
}

impl Vote {
    pub fn has_voted(&self) -> bool {
        self.voted
    }

    pub fn last_vote(&self) -> Option<DateTime<Utc>> {
        self.last_vote
    }
}

fn deserialize_last_vote<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        None | Some(0) => Ok(None),
        Some(millis) => Utc
            .timestamp_millis_opt(millis)
            .single()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", millis))),
    }
}

fn serialize_last_vote<S>(last_vote: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(last_vote.map_or(0, |it| it.timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voted() {
        let vote: Vote =
            serde_json::from_str(r#"{"voted": true, "lastVote": 1620000000000}"#).unwrap();

        assert!(vote.has_voted());
        assert_eq!(
            vote.last_vote(),
            Some(Utc.timestamp_millis_opt(1620000000000).unwrap())
        );
    }

    #[test]
    fn never_voted() {
        let zero: Vote = serde_json::from_str(r#"{"voted": false, "lastVote": 0}"#).unwrap();
        let null: Vote = serde_json::from_str(r#"{"voted": false, "lastVote": null}"#).unwrap();
        let absent: Vote = serde_json::from_str(r#"{"voted": false}"#).unwrap();

        assert_eq!(zero.last_vote, None);
        assert_eq!(zero, null);
        assert_eq!(null, absent);
    }

    #[test]
    fn voted_is_required() {
        assert!(serde_json::from_str::<Vote>("{}").is_err());
        assert!(serde_json::from_str::<Vote>(r#"{"lastVote": 0}"#).is_err());
    }
}
