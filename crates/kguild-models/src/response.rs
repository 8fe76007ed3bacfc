use serde::{Deserialize, Serialize};

/// The envelope every KoreanBots v2 response is wrapped in.
///
/// Successful responses carry `data`, failed ones carry `message`
/// (and sometimes both are missing, e.g. on a bare `{}`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
}

/// A response that was well-formed, but had nothing in it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("response {code} carries no data")]
pub struct MissingData {
    pub code: u16,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the payload, failing if the API didn't send any.
    pub fn into_data(self) -> Result<T, MissingData> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(MissingData {
                code: self.code,
                message: self.message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::vote::Vote;

    use super::*;

    #[test]
    fn envelope_with_data() {
        let response: ApiResponse<Vote> = serde_json::from_str(
            r#"{"code": 200, "data": {"voted": true, "lastVote": 1620000000000}, "version": 2}"#,
        )
        .unwrap();

        assert_eq!(response.version, Some(2));
        assert!(response.into_data().unwrap().voted);
    }

    #[test]
    fn envelope_without_data() {
        let response: ApiResponse<Vote> =
            serde_json::from_str(r#"{"code": 404, "message": "Not Found"}"#).unwrap();

        assert_eq!(
            response.into_data(),
            Err(MissingData {
                code: 404,
                message: Some("Not Found".to_string())
            })
        );
    }

    #[test]
    fn empty_object_is_not_an_envelope() {
        assert!(serde_json::from_str::<ApiResponse<Vote>>("{}").is_err());
    }

    fn decode<T: serde::de::DeserializeOwned>(body: &str) -> serde_json::Result<ApiResponse<T>> {
        serde_json::from_str(body)
    }

    #[test]
    fn payload_needs_no_default() {
        let vote = decode::<Vote>(r#"{"code": 200, "data": {"voted": false, "lastVote": 0}}"#)
            .unwrap()
            .into_data()
            .unwrap();
        assert!(!vote.voted);

        let missing = decode::<Vote>(r#"{"code": 200}"#).unwrap().into_data();
        assert!(missing.is_err());
    }

    #[test]
    fn missing_data_display() {
        let err = MissingData {
            code: 200,
            message: None,
        };
        assert_eq!(err.to_string(), "response 200 carries no data");
    }
}
