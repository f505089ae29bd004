//! Remote message source
//!
//! This module provides:
//! - The `MailSource` trait the engine fetches through
//! - An HTTP client for the paginated mail API
//! - Response normalization to domain models
//! - A scripted in-memory source for tests and offline use

mod client;
mod normalize;
mod source;
mod static_source;

pub use client::MailApiClient;
pub use normalize::normalize_email;
pub use source::MailSource;
pub use static_source::StaticSource;

/// Mail API response types
pub mod api {
    use serde::{Deserialize, Deserializer};

    /// Response from the list endpoint (`?page=N`)
    #[derive(Debug, Deserialize)]
    pub struct ListResponse {
        #[serde(default)]
        pub list: Vec<ApiEmail>,
        #[serde(default)]
        pub total: Option<u32>,
    }

    /// One message summary as the API encodes it
    #[derive(Debug, Deserialize)]
    pub struct ApiEmail {
        #[serde(deserialize_with = "string_or_number")]
        pub id: String,
        pub from: ApiSender,
        /// Milliseconds since the Unix epoch
        #[serde(default)]
        pub date: Option<i64>,
        #[serde(default)]
        pub subject: String,
        #[serde(default)]
        pub short_description: String,
        #[serde(default)]
        pub read: Option<bool>,
        #[serde(default)]
        pub favorite: Option<bool>,
    }

    /// Sender as the API encodes it
    #[derive(Debug, Deserialize)]
    pub struct ApiSender {
        pub email: String,
        #[serde(default)]
        pub name: Option<String>,
    }

    /// Response from the detail endpoint (`?id=X`)
    #[derive(Debug, Deserialize)]
    pub struct BodyResponse {
        #[serde(default, deserialize_with = "optional_string_or_number")]
        pub id: Option<String>,
        pub body: String,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    impl RawId {
        fn into_string(self) -> String {
            match self {
                RawId::Text(s) => s,
                RawId::Number(n) => n.to_string(),
            }
        }
    }

    /// Ids arrive as `"1"` from some deployments and `1` from others
    fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        RawId::deserialize(deserializer).map(RawId::into_string)
    }

    fn optional_string_or_number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(RawId::into_string))
    }

}
