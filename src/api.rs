use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::account::{AccountUpdate, UserAccount};
use crate::config::ClientConfig;
use crate::profile::{PhotoRef, Profile, ProfileId};
use crate::{MatchdeckError, Result};

const LOG_PREFIX: &str = "[api]";

/// One record of `GET /users`, exactly as the backend sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawProfile {
    pub id: ProfileId,
    pub username: String,
    pub fullname: String,
    #[serde(default)]
    pub photo_data: Option<String>,
}

impl From<RawProfile> for Profile {
    fn from(raw: RawProfile) -> Self {
        let photo = PhotoRef::resolve(raw.photo_data.as_deref());
        Profile {
            id: raw.id,
            username: raw.username,
            fullname: raw.fullname,
            photo,
        }
    }
}

/// Where candidate profiles come from.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// All profiles, minus the one named by `exclude`.
    async fn fetch_profiles(
        &self,
        exclude: Option<&str>,
    ) -> Result<Vec<RawProfile>>;
}

/// Client of the dating backend REST API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: Url,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(config: &ClientConfig, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| MatchdeckError::Config(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            base: normalize_base(config.api_url.clone()),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /users[?exclude=<username>]`
    pub fn users_url(&self, exclude: Option<&str>) -> Result<Url> {
        let mut url = self.base.join("users")?;
        if let Some(username) = exclude {
            url.query_pairs_mut()
                .append_pair("exclude", username);
        }
        Ok(url)
    }

    /// `GET|PUT /user/<username>`
    pub fn user_url(&self, username: &str) -> Result<Url> {
        let mut url = self.base.join("user")?;
        url.path_segments_mut()
            .map_err(|_| MatchdeckError::Config("api_url can't be a base".to_owned()))?
            .push(username);
        Ok(url)
    }

    pub async fn fetch_account(&self, username: &str) -> Result<UserAccount> {
        let url = self.user_url(username)?;
        log::debug!("{} GET {}", LOG_PREFIX, url);
        let response = self.client.get(url.clone()).send().await?;
        decode(url, response).await
    }

    pub async fn update_account(
        &self,
        username: &str,
        update: &AccountUpdate,
    ) -> Result<()> {
        let url = self.user_url(username)?;
        log::debug!("{} PUT {}", LOG_PREFIX, url);
        let response = self
            .client
            .put(url.clone())
            .json(update)
            .send()
            .await?;
        check_status(&url, &response)?;
        Ok(())
    }
}

#[async_trait]
impl ProfileSource for HttpApi {
    async fn fetch_profiles(
        &self,
        exclude: Option<&str>,
    ) -> Result<Vec<RawProfile>> {
        let url = self.users_url(exclude)?;
        log::debug!("{} GET {}", LOG_PREFIX, url);
        let response = self.client.get(url.clone()).send().await?;
        decode(url, response).await
    }
}

fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn check_status(url: &Url, response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        log::warn!("{} {} answered {}", LOG_PREFIX, url, status);
        return Err(MatchdeckError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}

async fn decode<T: DeserializeOwned>(
    url: Url,
    response: reqwest::Response,
) -> Result<T> {
    check_status(&url, &response)?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
