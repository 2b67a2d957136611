use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use scraper::Html;
use tokio::sync::MutexGuard;
use tracing::{debug, info};
use url::Url;

use crate::creds::Creds;
use crate::error::{AuthError, Error, Result};
use crate::portal::*;
use crate::rate_limit::RateLimited;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Pause before every request.
    pub request_delay: Duration,
    /// Per-request transport timeout.
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }
}

/// A SAUCE portal client. `Client<Init>` can read public pages; [`Client::login`] turns it into a
/// `Client<Auth>` whose cookie jar carries the single-sign-on session.
#[derive(Debug)]
pub struct Client<State: ClientState> {
    client: RateLimited<HttpClient>,
    portal: Portal,
    _state: State,
}

impl<State: ClientState> Client<State> {
    pub fn portal(&self) -> &Portal {
        &self.portal
    }

    async fn http_client(&self) -> MutexGuard<'_, HttpClient> {
        self.client.get().await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        info!(%url, %method, "preparing SAUCE request");

        self.http_client().await.request(method, url)
    }

    async fn fetch(&self, url: &Url) -> Result<Response> {
        let request = self
            .request(Method::GET, url.clone())
            .await
            .header("Accept", "text/html");
        request
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|source| Error::Fetch {
                url: url.clone(),
                source,
            })
    }

    /// GETs a page and parses it. Any status other than success is an error; there are no retries.
    pub async fn get_html(&self, url: &Url) -> Result<Html> {
        let response = self.fetch(url).await?;
        let text = response.text().await.map_err(|source| Error::Fetch {
            url: url.clone(),
            source,
        })?;
        Ok(Html::parse_document(&text))
    }
}

impl Client<Init> {
    pub fn new(portal: Portal, settings: &ClientSettings) -> Result<Self> {
        let client = HttpClient::builder()
            .cookie_store(true)
            .timeout(settings.timeout)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self {
            client: RateLimited::new(client, settings.request_delay),
            portal,
            _state: Init,
        })
    }

    /// Runs the SAML handshake: follow the login entry point to the identity provider's form, post
    /// the credentials there, and relay the returned assertion to the portal's assertion consumer.
    #[tracing::instrument(skip_all, fields(username = creds.username()))]
    pub async fn login(self, creds: &Creds) -> Result<Client<Auth>> {
        let form_target = self.identity_provider_form().await?;
        debug!(%form_target, "resolved identity provider form");

        let assertion = self.post_credentials(form_target, creds).await?;
        self.relay_assertion(&assertion).await?;
        info!("logged in");

        Ok(Client {
            client: self.client,
            portal: self.portal,
            _state: Auth,
        })
    }

    async fn identity_provider_form(&self) -> Result<Url> {
        let request = self.request(Method::GET, self.portal.login_url()?).await;
        let response = request.send().await.map_err(AuthError::Transport)?;
        Ok(response.url().clone())
    }

    async fn post_credentials(&self, form_target: Url, creds: &Creds) -> Result<String> {
        let username = format!("{}{LOGIN_DOMAIN_SUFFIX}", creds.username());
        let login_data = {
            let mut login_data = HashMap::new();
            login_data.insert(USERNAME_FIELD, username.as_str());
            login_data.insert(PASSWORD_FIELD, creds.password());
            login_data.insert(KEEP_SIGNED_IN_FIELD, "true");
            login_data.insert(AUTH_METHOD_FIELD, AUTH_METHOD);
            login_data
        };

        let request = self
            .request(Method::POST, form_target)
            .await
            .form(&login_data);
        let response = request.send().await.map_err(AuthError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::Rejected { status }.into());
        }

        let body = response.text().await.map_err(AuthError::Transport)?;
        Ok(saml_assertion(&body)?)
    }

    async fn relay_assertion(&self, assertion: &str) -> Result<()> {
        let url = self.portal.assertion_consumer_url()?;
        let request = self
            .request(Method::POST, url)
            .await
            .form(&[(SAML_RESPONSE_FIELD, assertion)]);
        let response = request.send().await.map_err(AuthError::Transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthError::RelayRejected { status }.into())
        }
    }
}

impl Client<Auth> {
    /// GETs raw bytes, e.g. a submission's source file.
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.fetch(url).await?;
        let bytes = response.bytes().await.map_err(|source| Error::Fetch {
            url: url.clone(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

/// The identity provider answers a successful login with an auto-submitting form whose hidden
/// `SAMLResponse` field holds the assertion.
fn saml_assertion(body: &str) -> Result<String, AuthError> {
    Html::parse_document(body)
        .select(&SAML_RESPONSE_INPUT)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(ToOwned::to_owned)
        .ok_or(AuthError::MissingAssertion)
}

#[derive(Debug)]
pub struct Init;
#[derive(Debug)]
pub struct Auth;

pub trait ClientState {}
impl ClientState for Init {}
impl ClientState for Auth {}
