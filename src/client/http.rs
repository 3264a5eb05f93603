//! HTTP client implementation for the HCB API.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::api::{
    CardGrantsService, DonationsService, InvitationsService, InvoicesService,
    OrganizationsService, ReceiptsService, SponsorsService, StripeCardsService,
    TerminalService, TransactionsService, TransfersService, UsersService,
};
use crate::auth::{OAuthCredentials, Session};
use crate::models::Attachable;
use crate::{Error, Result};

use super::config::ClientConfig;

/// The main client for interacting with the HCB API.
///
/// The client is a cheap handle around shared state; cloning it shares the
/// HTTP connection pool and the session. Entities decoded by the client keep
/// a clone so they can act on the API themselves.
///
/// # Example
///
/// ```no_run
/// use hcb_rs::{HcbClient, OAuthCredentials};
///
/// # async fn example() -> hcb_rs::Result<()> {
/// let client = HcbClient::from_credentials(OAuthCredentials::from_env()?)?;
///
/// let me = client.users().me().await?;
/// let orgs = client.organizations().list(&[]).await?;
///
/// if let Some(org) = orgs.first() {
///     let page = org.transactions(Default::default()).await?;
///     println!("{} has {} transactions", org.id, page.total_count.unwrap_or(0));
/// }
/// # Ok(())
/// # }
/// ```
pub struct HcbClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
}

impl HcbClient {
    /// Create a client around a static access token.
    ///
    /// The token is never refreshed; use [`from_credentials`](Self::from_credentials)
    /// for long-running processes.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_session(Session::new(access_token), ClientConfig::default())
    }

    /// Create a client with OAuth credentials that refresh on expiry.
    pub fn from_credentials(credentials: OAuthCredentials) -> Result<Self> {
        Self::from_credentials_with_config(credentials, ClientConfig::default())
    }

    /// Create a client with OAuth credentials and custom configuration.
    pub fn from_credentials_with_config(
        credentials: OAuthCredentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let session = Session::from_credentials(credentials, &config.base_url);
        Self::with_session(session, config)
    }

    /// Create a client from `HCB_*` environment variables.
    ///
    /// See [`OAuthCredentials::from_env`] and [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::from_credentials_with_config(OAuthCredentials::from_env()?, ClientConfig::from_env()?)
    }

    /// Create a new client with an existing session and custom configuration.
    pub fn with_session(session: Session, config: ClientConfig) -> Result<Self> {
        let config = config.validated()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                session,
                config,
            }),
        })
    }

    pub(crate) fn from_inner(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the users service.
    pub fn users(&self) -> UsersService {
        UsersService::new(self.inner.clone())
    }

    /// Get the organizations service.
    pub fn organizations(&self) -> OrganizationsService {
        OrganizationsService::new(self.inner.clone())
    }

    /// Get the transactions service.
    pub fn transactions(&self) -> TransactionsService {
        TransactionsService::new(self.inner.clone())
    }

    /// Get the card grants service.
    pub fn card_grants(&self) -> CardGrantsService {
        CardGrantsService::new(self.inner.clone())
    }

    /// Get the Stripe cards service.
    pub fn stripe_cards(&self) -> StripeCardsService {
        StripeCardsService::new(self.inner.clone())
    }

    /// Get the invoices service.
    pub fn invoices(&self) -> InvoicesService {
        InvoicesService::new(self.inner.clone())
    }

    /// Get the sponsors service.
    pub fn sponsors(&self) -> SponsorsService {
        SponsorsService::new(self.inner.clone())
    }

    /// Get the disbursement and ACH transfer service.
    pub fn transfers(&self) -> TransfersService {
        TransfersService::new(self.inner.clone())
    }

    /// Get the donations service.
    pub fn donations(&self) -> DonationsService {
        DonationsService::new(self.inner.clone())
    }

    /// Get the receipts service.
    pub fn receipts(&self) -> ReceiptsService {
        ReceiptsService::new(self.inner.clone())
    }

    /// Get the invitations service.
    pub fn invitations(&self) -> InvitationsService {
        InvitationsService::new(self.inner.clone())
    }

    /// Get the Stripe Terminal service.
    pub fn terminal(&self) -> TerminalService {
        TerminalService::new(self.inner.clone())
    }

    /// Build an attached stub of `T` that knows only its id.
    ///
    /// Useful to act on a resource without fetching it first:
    ///
    /// ```no_run
    /// use hcb_rs::models::CardGrant;
    ///
    /// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
    /// let grant = client.stub::<CardGrant>("cg_123").topup(5_000).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn stub<T: Attachable>(&self, id: impl Into<String>) -> T {
        T::of_id(id, Some(self.clone()))
    }

    /// Execute one request against an arbitrary API path.
    ///
    /// `path` is relative to the API prefix (e.g. `/user`). Use this for
    /// endpoints without a dedicated service method.
    pub async fn execute<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.inner.execute(method, path, query, body).await
    }

    /// Manually refresh the access token.
    pub async fn refresh_session(&self) -> Result<()> {
        self.inner.session.refresh().await
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    /// Ensure the access token is usable before making a request.
    ///
    /// This is the only place the held token is replaced.
    pub(crate) async fn ensure_session_valid(&self) -> Result<()> {
        if self.config.auto_refresh_session {
            let buffer = self.config.refresh_buffer()?;
            if self.session.expires_within(buffer).await {
                tracing::debug!("HCB access token expired; refreshing");
                self.session.refresh().await?;
            }
        }
        Ok(())
    }

    /// Build request headers with authentication.
    pub(crate) async fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let token = self.session.access_token().await;
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Execute one logical request: refresh if needed, send, decode.
    pub(crate) async fn execute<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.ensure_session_valid().await?;

        let url = self.config.endpoint(path);
        let headers = self.build_headers().await?;

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, "HCB request");
        let response = request.send().await?;
        self.handle_response(&method, path, response).await
    }

    /// Execute a multipart request (file uploads).
    pub(crate) async fn execute_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        self.ensure_session_valid().await?;

        let url = self.config.endpoint(path);
        let headers = self.build_headers().await?;

        tracing::debug!(%method, path, "HCB multipart request");
        let response = self
            .http
            .request(method.clone(), &url)
            .headers(headers)
            .multipart(form)
            .send()
            .await?;

        self.handle_response(&method, path, response).await
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, None::<&()>, None::<&()>).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        self.execute(Method::GET, path, Some(query), None::<&()>).await
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::POST, path, None::<&()>, Some(body)).await
    }

    /// Make a POST request without a body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::POST, path, None::<&()>, None::<&()>).await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::PATCH, path, None::<&()>, Some(body)).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::DELETE, path, None::<&()>, None::<&()>).await
    }

    /// Handle an API response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(%method, path, status = status.as_u16(), "HCB response");

        if status.is_success() {
            // 204 and other empty bodies decode as JSON null.
            let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
                b"null"
            } else {
                &bytes
            };
            Ok(serde_json::from_slice(payload)?)
        } else {
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_default();
            let err = Error::from_api_response(status.as_u16(), body);
            tracing::warn!(%method, path, error = %err, "HCB API error");
            Err(err)
        }
    }
}

impl Clone for HcbClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for HcbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HcbClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
