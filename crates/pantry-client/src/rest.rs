use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use pantry_types::api::{ApiError, CommentCreate, FeedQuery, FlagUpdate, Page, UnreadCount};
use pantry_types::models::{
    ChatGroup, GroupId, Message, MessageBody, Notification, NotificationId, Post, PostId,
};

use crate::config::{ClientConfig, DEFAULT_PAGE_SIZE};
use crate::error::ClientError;

/// Notification and count endpoints answer fast or not at all.
pub const SHORT_TIMEOUT: Duration = Duration::from_secs(2);
/// Post and message endpoints carry heavier payloads.
pub const LONG_TIMEOUT: Duration = Duration::from_secs(10);

/// The REST calls the sync core depends on.
///
/// Contexts hold an `Arc<dyn Backend>` rather than [`Rest`] directly so
/// tests can drive them with a scripted fixture instead of a live server.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Page length the list calls are made with. Cursor bookkeeping uses
    /// this to detect exhaustion.
    fn page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    async fn chat_groups(&self, page: u32) -> Result<Page<ChatGroup>, ClientError>;
    async fn messages(&self, group: &GroupId, page: u32) -> Result<Page<Message>, ClientError>;
    async fn send_message(
        &self,
        group: &GroupId,
        body: &MessageBody,
    ) -> Result<Message, ClientError>;

    async fn notifications(&self, page: u32) -> Result<Page<Notification>, ClientError>;
    async fn unread_count(&self) -> Result<u32, ClientError>;
    async fn mark_read(&self, id: &NotificationId) -> Result<(), ClientError>;
    async fn mark_all_read(&self) -> Result<(), ClientError>;

    async fn posts(&self, page: u32, query: &FeedQuery) -> Result<Page<Post>, ClientError>;
    async fn liked_ids(&self) -> Result<Vec<PostId>, ClientError>;
    async fn saved_ids(&self) -> Result<Vec<PostId>, ClientError>;
    async fn shopping_list_ids(&self) -> Result<Vec<PostId>, ClientError>;
    async fn set_liked(&self, post: &PostId, active: bool) -> Result<(), ClientError>;
    async fn set_saved(&self, post: &PostId, active: bool) -> Result<(), ClientError>;
    async fn set_listed(&self, post: &PostId, active: bool) -> Result<(), ClientError>;
    async fn add_comment(&self, post: &PostId, text: &str) -> Result<(), ClientError>;
}

/// [`Backend`] over a live server: one `reqwest::Client` with the bearer
/// token as a default header, JSON in and out, normalized error bodies
/// decoded into [`ApiError`].
pub struct Rest {
    base_url: Url,
    client: reqwest::Client,
    page_size: usize,
}

impl Rest {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(&config.api_url).map_err(|e| ClientError::Config(e.to_string()))?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ClientError::Config("token is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            base_url,
            client,
            page_size: config.page_size,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Send, normalize errors, decode the 2xx body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        what: &'static str,
        timeout: Duration,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let res = req
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport(what, e))?;
        let res = check(what, res).await?;
        res.json().await.map_err(|e| transport(what, e))
    }

    /// Send, normalize errors, discard the 2xx body.
    async fn execute(
        &self,
        what: &'static str,
        timeout: Duration,
        req: reqwest::RequestBuilder,
    ) -> Result<(), ClientError> {
        let res = req
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport(what, e))?;
        check(what, res).await?;
        Ok(())
    }
}

/// Request-level timeouts become [`ClientError::Timeout`] so callers can
/// tell "slow" from "broken"; everything else stays a transport error.
fn transport(what: &'static str, err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout { what }
    } else {
        ClientError::Http(err)
    }
}

/// Non-2xx responses carry the backend's normalized error body. When that
/// body is missing or unparseable, synthesize one from the status line.
async fn check(
    what: &'static str,
    res: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.bytes().await.unwrap_or_default();
    let err = serde_json::from_slice::<ApiError>(&body).unwrap_or_else(|_| {
        ApiError::from_status(
            status.as_u16(),
            status.canonical_reason().unwrap_or("request failed"),
        )
    });
    debug!("{} rejected by backend: {}", what, err);
    Err(ClientError::Api(err))
}

#[async_trait]
impl Backend for Rest {
    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn chat_groups(&self, page: u32) -> Result<Page<ChatGroup>, ClientError> {
        let req = self
            .client
            .get(self.url("/groups")?)
            .query(&[("page", page as usize), ("limit", self.page_size)]);
        self.fetch("group list", LONG_TIMEOUT, req).await
    }

    async fn messages(&self, group: &GroupId, page: u32) -> Result<Page<Message>, ClientError> {
        let req = self
            .client
            .get(self.url(&format!("/groups/{}/messages", group))?)
            .query(&[("page", page as usize), ("limit", self.page_size)]);
        self.fetch("message page", LONG_TIMEOUT, req).await
    }

    async fn send_message(
        &self,
        group: &GroupId,
        body: &MessageBody,
    ) -> Result<Message, ClientError> {
        let req = self
            .client
            .post(self.url(&format!("/groups/{}/messages", group))?)
            .json(body);
        self.fetch("message send", LONG_TIMEOUT, req).await
    }

    async fn notifications(&self, page: u32) -> Result<Page<Notification>, ClientError> {
        let req = self
            .client
            .get(self.url("/notifications")?)
            .query(&[("page", page as usize), ("limit", self.page_size)]);
        self.fetch("notification list", SHORT_TIMEOUT, req).await
    }

    async fn unread_count(&self) -> Result<u32, ClientError> {
        let req = self.client.get(self.url("/notifications/unread-count")?);
        let counted: UnreadCount = self.fetch("unread count", SHORT_TIMEOUT, req).await?;
        Ok(counted.count)
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<(), ClientError> {
        let req = self
            .client
            .patch(self.url(&format!("/notifications/{}/read", id))?);
        self.execute("mark read", SHORT_TIMEOUT, req).await
    }

    async fn mark_all_read(&self) -> Result<(), ClientError> {
        let req = self.client.post(self.url("/notifications/read-all")?);
        self.execute("mark all read", SHORT_TIMEOUT, req).await
    }

    async fn posts(&self, page: u32, query: &FeedQuery) -> Result<Page<Post>, ClientError> {
        let req = self
            .client
            .get(self.url("/posts")?)
            .query(&[("page", page as usize), ("limit", self.page_size)])
            .query(query);
        self.fetch("post list", LONG_TIMEOUT, req).await
    }

    async fn liked_ids(&self) -> Result<Vec<PostId>, ClientError> {
        let req = self.client.get(self.url("/me/likes")?);
        self.fetch("liked ids", SHORT_TIMEOUT, req).await
    }

    async fn saved_ids(&self) -> Result<Vec<PostId>, ClientError> {
        let req = self.client.get(self.url("/me/saved")?);
        self.fetch("saved ids", SHORT_TIMEOUT, req).await
    }

    async fn shopping_list_ids(&self) -> Result<Vec<PostId>, ClientError> {
        let req = self.client.get(self.url("/me/shopping-list")?);
        self.fetch("shopping list ids", SHORT_TIMEOUT, req).await
    }

    async fn set_liked(&self, post: &PostId, active: bool) -> Result<(), ClientError> {
        let req = self
            .client
            .patch(self.url(&format!("/posts/{}/liked", post))?)
            .json(&FlagUpdate { active });
        self.execute("like toggle", LONG_TIMEOUT, req).await
    }

    async fn set_saved(&self, post: &PostId, active: bool) -> Result<(), ClientError> {
        let req = self
            .client
            .patch(self.url(&format!("/posts/{}/saved", post))?)
            .json(&FlagUpdate { active });
        self.execute("save toggle", LONG_TIMEOUT, req).await
    }

    async fn set_listed(&self, post: &PostId, active: bool) -> Result<(), ClientError> {
        let req = self
            .client
            .patch(self.url(&format!("/posts/{}/shopping-list", post))?)
            .json(&FlagUpdate { active });
        self.execute("shopping list toggle", LONG_TIMEOUT, req).await
    }

    async fn add_comment(&self, post: &PostId, text: &str) -> Result<(), ClientError> {
        let req = self
            .client
            .post(self.url(&format!("/posts/{}/comments", post))?)
            .json(&CommentCreate {
                text: text.to_owned(),
            });
        self.execute("comment create", LONG_TIMEOUT, req).await
    }
}
