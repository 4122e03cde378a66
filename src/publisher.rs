//! publisher.rs — WordPress REST client for the two destination calls.
//!
//! `upload_image` downloads the cover and re-uploads it as a multipart
//! `POST /media`; `create_post` is a JSON `POST /posts`. Both authenticate
//! with HTTP Basic and expect 201. Posts are created as drafts so the
//! operator reviews them in wp-admin before they go live.

use anyhow::{anyhow, Context, Result as AnyResult};
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{RelayError, Result};

#[async_trait]
pub trait Publish: Send + Sync {
    /// Upload the image behind `image_url`; returns the destination media id.
    async fn upload_image(&self, image_url: &str, title: &str, description: &str) -> Result<u64>;

    /// Create a post referencing `featured_media`; returns the post id.
    async fn create_post(&self, title: &str, content: &str, featured_media: u64) -> Result<u64>;

    /// Operator-facing edit URL for a created post.
    fn edit_url(&self, post_id: u64) -> String;
}

pub struct WordPressPublisher {
    site_url: String,
    api_url: String,
    auth_header: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct PostRequest<'a> {
    title: &'a str,
    status: &'a str,
    content: &'a str,
    featured_media: u64,
}

#[derive(Deserialize)]
struct CreatedResponse {
    id: u64,
}

impl WordPressPublisher {
    pub fn new(site_url: &str, login: &str, password: &str, client: reqwest::Client) -> Self {
        let site_url = site_url.trim_end_matches('/').to_string();
        let token =
            base64::engine::general_purpose::STANDARD.encode(format!("{login}:{password}"));
        Self {
            api_url: format!("{site_url}/wp-json/wp/v2"),
            site_url,
            auth_header: format!("Basic {token}"),
            client,
        }
    }

    async fn download_cover(&self, image_url: &str) -> AnyResult<(String, Vec<u8>)> {
        let resp = self
            .client
            .get(image_url)
            .send()
            .await
            .context("cover download")?
            .error_for_status()
            .context("cover non-2xx")?;
        let filename = filename_from_url(image_url);
        let bytes = resp.bytes().await.context("cover body")?.to_vec();
        Ok((filename, bytes))
    }

    async fn post_media(
        &self,
        filename: String,
        bytes: Vec<u8>,
        title: &str,
        description: &str,
    ) -> AnyResult<u64> {
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename))
            .text("title", title.to_string())
            .text("alt_text", title.to_string())
            .text("caption", title.to_string())
            .text("description", description.to_string());

        let resp = self
            .client
            .post(format!("{}/media", self.api_url))
            .header(AUTHORIZATION, &self.auth_header)
            .multipart(form)
            .send()
            .await
            .context("media post")?;
        expect_created(resp).await.context("media response")
    }
}

async fn expect_created(resp: reqwest::Response) -> AnyResult<u64> {
    let status = resp.status();
    if status != StatusCode::CREATED {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("expected 201, got {status}: {}", snippet(&body)));
    }
    let created: CreatedResponse = resp.json().await.context("decoding id")?;
    Ok(created.id)
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

/// Basename of the URL path, used as the multipart filename.
fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let base = path.rsplit('/').next().unwrap_or("");
    if base.is_empty() {
        "cover.jpg".to_string()
    } else {
        base.to_string()
    }
}

#[async_trait]
impl Publish for WordPressPublisher {
    async fn upload_image(&self, image_url: &str, title: &str, description: &str) -> Result<u64> {
        let (filename, bytes) = self
            .download_cover(image_url)
            .await
            .map_err(|e| RelayError::ImageUpload(format!("{e:#}")))?;
        self.post_media(filename, bytes, title, description)
            .await
            .map_err(|e| RelayError::ImageUpload(format!("{e:#}")))
    }

    async fn create_post(&self, title: &str, content: &str, featured_media: u64) -> Result<u64> {
        let body = PostRequest {
            title,
            status: "draft",
            content,
            featured_media,
        };
        let send = async {
            let resp = self
                .client
                .post(format!("{}/posts", self.api_url))
                .header(AUTHORIZATION, &self.auth_header)
                .json(&body)
                .send()
                .await
                .context("post create")?;
            expect_created(resp).await.context("post response")
        };
        send.await.map_err(|e: anyhow::Error| RelayError::PostCreation {
            orphaned_media: None,
            message: format!("{e:#}"),
        })
    }

    fn edit_url(&self, post_id: u64) -> String {
        format!("{}/wp-admin/post.php?post={post_id}&action=edit", self.site_url)
    }
}
