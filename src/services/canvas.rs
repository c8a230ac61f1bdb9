// src/services/canvas.rs

//! Canvas REST client.
//!
//! Fetches course collections page by page, following the `Link` header.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::LINK;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{Assignment, Config, File, Folder};
use crate::services::CourseSource;
use crate::utils::url::{course_api_url, next_page_link};

/// Items requested per page (Canvas caps this at 100).
const PAGE_SIZE: usize = 100;

/// Upper bound on pages followed for one collection.
const MAX_PAGES: usize = 200;

/// Canvas API client bound to a single course.
pub struct CanvasClient {
    client: Client,
    base_url: String,
    course_id: u64,
    token: String,
}

impl CanvasClient {
    /// Create a client for one course.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        course_id: u64,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            course_id,
            token: token.into(),
        }
    }

    /// Create a client for the configured course.
    pub fn from_config(config: &Config, client: Client, token: impl Into<String>) -> Self {
        Self::new(
            client,
            config.canvas.base_url.clone(),
            config.canvas.course_id,
            token,
        )
    }

    /// URL of the first page of a collection.
    fn first_page(&self, collection: &str) -> String {
        format!(
            "{}?per_page={}",
            course_api_url(&self.base_url, self.course_id, collection),
            PAGE_SIZE
        )
    }

    /// Fetch every page of a course collection.
    ///
    /// `null` entries in a page are dropped.
    async fn fetch_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let mut next = Some(self.first_page(collection));
        let mut items = Vec::new();
        let mut skipped = 0usize;
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(AppError::fetch(
                    collection,
                    format!("more than {MAX_PAGES} pages"),
                ));
            }

            log::debug!("GET {}", url);
            let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::fetch(
                    collection,
                    format!("{} {}", status, body.trim()),
                ));
            }

            next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_page_link);

            let page: Vec<Option<T>> = response.json().await?;
            for item in page {
                match item {
                    Some(item) => items.push(item),
                    None => skipped += 1,
                }
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} empty {} entries", skipped, collection);
        }
        log::debug!("Fetched {} {} over {} pages", items.len(), collection, pages);

        Ok(items)
    }
}

#[async_trait]
impl CourseSource for CanvasClient {
    async fn assignments(&self) -> Result<Vec<Assignment>> {
        self.fetch_all("assignments").await
    }

    async fn folders(&self) -> Result<Vec<Folder>> {
        self.fetch_all("folders").await
    }

    async fn files(&self) -> Result<Vec<File>> {
        self.fetch_all("files").await
    }
}
