//! Shared test fixtures: canned documents and a scripted provider

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::content::PostDetail;
use crate::error::{Error, Result};
use crate::provider::{Banner, Document, DocumentData, ListQuery, PostPage, Provider, RawBlock};

/// A well-formed provider document published on 2021-01-`day`
pub fn doc(id: &str, uid: &str, day: u32) -> Document {
    Document {
        id: id.to_string(),
        uid: Some(uid.to_string()),
        doc_type: "posts".to_string(),
        first_publication_date: Some(Utc.with_ymd_and_hms(2021, 1, day, 0, 0, 0).unwrap()),
        last_publication_date: Some(Utc.with_ymd_and_hms(2021, 1, day, 0, 0, 0).unwrap()),
        data: DocumentData {
            title: Some(format!("Post {}", uid)),
            subtitle: Some("sub".to_string()),
            author: Some("Jane".to_string()),
            banner: Some(Banner {
                url: "https://img.example/b.png".to_string(),
            }),
            content: Some(vec![RawBlock {
                heading: Some("Intro".to_string()),
                body: Vec::new(),
            }]),
        },
    }
}

/// A provider that replays queued responses and counts calls.
///
/// Page responses are shared between `list` and `next_page` since listing
/// tests only care about the sequence of fetches. An optional gate lets a
/// test hold a fetch in flight.
#[derive(Default)]
pub struct ScriptedProvider {
    pages: Mutex<VecDeque<Result<PostPage>>>,
    details: Mutex<VecDeque<Result<PostDetail>>>,
    pub page_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every page fetch until the returned handle is notified.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let provider = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (provider, gate)
    }

    pub fn push_page(&self, page: Result<PostPage>) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn push_detail(&self, detail: Result<PostDetail>) {
        self.details.lock().unwrap().push_back(detail);
    }

    fn next_page_response(&self) -> Result<PostPage> {
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Fetch("no scripted page response".to_string())))
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn list(&self, _query: ListQuery) -> Result<PostPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.next_page_response()
    }

    async fn next_page(&self, _token: &str) -> Result<PostPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.next_page_response()
    }

    async fn get_by_uid(&self, _type_tag: &str, uid: &str) -> Result<PostDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::NotFound(uid.to_string())))
    }
}
