//! Query-scoped response cache. Each fetch stores a result set under the
//! exact query it was issued with; nothing here is a shared "currently
//! loaded list", and a failed refresh never disturbs what a previous
//! successful fetch stored.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use promotrack_core::domain::request::{PromotionRequest, RequestId};

use crate::api::RequestQuery;

#[derive(Clone, Debug)]
pub struct CachedListing {
    pub requests: Vec<PromotionRequest>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<RequestQuery, CachedListing>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &RequestQuery) -> Option<CachedListing> {
        self.entries.lock().expect("cache lock").get(query).cloned()
    }

    /// Called only after a successful fetch.
    pub fn store(&self, query: RequestQuery, requests: Vec<PromotionRequest>) {
        let mut entries = self.entries.lock().expect("cache lock");
        entries.insert(query, CachedListing { requests, fetched_at: Utc::now() });
    }

    /// Replaces one request across every cached listing that contains it.
    /// Used when the server returns an updated request after a transition;
    /// listings that never contained the request are left untouched.
    pub fn upsert_request(&self, updated: &PromotionRequest) {
        let mut entries = self.entries.lock().expect("cache lock");
        for listing in entries.values_mut() {
            for request in &mut listing.requests {
                if request.id == updated.id {
                    *request = updated.clone();
                }
            }
        }
    }

    /// Drops a deleted request from every cached listing.
    pub fn remove_request(&self, id: &RequestId) {
        let mut entries = self.entries.lock().expect("cache lock");
        for listing in entries.values_mut() {
            listing.requests.retain(|request| &request.id != id);
        }
    }

    pub fn invalidate(&self, query: &RequestQuery) {
        self.entries.lock().expect("cache lock").remove(query);
    }

    pub fn clear(&self) {
        self.entries.lock().expect("cache lock").clear();
    }

    /// Looks a request up in any cached listing.
    pub fn find_request(&self, id: &RequestId) -> Option<PromotionRequest> {
        let entries = self.entries.lock().expect("cache lock");
        entries
            .values()
            .flat_map(|listing| listing.requests.iter())
            .find(|request| &request.id == id)
            .cloned()
    }
}
