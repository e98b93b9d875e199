//! Bounded FIFO response cache.
//!
//! # Design
//! Entries live in a `HashMap`; a `VecDeque` remembers insertion order.
//! When the map is full the front of the queue is evicted, regardless of
//! how recently that entry was read. There is no expiry by time.

use std::collections::{HashMap, VecDeque};

use crate::endpoints::Endpoint;
use crate::http::HttpResponse;
use crate::params::QueryParams;

pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Cache key of a call: `"{path}?{sorted query}"`.
pub fn cache_key(endpoint: &Endpoint, params: &QueryParams) -> String {
    format!("{}?{}", endpoint.path, params.canonical_string())
}

#[derive(Debug)]
pub struct RequestCache {
    capacity: usize,
    entries: HashMap<String, HttpResponse>,
    order: VecDeque<String>,
}

impl RequestCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &str) -> Option<&HttpResponse> {
        self.entries.get(key)
    }

    /// Store `response`, returning the key evicted to make room, if any.
    ///
    /// Replacing an existing key keeps its original insertion position.
    pub fn put(&mut self, key: String, response: HttpResponse) -> Option<String> {
        if self.capacity == 0 {
            return None;
        }
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = response;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.order.pop_front().inspect(|oldest| {
                self.entries.remove(oldest);
            })
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.entries.insert(key, response);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
