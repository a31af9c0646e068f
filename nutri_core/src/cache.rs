//! Bounded LRU cache for recipe browser query results.
//!
//! Owned by whoever holds the browsing session and dropped with it; entries
//! do not outlive that owner.

use std::collections::{HashMap, VecDeque};
use std::fmt;

/// What the recipe browser asked for
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecipeQuery {
    Search(String),
    Category(String),
}

impl RecipeQuery {
    /// Free-text search if `search` is non-blank, otherwise the category
    pub fn from_inputs(search: &str, category: &str) -> Self {
        let search = search.trim();
        if search.is_empty() {
            RecipeQuery::Category(category.trim().to_string())
        } else {
            RecipeQuery::Search(search.to_string())
        }
    }

    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RecipeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeQuery::Search(text) => write!(f, "search:{}", text),
            RecipeQuery::Category(name) => write!(f, "cat:{}", name),
        }
    }
}

/// Query results keyed by [`RecipeQuery::cache_key`], evicting the least
/// recently used entry once `capacity` is reached.
#[derive(Debug)]
pub struct QueryCache<V> {
    capacity: usize,
    entries: HashMap<String, V>,
    // Front is least recently used
    order: VecDeque<String>,
}

impl<V> QueryCache<V> {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    pub fn get(&mut self, query: &RecipeQuery) -> Option<&V> {
        let key = query.cache_key();
        if !self.entries.contains_key(&key) {
            return None;
        }
        self.touch(&key);
        self.entries.get(&key)
    }

    pub fn contains(&self, query: &RecipeQuery) -> bool {
        self.entries.contains_key(&query.cache_key())
    }

    /// Store results, returning the key that was evicted to make room
    pub fn insert(&mut self, query: &RecipeQuery, value: V) -> Option<String> {
        let key = query.cache_key();
        if self.entries.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return None;
        }

        self.order.push_back(key);
        if self.entries.len() <= self.capacity {
            return None;
        }

        let evicted = self.order.pop_front()?;
        self.entries.remove(&evicted);
        tracing::debug!("Evicted recipe cache entry {}", evicted);
        Some(evicted)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
