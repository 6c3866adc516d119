//! Bounded cache of text measurements.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Default number of cached measurements
pub const MEASURE_CACHE_CAP: usize = 4096;

/// FIFO cache of advance widths keyed by `font + "\n" + text`
#[derive(Debug)]
pub struct MeasureCache {
    entries: HashMap<Rc<str>, f64>,
    order: VecDeque<Rc<str>>,
    max_entries: usize,
    scratch: String,
    hits: u64,
    misses: u64,
}

impl Default for MeasureCache {
    fn default() -> Self {
        Self::new(MEASURE_CACHE_CAP)
    }
}

impl MeasureCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            scratch: String::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn get(&mut self, font: &str, text: &str) -> Option<f64> {
        if self.max_entries == 0 {
            return None;
        }
        let key = Self::build_key(&mut self.scratch, font, text);
        let found = self.entries.get(key).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub fn insert(&mut self, font: &str, text: &str, width: f64) {
        if self.max_entries == 0 {
            return;
        }
        let key = Self::build_key(&mut self.scratch, font, text);
        if self.entries.contains_key(key) {
            return;
        }
        let key_rc: Rc<str> = key.into();
        self.entries.insert(Rc::clone(&key_rc), width);
        self.order.push_back(key_rc);
        self.enforce_cap();
    }

    /// Cached width, or `measure()` stored under the key.
    pub fn get_or_measure(&mut self, font: &str, text: &str, measure: impl FnOnce() -> f64) -> f64 {
        if let Some(width) = self.get(font, text) {
            return width;
        }
        let width = measure();
        self.insert(font, text, width);
        width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    fn build_key<'a>(scratch: &'a mut String, font: &str, text: &str) -> &'a str {
        scratch.clear();
        scratch.reserve(font.len() + 1 + text.len());
        scratch.push_str(font);
        scratch.push('\n');
        scratch.push_str(text);
        scratch.as_str()
    }

    fn enforce_cap(&mut self) {
        while self.entries.len() > self.max_entries {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}
