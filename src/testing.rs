//! Scripted test doubles for the driver, asset store and sink.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::driver::{PageDriver, Script, ScriptKind};
use crate::error::{AppError, Result};
use crate::services::{AssetStore, SeedRegistry};
use crate::storage::{CatalogSink, Record, SinkSummary};
use crate::utils::Interrupt;

/// Canned answers for one URL.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    answers: HashMap<ScriptKind, Value>,
    color_answers: HashMap<String, HashMap<ScriptKind, Value>>,
    failures: HashSet<ScriptKind>,
    controls: HashMap<String, String>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, kind: ScriptKind, value: Value) -> Self {
        self.answers.insert(kind, value);
        self
    }

    /// Answer used once `color` has been clicked.
    pub fn color_answer(mut self, color: &str, kind: ScriptKind, value: Value) -> Self {
        self.color_answers
            .entry(color.to_string())
            .or_default()
            .insert(kind, value);
        self
    }

    pub fn failing(mut self, kind: ScriptKind) -> Self {
        self.failures.insert(kind);
        self
    }

    /// Clicking `selector` selects `color`.
    pub fn clickable(mut self, selector: &str, color: &str) -> Self {
        self.controls.insert(selector.to_string(), color.to_string());
        self
    }
}

#[derive(Default)]
struct DriverState {
    current: Option<String>,
    color: Option<String>,
    navigations: Vec<String>,
}

/// Browser stand-in that serves [`FakePage`]s by URL. Unknown URLs fail
/// to load; unanswered scripts yield `null`.
#[derive(Default)]
pub struct ScriptedDriver {
    pages: HashMap<String, FakePage>,
    interrupts: HashMap<String, Interrupt>,
    state: Mutex<DriverState>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Loading `url` behaves like Ctrl-C arriving mid-navigation.
    pub fn interrupt_on(mut self, url: &str, interrupt: Interrupt) -> Self {
        self.interrupts.insert(url.to_string(), interrupt);
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    fn current_page(&self) -> Result<(FakePage, Option<String>)> {
        let state = self.state.lock().unwrap();
        let url = state
            .current
            .as_ref()
            .ok_or_else(|| AppError::browser("no page loaded"))?;
        Ok((self.pages[url].clone(), state.color.clone()))
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.state.lock().unwrap().navigations.push(url.to_string());
        if let Some(interrupt) = self.interrupts.get(url) {
            interrupt.trigger();
            return Err(AppError::browser("navigation aborted"));
        }
        if !self.pages.contains_key(url) {
            return Err(AppError::timeout(format!("navigate {url}"), timeout.as_secs()));
        }

        let mut state = self.state.lock().unwrap();
        state.current = Some(url.to_string());
        state.color = None;
        Ok(())
    }

    async fn evaluate(&self, script: &Script) -> Result<Value> {
        let (page, color) = self.current_page()?;
        if page.failures.contains(&script.kind) {
            return Err(AppError::browser(format!("{:?} threw", script.kind)));
        }
        let by_color = color
            .and_then(|c| page.color_answers.get(&c))
            .and_then(|answers| answers.get(&script.kind));
        Ok(by_color
            .or_else(|| page.answers.get(&script.kind))
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        let (page, _) = self.current_page()?;
        match page.controls.get(selector) {
            Some(color) => {
                self.state.lock().unwrap().color = Some(color.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Asset store that records every attempt and answers
/// `https://assets.test/{folder}/{file}`.
#[derive(Default)]
pub struct FakeStore {
    uploads: Mutex<Vec<(String, String)>>,
    failing: HashSet<String>,
    fail_all: bool,
    delay: Option<Duration>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn failing_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// `(source_url, folder)` pairs in attempt order.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for FakeStore {
    async fn upload(&self, source_url: &str, folder: &str) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((source_url.to_string(), folder.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all || self.failing.contains(source_url) {
            return Err(AppError::upload("HTTP 500: upstream error"));
        }
        let file = source_url.rsplit('/').next().unwrap_or_default();
        Ok(format!("https://assets.test/{folder}/{file}"))
    }
}

#[derive(Default)]
struct MemoryState {
    existing: HashSet<String>,
    records: Vec<Record>,
    finalized: usize,
    fail_load: bool,
}

/// Sink that keeps records in memory; clones share state.
#[derive(Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(self, names: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .existing
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn failing_load(self) -> Self {
        self.state.lock().unwrap().fail_load = true;
        self
    }

    pub fn records(&self) -> Vec<Record> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn finalized(&self) -> usize {
        self.state.lock().unwrap().finalized
    }
}

#[async_trait]
impl CatalogSink for MemorySink {
    async fn load_existing(&mut self) -> Result<HashSet<String>> {
        let state = self.state.lock().unwrap();
        if state.fail_load {
            return Err(AppError::Io(std::io::Error::other("disk unavailable")));
        }
        Ok(state.existing.clone())
    }

    async fn commit(&mut self, record: Record) -> Result<()> {
        self.state.lock().unwrap().records.push(record);
        Ok(())
    }

    async fn finalize(&mut self, registry: &SeedRegistry) -> Result<SinkSummary> {
        let mut state = self.state.lock().unwrap();
        state.finalized += 1;
        Ok(SinkSummary {
            path: None,
            rows: state.records.len(),
            categories: registry.category_count(),
            colors: registry.color_count(),
        })
    }

    fn committed(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }
}
