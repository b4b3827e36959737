//! Test doubles for surfaces, permission gates and source enumeration.

use crate::capture::{CaptureSource, PermissionStatus, ScreenAccess, SourceEnumerator, SourceKind};
use crate::layer::Bounds;
use crate::surface::{CapturedFrame, Surface, SurfaceError, SurfaceKind};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadUrl(String),
    /// The page started by the last `LoadUrl` finished loading.
    PageLoaded,
    Execute(String),
    Evaluate(String),
    Bounds,
    SetBounds(Bounds),
    Reveal,
    Capture,
}

pub struct MockSurface {
    label: String,
    kind: SurfaceKind,
    calls: Mutex<Vec<(Instant, Call)>>,
    bounds: Mutex<Bounds>,
    frame: Mutex<Option<CapturedFrame>>,
    eval_result: Mutex<Value>,
    fail_scripts: Mutex<bool>,
    load_time: Mutex<Option<Duration>>,
}

impl MockSurface {
    pub fn new(label: &str, kind: SurfaceKind) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            kind,
            calls: Mutex::new(Vec::new()),
            bounds: Mutex::new(Bounds::new(-1300, 0, 1280, 720)),
            frame: Mutex::new(Some(solid_frame(4, 3))),
            eval_result: Mutex::new(Value::Null),
            fail_scripts: Mutex::new(false),
            load_time: Mutex::new(None),
        })
    }

    pub fn with_eval_result(self: Arc<Self>, value: Value) -> Arc<Self> {
        *self.eval_result.lock().unwrap() = value;
        self
    }

    /// `None` makes `capture` fail.
    pub fn with_frame(self: Arc<Self>, frame: Option<CapturedFrame>) -> Arc<Self> {
        *self.frame.lock().unwrap() = frame;
        self
    }

    /// Make `load_url` take `load_time` before the page reports loaded.
    pub fn with_load_time(self: Arc<Self>, load_time: Duration) -> Arc<Self> {
        *self.load_time.lock().unwrap() = Some(load_time);
        self
    }

    pub fn failing_scripts(self: Arc<Self>) -> Arc<Self> {
        *self.fail_scripts.lock().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }

    fn script_result(&self) -> Result<(), SurfaceError> {
        if *self.fail_scripts.lock().unwrap() {
            Err(SurfaceError::Script("ReferenceError: player is not defined".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Surface for MockSurface {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    async fn load_url(&self, url: &str) -> Result<(), SurfaceError> {
        self.record(Call::LoadUrl(url.to_string()));
        let load_time = *self.load_time.lock().unwrap();
        if let Some(load_time) = load_time {
            tokio::time::sleep(load_time).await;
            self.record(Call::PageLoaded);
        }
        Ok(())
    }

    async fn execute(&self, script: &str) -> Result<(), SurfaceError> {
        self.record(Call::Execute(script.to_string()));
        self.script_result()
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, SurfaceError> {
        self.record(Call::Evaluate(expression.to_string()));
        self.script_result()?;
        Ok(self.eval_result.lock().unwrap().clone())
    }

    async fn bounds(&self) -> Result<Bounds, SurfaceError> {
        self.record(Call::Bounds);
        Ok(*self.bounds.lock().unwrap())
    }

    async fn set_bounds(&self, bounds: Bounds) -> Result<(), SurfaceError> {
        self.record(Call::SetBounds(bounds));
        *self.bounds.lock().unwrap() = bounds;
        Ok(())
    }

    async fn reveal(&self) -> Result<(), SurfaceError> {
        self.record(Call::Reveal);
        Ok(())
    }

    async fn capture(&self) -> Result<CapturedFrame, SurfaceError> {
        self.record(Call::Capture);
        self.frame
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| SurfaceError::Snapshot("window is occluded".into()))
    }
}

pub fn solid_frame(width: u32, height: u32) -> CapturedFrame {
    CapturedFrame {
        width,
        height,
        data: [200u8, 30, 30, 255].repeat((width * height) as usize),
    }
}

pub struct MockScreenAccess {
    status: PermissionStatus,
    requests: AtomicUsize,
}

impl MockScreenAccess {
    pub fn new(status: PermissionStatus) -> Arc<Self> {
        Arc::new(Self {
            status,
            requests: AtomicUsize::new(0),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ScreenAccess for MockScreenAccess {
    fn status(&self) -> PermissionStatus {
        self.status
    }

    fn request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockSources {
    sources: Vec<CaptureSource>,
    calls: AtomicUsize,
}

impl MockSources {
    pub fn new(names: &[&str]) -> Arc<Self> {
        let sources = names
            .iter()
            .enumerate()
            .map(|(i, name)| CaptureSource {
                id: format!("window:{}", i + 1),
                name: name.to_string(),
                kind: SourceKind::Window,
                thumbnail: Some(solid_frame(600, 400)),
            })
            .collect();
        Arc::new(Self {
            sources,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceEnumerator for MockSources {
    async fn sources(&self) -> Result<Vec<CaptureSource>, SurfaceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.sources.clone())
    }
}
