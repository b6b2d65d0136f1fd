//! CI webhook events and workflow status aggregation.
//!
//! Events live in a single JSON array file that an ingestion process appends
//! to. Reads here are best-effort: an absent, empty, half-written, or otherwise
//! malformed file reads as "no events" instead of failing the caller.
//!
//! Layout of one stored event (only `event` and `workflow_run` are
//! interpreted; every other field is carried through untouched):
//!
//! ```json
//! {
//!   "event": "workflow_run",
//!   "workflow_run": {
//!     "name": "ci", "status": "completed", "conclusion": "success",
//!     "run_number": 42, "updated_at": "2024-01-02T00:00:00Z",
//!     "html_url": "https://github.com/org/repo/actions/runs/1"
//!   },
//!   "received_at": "2024-01-02T00:00:01Z"
//! }
//! ```

use crate::error::{PrAgentError, Result};
use crate::io;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The `workflow_run` payload of an event. All fields are optional on the
/// wire; GitHub sends `conclusion: null` while a run is in progress.
///
/// Fields are decoded one at a time, so a single oddly typed field (a string
/// `run_number`, a numeric timestamp) does not drop the whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowRun {
    pub name: Option<String>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub run_number: Option<u64>,
    pub updated_at: Option<String>,
    pub html_url: Option<String>,
}

impl WorkflowRun {
    /// Decode a run from its JSON object. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let text = |key: &str| match fields.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Some(v.to_string()),
            _ => None,
        };
        let run_number = match fields.get("run_number") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        Some(Self {
            name: text("name"),
            status: text("status"),
            conclusion: text("conclusion"),
            run_number,
            updated_at: text("updated_at"),
            html_url: text("html_url"),
        })
    }
}

/// One stored webhook event. Serializes back to exactly the stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct CiEvent {
    pub event_kind: Option<String>,
    pub workflow_run: Option<WorkflowRun>,
    raw: Map<String, Value>,
}

impl CiEvent {
    /// Interpret a stored JSON value. Returns `None` for anything that is not
    /// an object. A `workflow_run` field that does not look like a run is
    /// kept in the raw fields but not interpreted.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(raw) = value else {
            return None;
        };
        let event_kind = raw.get("event").and_then(Value::as_str).map(str::to_owned);
        let workflow_run = match raw.get("workflow_run") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let run = WorkflowRun::from_value(v);
                if run.is_none() {
                    warn!(payload = %v, "workflow_run is not an object, ignoring it");
                }
                run
            }
        };
        Some(Self {
            event_kind,
            workflow_run,
            raw,
        })
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.raw)
    }
}

impl Serialize for CiEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Latest known state of one named workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowStatus {
    pub name: String,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub run_number: Option<u64>,
    pub updated_at: Option<String>,
    pub html_url: Option<String>,
}

impl WorkflowStatus {
    fn from_run(name: &str, run: &WorkflowRun) -> Self {
        Self {
            name: name.to_string(),
            status: run.status.clone(),
            conclusion: run.conclusion.clone(),
            run_number: run.run_number,
            updated_at: run.updated_at.clone(),
            html_url: run.html_url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventRepository
// ---------------------------------------------------------------------------

/// Storage for the event log.
///
/// `load` is the read side used by the tool server and never fails. `append`
/// belongs to the ingestion side.
pub trait EventRepository {
    /// All events in stored order (oldest first).
    fn load(&self) -> Vec<CiEvent>;
    fn append(&self, event: CiEvent) -> Result<()>;
}

/// A JSON array stored in one file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_values(&self) -> Vec<Value> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "event log does not exist yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read event log");
                return Vec::new();
            }
        };
        if data.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Value>(&data) {
            Ok(Value::Array(values)) => values,
            Ok(_) => {
                warn!(path = %self.path.display(), "event log is not a JSON array, ignoring");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "event log is malformed, ignoring");
                Vec::new()
            }
        }
    }

    /// Like `read_values`, but any log that exists and is not a JSON array
    /// is an error. Only an absent or blank file reads as empty.
    fn read_values_strict(&self) -> Result<Vec<Value>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&data)? {
            Value::Array(values) => Ok(values),
            _ => Err(PrAgentError::InvalidEvent(format!(
                "event log {} is not a JSON array",
                self.path.display()
            ))),
        }
    }
}

impl EventRepository for JsonFileRepository {
    fn load(&self) -> Vec<CiEvent> {
        let values = self.read_values();
        let total = values.len();
        let events: Vec<CiEvent> = values.into_iter().filter_map(CiEvent::from_value).collect();
        if events.len() != total {
            warn!(
                skipped = total - events.len(),
                "event log contains non-object entries"
            );
        }
        events
    }

    /// Rewrite the array with `event` appended. The write goes through a temp
    /// file and a rename so concurrent readers never see a partial array.
    /// An existing log that does not decode is left untouched and reported.
    fn append(&self, event: CiEvent) -> Result<()> {
        let mut values = self.read_values_strict()?;
        values.push(event.into_value());
        let data = serde_json::to_vec_pretty(&values)?;
        io::atomic_write(&self.path, &data)
    }
}

// ---------------------------------------------------------------------------
// EventStore
// ---------------------------------------------------------------------------

pub struct EventStore<R> {
    repo: R,
}

impl<R: EventRepository> EventStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// The last `limit` events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<CiEvent> {
        let mut events = self.repo.load();
        let skip = events.len().saturating_sub(limit);
        events.drain(..skip);
        events
    }

    /// Latest status per workflow name, optionally restricted to one name.
    pub fn workflow_status(&self, name: Option<&str>) -> BTreeMap<String, WorkflowStatus> {
        latest_by_workflow(&self.repo.load(), name)
    }

    /// Record one incoming webhook payload, stamping `received_at` with the
    /// current time when the payload does not carry it.
    pub fn ingest(&self, value: Value) -> Result<CiEvent> {
        let event = prepare_incoming(value, Utc::now())?;
        self.repo.append(event.clone())?;
        Ok(event)
    }
}

/// Last-writer-wins merge keyed by workflow name. The run with the greatest
/// `updated_at` wins; ISO-8601 strings in one format order lexically the same
/// as chronologically. On equal timestamps the later event in `events` wins.
/// A missing `updated_at` loses to any present one.
pub fn latest_by_workflow(
    events: &[CiEvent],
    name: Option<&str>,
) -> BTreeMap<String, WorkflowStatus> {
    let mut latest: BTreeMap<String, WorkflowStatus> = BTreeMap::new();

    let runs = events
        .iter()
        .filter_map(|e| e.workflow_run.as_ref())
        .filter_map(|run| run.name.as_deref().map(|n| (n, run)))
        .filter(|(n, _)| name.map_or(true, |wanted| *n == wanted));

    for (run_name, run) in runs {
        let replace = match latest.get(run_name) {
            None => true,
            Some(current) => run.updated_at.as_deref() >= current.updated_at.as_deref(),
        };
        if replace {
            latest.insert(run_name.to_string(), WorkflowStatus::from_run(run_name, run));
        }
    }
    latest
}

// ---------------------------------------------------------------------------
// Ingestion helpers
// ---------------------------------------------------------------------------

/// Parse one incoming event and stamp `received_at` if the sender did not.
pub fn prepare_incoming(value: Value, now: DateTime<Utc>) -> Result<CiEvent> {
    let mut event = CiEvent::from_value(value)
        .ok_or_else(|| PrAgentError::InvalidEvent("expected a JSON object".to_string()))?;
    event
        .raw
        .entry("received_at")
        .or_insert_with(|| Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)));
    Ok(event)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
