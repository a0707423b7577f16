//! Test report with steps and attachments
//!
//! Writes the Allure 2 results layout: one `{uuid}-result.json` per test and
//! one `{uuid}-attachment.{ext}` per attachment, side by side in the results
//! directory.

use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use demoshop_common::Severity;

use crate::config::ReportConfig;
use crate::error::{E2eError, E2eResult};

/// Attachment name of the previous run's summary
pub const LATEST_REPORT_ATTACHMENT: &str = "Отчет о тестировании";

/// Kind of an attached artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentType {
    Png,
    Text,
    Html,
    Json,
}

impl AttachmentType {
    pub fn mime(&self) -> &'static str {
        match self {
            AttachmentType::Png => "image/png",
            AttachmentType::Text => "text/plain",
            AttachmentType::Html => "text/html",
            AttachmentType::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AttachmentType::Png => "png",
            AttachmentType::Text => "txt",
            AttachmentType::Html => "html",
            AttachmentType::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub name: String,
    pub source: String,
    #[serde(rename = "type")]
    pub mime: String,
}

#[derive(Debug, Clone, Serialize)]
struct StatusDetails<'a> {
    message: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct Label {
    name: String,
    value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub name: String,
    pub status: Status,
    pub stage: &'static str,
    pub start: i64,
    pub stop: i64,
    pub steps: Vec<StepRecord>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultFile<'a> {
    uuid: String,
    history_id: &'a str,
    name: &'a str,
    full_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_details: Option<StatusDetails<'a>>,
    stage: &'static str,
    start: i64,
    stop: i64,
    labels: Vec<Label>,
    steps: &'a [StepRecord],
    attachments: &'a [Attachment],
}

/// Descriptive metadata of one test
#[derive(Debug, Clone)]
pub struct TestMeta {
    pub title: String,
    pub full_name: String,
    pub description: Option<String>,
    pub epic: Option<String>,
    pub feature: Option<String>,
    pub story: Option<String>,
    pub severity: Severity,
    pub owner: Option<String>,
    pub tags: Vec<String>,
}

impl TestMeta {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            full_name: title.clone(),
            title,
            description: None,
            epic: None,
            feature: None,
            story: None,
            severity: Severity::Normal,
            owner: None,
            tags: Vec::new(),
        }
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn epic(mut self, epic: impl Into<String>) -> Self {
        self.epic = Some(epic.into());
        self
    }

    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn story(mut self, story: impl Into<String>) -> Self {
        self.story = Some(story.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    fn labels(&self) -> Vec<Label> {
        let mut labels = vec![Label {
            name: "severity".to_string(),
            value: self.severity.to_string(),
        }];
        let named = [
            ("epic", &self.epic),
            ("feature", &self.feature),
            ("story", &self.story),
            ("owner", &self.owner),
        ];
        for (name, value) in named {
            if let Some(value) = value {
                labels.push(Label {
                    name: name.to_string(),
                    value: value.clone(),
                });
            }
        }
        for tag in &self.tags {
            labels.push(Label {
                name: "tag".to_string(),
                value: tag.clone(),
            });
        }
        labels
    }
}

/// Results directory shared by all tests of a run
#[derive(Debug, Clone)]
pub struct Report {
    results_dir: PathBuf,
    latest_report: Option<PathBuf>,
}

impl Report {
    pub fn new(results_dir: impl Into<PathBuf>) -> E2eResult<Self> {
        let results_dir = results_dir.into();
        std::fs::create_dir_all(&results_dir)?;
        Ok(Self {
            results_dir,
            latest_report: None,
        })
    }

    /// Results directory and previous-run summary from the suite configuration
    pub fn from_config(config: &ReportConfig) -> E2eResult<Self> {
        Ok(Self::new(&config.results_dir)?.with_latest_report(&config.latest_report))
    }

    /// Attach the summary at `path` to every test started from now on,
    /// whenever the file exists at that moment
    pub fn with_latest_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.latest_report = Some(path.into());
        self
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Begin recording a test; the result is written when the last handle drops
    pub fn start_test(&self, meta: TestMeta) -> Arc<TestReport> {
        info!("Starting test: {}", meta.title);
        let test = Arc::new(TestReport {
            results_dir: self.results_dir.clone(),
            uuid: Uuid::new_v4(),
            meta,
            start: now_millis(),
            state: Mutex::new(TestState::default()),
        });

        if let Some(path) = &self.latest_report {
            match test.attach_file_if_exists(path, LATEST_REPORT_ATTACHMENT, AttachmentType::Json) {
                Ok(true) => debug!("Attached {}", path.display()),
                Ok(false) => {}
                Err(e) => warn!("Could not attach {}: {}", path.display(), e),
            }
        }
        test
    }
}

#[derive(Debug, Default)]
struct TestState {
    steps: Vec<StepRecord>,
    open: Vec<StepRecord>,
    attachments: Vec<Attachment>,
    failure: Option<String>,
    passed: bool,
    result_path: Option<PathBuf>,
}

impl TestState {
    fn close_top(&mut self, status: Status) {
        if let Some(mut step) = self.open.pop() {
            step.stop = now_millis();
            step.status = status;
            match self.open.last_mut() {
                Some(parent) => parent.steps.push(step),
                None => self.steps.push(step),
            }
        }
    }

    fn has_failed_step(&self) -> bool {
        fn failed(steps: &[StepRecord]) -> bool {
            steps
                .iter()
                .any(|s| s.status == Status::Failed || failed(&s.steps))
        }
        failed(&self.steps)
    }
}

/// Recording of a single test
#[derive(Debug)]
pub struct TestReport {
    results_dir: PathBuf,
    uuid: Uuid,
    meta: TestMeta,
    start: i64,
    state: Mutex<TestState>,
}

impl TestReport {
    pub fn meta(&self) -> &TestMeta {
        &self.meta
    }

    /// Open a step that lasts until the returned guard drops
    pub fn step(&self, name: impl Into<String>) -> StepGuard<'_> {
        let name = name.into();
        info!("step: {}", name);
        let mut state = self.state.lock();
        let now = now_millis();
        state.open.push(StepRecord {
            name,
            status: Status::Passed,
            stage: "finished",
            start: now,
            stop: now,
            steps: Vec::new(),
            attachments: Vec::new(),
        });
        StepGuard {
            report: self,
            depth: state.open.len(),
            failed: false,
        }
    }

    /// Attach an artifact to the innermost open step, or to the test itself
    pub fn attach(
        &self,
        name: impl Into<String>,
        kind: AttachmentType,
        body: impl AsRef<[u8]>,
    ) -> E2eResult<()> {
        let name = name.into();
        let source = format!("{}-attachment.{}", Uuid::new_v4(), kind.extension());
        std::fs::write(self.results_dir.join(&source), body.as_ref())?;
        debug!("Attached {} as {}", name, source);

        let attachment = Attachment {
            name,
            source,
            mime: kind.mime().to_string(),
        };

        let mut state = self.state.lock();
        match state.open.last_mut() {
            Some(step) => step.attachments.push(attachment),
            None => state.attachments.push(attachment),
        }
        Ok(())
    }

    /// Attach the contents of a file
    pub fn attach_file(
        &self,
        path: &Path,
        name: impl Into<String>,
        kind: AttachmentType,
    ) -> E2eResult<()> {
        let body = std::fs::read(path)?;
        self.attach(name, kind, body)
    }

    /// Like `attach_file`, but a missing file is not an error.
    ///
    /// Returns whether anything was attached.
    pub fn attach_file_if_exists(
        &self,
        path: &Path,
        name: impl Into<String>,
        kind: AttachmentType,
    ) -> E2eResult<bool> {
        match std::fs::read(path) {
            Ok(body) => {
                self.attach(name, kind, body)?;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(E2eError::Io(e)),
        }
    }

    /// Record that the test ran to completion.
    ///
    /// A test that never calls this is reported as failed, which covers
    /// panics inside async tests where the report outlives the unwinding.
    pub fn pass(&self) {
        self.state.lock().passed = true;
    }

    /// Record the test as failed without panicking
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{} failed: {}", self.meta.title, message);
        self.state.lock().failure.get_or_insert(message);
    }

    /// Write the result file. Later calls return the same path.
    pub fn finish(&self) -> E2eResult<PathBuf> {
        let panicking = std::thread::panicking();
        let mut state = self.state.lock();

        if let Some(path) = &state.result_path {
            return Ok(path.clone());
        }

        let close_status = if panicking { Status::Failed } else { Status::Passed };
        while !state.open.is_empty() {
            state.close_top(close_status);
        }

        if !panicking && state.failure.is_none() && !state.passed {
            state.failure = Some("test ended before reporting success".to_string());
        }

        let status = if panicking || state.failure.is_some() || state.has_failed_step() {
            Status::Failed
        } else {
            Status::Passed
        };

        let result = ResultFile {
            uuid: self.uuid.to_string(),
            history_id: &self.meta.full_name,
            name: &self.meta.title,
            full_name: &self.meta.full_name,
            description: self.meta.description.as_deref(),
            status,
            status_details: state
                .failure
                .as_deref()
                .map(|message| StatusDetails { message }),
            stage: "finished",
            start: self.start,
            stop: now_millis(),
            labels: self.meta.labels(),
            steps: &state.steps,
            attachments: &state.attachments,
        };

        let path = self.results_dir.join(format!("{}-result.json", self.uuid));
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&path, json)
            .map_err(|e| E2eError::Report(format!("{}: {}", path.display(), e)))?;

        info!("{} {:?}: {}", self.meta.title, status, path.display());
        state.result_path = Some(path.clone());
        Ok(path)
    }
}

impl Drop for TestReport {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!("Failed to write result for {}: {}", self.meta.title, e);
        }
    }
}

/// Open report step; closed on drop
pub struct StepGuard<'a> {
    report: &'a TestReport,
    depth: usize,
    failed: bool,
}

impl StepGuard<'_> {
    /// Close the step as failed
    pub fn fail(mut self) {
        self.failed = true;
    }
}

impl Drop for StepGuard<'_> {
    fn drop(&mut self) {
        let status = if self.failed || std::thread::panicking() {
            Status::Failed
        } else {
            Status::Passed
        };
        let mut state = self.report.state.lock();
        while state.open.len() >= self.depth {
            state.close_top(status);
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
