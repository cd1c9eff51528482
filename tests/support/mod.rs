//! In-memory fakes for every controller collaborator

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use framezip::adapters::toml_config::Compression;
use framezip::adapters::ZipArchiver;
use framezip::app::{Collaborators, FrameExtractionController};
use framezip::domain::model::{ArchiveBlob, FileRow, FrameRate, Region, SelectionLimits};
use framezip::domain::rules::FrameRateChooser;
use framezip::ports::*;
use framezip::{DomainError, VideoFile};

pub const MIB: u64 = 1024 * 1024;

/// Video held in memory with the given media type
pub fn video(name: &str, media_type: &str, bytes: &[u8]) -> VideoFile {
    VideoFile::in_memory(name, media_type, bytes.to_vec())
}

/// Lets a test hold the transcoder inside `run` until released
#[derive(Default)]
pub struct Gate {
    pub started: Notify,
    pub release: Notify,
}

#[derive(Default)]
struct FakeFs {
    files: BTreeMap<String, Vec<u8>>,
    calls: Vec<String>,
    loaded: bool,
}

/// Transcoder with a map-backed virtual filesystem.
///
/// `run` emits `frames_per_video` numbered images named after the output
/// pattern it receives, or fails after leaving one partial frame behind.
pub struct FakeTranscoder {
    fs: Mutex<FakeFs>,
    frames_per_video: usize,
    fail_run: bool,
    fail_load: bool,
    fail_unlink: bool,
    fail_read_file: bool,
    read_dir_limit: Option<usize>,
    read_dirs: AtomicUsize,
    loads: AtomicUsize,
    gate: Option<Arc<Gate>>,
}

impl FakeTranscoder {
    pub fn new(frames_per_video: usize) -> Self {
        Self {
            fs: Mutex::new(FakeFs::default()),
            frames_per_video,
            fail_run: false,
            fail_load: false,
            fail_unlink: false,
            fail_read_file: false,
            read_dir_limit: None,
            read_dirs: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn failing_run(mut self) -> Self {
        self.fail_run = true;
        self
    }

    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn failing_unlink(mut self) -> Self {
        self.fail_unlink = true;
        self
    }

    pub fn failing_read_file(mut self) -> Self {
        self.fail_read_file = true;
        self
    }

    /// Let `successes` listings through, then fail every later one
    pub fn failing_read_dir_after(mut self, successes: usize) -> Self {
        self.read_dir_limit = Some(successes);
        self
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Put an entry in the filesystem directly
    pub fn seed(&self, name: &str, data: &[u8]) {
        self.fs.lock().unwrap().files.insert(name.to_string(), data.to_vec());
    }

    pub fn entries(&self) -> Vec<String> {
        self.fs.lock().unwrap().files.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.fs.lock().unwrap().calls.clone()
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.fs.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl TranscoderPort for FakeTranscoder {
    fn is_loaded(&self) -> bool {
        self.fs.lock().unwrap().loaded
    }

    async fn load(&self) -> Result<(), DomainError> {
        self.record("load".to_string());
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(DomainError::TranscoderLoad("runtime unavailable".to_string()));
        }
        self.fs.lock().unwrap().loaded = true;
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<(), DomainError> {
        self.record(format!("write {}", name));
        self.seed(name, data);
        Ok(())
    }

    async fn run(&self, args: &[String]) -> Result<(), DomainError> {
        self.record(format!("run {}", args.join(" ")));
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        let input = args
            .get(1)
            .cloned()
            .ok_or_else(|| DomainError::TranscoderRun("missing input".to_string()))?;
        let pattern = args
            .last()
            .cloned()
            .ok_or_else(|| DomainError::TranscoderRun("missing output".to_string()))?;

        let mut fs = self.fs.lock().unwrap();
        let source = fs
            .files
            .get(&input)
            .cloned()
            .ok_or_else(|| DomainError::TranscoderRun(format!("{}: not found", input)))?;

        if self.fail_run {
            fs.files.insert(pattern.replace("%d", "1"), vec![0xde, 0xad]);
            return Err(DomainError::TranscoderRun("simulated decoder failure".to_string()));
        }

        for index in 1..=self.frames_per_video {
            let mut image = source.clone();
            image.push(index as u8);
            fs.files.insert(pattern.replace("%d", &index.to_string()), image);
        }
        Ok(())
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<String>, DomainError> {
        self.record(format!("read_dir {}", path));
        let attempt = self.read_dirs.fetch_add(1, Ordering::SeqCst);
        if self.read_dir_limit.is_some_and(|limit| attempt >= limit) {
            return Err(DomainError::VirtualFs(format!("{}: listing unavailable", path)));
        }
        Ok(self.entries())
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        if self.fail_read_file {
            return Err(DomainError::VirtualFs(format!("{}: read error", name)));
        }
        self.fs
            .lock()
            .unwrap()
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::VirtualFs(format!("{}: not found", name)))
    }

    async fn unlink(&self, name: &str) -> Result<(), DomainError> {
        self.record(format!("unlink {}", name));
        if self.fail_unlink {
            return Err(DomainError::VirtualFs(format!("{}: busy", name)));
        }
        self.fs.lock().unwrap().files.remove(name);
        Ok(())
    }
}

/// Real ZIP archiver that counts the archives it starts
pub struct CountingArchiver {
    inner: ZipArchiver,
    created: AtomicUsize,
}

impl CountingArchiver {
    pub fn new() -> Self {
        Self {
            inner: ZipArchiver::new(Compression::Stored),
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ArchiverPort for CountingArchiver {
    fn create(&self) -> Box<dyn ArchiveSession> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.create()
    }
}

/// Archiver whose archives never generate
pub struct FailingArchiver;

struct FailingSession(usize);

#[async_trait]
impl ArchiveSession for FailingSession {
    fn file(&mut self, _name: &str, _data: Vec<u8>) {
        self.0 += 1;
    }

    fn entry_count(&self) -> usize {
        self.0
    }

    async fn generate(&mut self) -> Result<ArchiveBlob, DomainError> {
        Err(DomainError::Archive("out of memory".to_string()))
    }
}

impl ArchiverPort for FailingArchiver {
    fn create(&self) -> Box<dyn ArchiveSession> {
        Box::new(FailingSession(0))
    }
}

/// Download port that keeps everything in memory
#[derive(Default)]
pub struct FakeDownloads {
    staged: Mutex<HashMap<u64, ArchiveBlob>>,
    created: AtomicUsize,
    saved: Mutex<Vec<(String, ArchiveBlob)>>,
    revoked: Mutex<Vec<u64>>,
}

impl FakeDownloads {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Vec<(String, ArchiveBlob)> {
        self.saved.lock().unwrap().clone()
    }

    pub fn revoked(&self) -> Vec<u64> {
        self.revoked.lock().unwrap().clone()
    }

    pub fn staged_blobs(&self) -> Vec<ArchiveBlob> {
        self.staged.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl DownloadPort for FakeDownloads {
    async fn create_reference(&self, blob: ArchiveBlob) -> Result<DownloadRef, DomainError> {
        let id = self.created.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        self.staged.lock().unwrap().insert(id, blob);
        Ok(DownloadRef { id })
    }

    async fn save(&self, reference: &DownloadRef, file_name: &str) -> Result<PathBuf, DomainError> {
        let blob = self
            .staged
            .lock()
            .unwrap()
            .get(&reference.id)
            .cloned()
            .ok_or_else(|| DomainError::Download("revoked".to_string()))?;
        self.saved.lock().unwrap().push((file_name.to_string(), blob));
        Ok(PathBuf::from(file_name))
    }

    fn revoke(&self, reference: &DownloadRef) {
        self.staged.lock().unwrap().remove(&reference.id);
        self.revoked.lock().unwrap().push(reference.id);
    }
}

#[derive(Default)]
struct ViewState {
    rows: Vec<FileRow>,
    placeholder: Option<String>,
    regions: HashMap<Region, bool>,
    highlight: bool,
}

/// View that remembers what it was last told
#[derive(Default)]
pub struct RecordingView {
    state: Mutex<ViewState>,
}

impl RecordingView {
    pub fn rows(&self) -> Vec<FileRow> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn placeholder(&self) -> Option<String> {
        self.state.lock().unwrap().placeholder.clone()
    }

    /// Regions never touched count as hidden
    pub fn visible(&self, region: Region) -> bool {
        self.state
            .lock()
            .unwrap()
            .regions
            .get(&region)
            .copied()
            .unwrap_or(false)
    }

    pub fn highlighted(&self) -> bool {
        self.state.lock().unwrap().highlight
    }
}

impl ViewPort for RecordingView {
    fn render_file_list(&self, rows: &[FileRow]) {
        let mut state = self.state.lock().unwrap();
        state.rows = rows.to_vec();
        state.placeholder = None;
    }

    fn render_placeholder(&self, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.rows.clear();
        state.placeholder = Some(text.to_string());
    }

    fn set_region_visible(&self, region: Region, visible: bool) {
        self.state.lock().unwrap().regions.insert(region, visible);
    }

    fn set_drop_highlight(&self, active: bool) {
        self.state.lock().unwrap().highlight = active;
    }
}

/// Notifier collecting alert texts
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl NotifierPort for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// Clock advancing one millisecond per reading
pub struct StepClock(AtomicI64);

impl StepClock {
    pub fn starting_at(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }
}

impl ClockPort for StepClock {
    fn now_millis(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// Controller wired to fakes, with handles on each fake
pub struct Harness {
    pub controller: Arc<FrameExtractionController>,
    pub transcoder: Arc<FakeTranscoder>,
    pub downloads: Arc<FakeDownloads>,
    pub view: Arc<RecordingView>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    /// Frame rates offered by every harness
    pub const FRAME_RATES: [u32; 3] = [1, 2, 5];

    pub fn new(transcoder: FakeTranscoder, archiver: Arc<dyn ArchiverPort>) -> Self {
        let transcoder = Arc::new(transcoder);
        let downloads = Arc::new(FakeDownloads::default());
        let view = Arc::new(RecordingView::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let frame_rates = FrameRateChooser::new(
            Self::FRAME_RATES
                .iter()
                .map(|fps| FrameRate::new(*fps).unwrap())
                .collect(),
        );

        let controller = Arc::new(FrameExtractionController::new(
            SelectionLimits::default(),
            frame_rates,
            Collaborators {
                transcoder: Arc::clone(&transcoder) as Arc<dyn TranscoderPort>,
                archiver,
                downloads: Arc::clone(&downloads) as Arc<dyn DownloadPort>,
                view: Arc::clone(&view) as Arc<dyn ViewPort>,
                notifier: Arc::clone(&notifier) as Arc<dyn NotifierPort>,
                clock: Arc::new(StepClock::starting_at(1_000)) as Arc<dyn ClockPort>,
            },
        ));

        Self {
            controller,
            transcoder,
            downloads,
            view,
            notifier,
        }
    }

    /// Harness with a real ZIP archiver
    pub fn with_transcoder(transcoder: FakeTranscoder) -> (Self, Arc<CountingArchiver>) {
        let archiver = Arc::new(CountingArchiver::new());
        let harness = Self::new(transcoder, Arc::clone(&archiver) as Arc<dyn ArchiverPort>);
        (harness, archiver)
    }
}

/// Names of the entries in a ZIP blob, sorted
pub fn zip_entry_names(blob: &ArchiveBlob) -> Vec<String> {
    let archive = zip::ZipArchive::new(std::io::Cursor::new(blob.bytes.clone())).unwrap();
    let mut names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();
    names.sort();
    names
}
