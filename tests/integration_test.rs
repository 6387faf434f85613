use async_trait::async_trait;
use gimps_submit::clients::{ResultSubmitter, SubmissionRequest, SubmissionResult, SubmitOptions};
use gimps_submit::error::SubmissionError;
use gimps_submit::services::ArchiveWriter;
use gimps_submit::{
    App, AssignmentRegistry, Config, FileWatcher, ResultProcessor, StopReason, WatchState,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// 记录所有请求参数的假 PrimeNet
#[derive(Default)]
struct RecordingSubmitter {
    requests: Mutex<Vec<Vec<(&'static str, String)>>>,
}

impl RecordingSubmitter {
    fn params(&self) -> Vec<Vec<(&'static str, String)>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSubmitter for RecordingSubmitter {
    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, SubmissionError> {
        self.requests.lock().unwrap().push(request.query_pairs());
        Ok(SubmissionResult {
            success: true,
            status_code: 200,
        })
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    results: PathBuf,
    archive: PathBuf,
    submitter: Arc<RecordingSubmitter>,
    watcher: FileWatcher,
}

async fn fixture(assignments: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.txt");
    let archive = dir.path().join("archived_results.txt");
    let assignment_file = dir.path().join("assignments.txt");
    std::fs::write(&assignment_file, assignments).unwrap();
    std::fs::write(&results, "").unwrap();

    let registry = AssignmentRegistry::load(&assignment_file).await.unwrap();
    let submitter = Arc::new(RecordingSubmitter::default());
    let options = SubmitOptions {
        product_id: "GIMPS".to_string(),
        protocol_version: "0.95".to_string(),
        computer_id: "rig-01".to_string(),
        partial_report: true,
    };
    let processor =
        ResultProcessor::new(registry, submitter.clone(), options, ArchiveWriter::new(&archive))
            .unwrap();
    let mut watcher = FileWatcher::new(&results, Duration::ZERO, processor);
    watcher.start().await;

    Fixture {
        _dir: dir,
        results,
        archive,
        submitter,
        watcher,
    }
}

/// 模拟 mfaktc 追加结果，并把修改时间推后保证能被检测到
fn append_result(path: &Path, text: &str, secs_later: u64) {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(secs_later))
        .unwrap();
}

fn param<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn test_no_factor_result_is_submitted() {
    let mut fx = fixture("ABC123,12345,60,64\n").await;

    append_result(&fx.results, "no factor for M12345 from 2^60 to 2^64\n", 10);
    fx.watcher.tick().await;

    let params = fx.submitter.params();
    assert_eq!(params.len(), 1);
    assert_eq!(param(&params[0], "n"), Some("12345"));
    assert_eq!(param(&params[0], "sf"), Some("60"));
    assert_eq!(param(&params[0], "ef"), Some("64"));
    assert_eq!(param(&params[0], "r"), Some("4"));
    assert_eq!(param(&params[0], "k"), Some("ABC123"));
    assert_eq!(param(&params[0], "f"), None);
}

#[tokio::test]
async fn test_factor_result_is_submitted() {
    let mut fx = fixture("Factor=XYZ789,99999,70,74\n").await;

    append_result(&fx.results, "M99999 has a factor: 123456789 from bit :70: to :74:\n", 10);
    fx.watcher.tick().await;

    let params = fx.submitter.params();
    assert_eq!(params.len(), 1);
    assert_eq!(param(&params[0], "r"), Some("1"));
    assert_eq!(param(&params[0], "f"), Some("123456789"));
    assert_eq!(param(&params[0], "ef"), Some("26.879"));
    assert_eq!(param(&params[0], "k"), Some("XYZ789"));
    assert_eq!(
        param(&params[0], "m"),
        Some("M99999 has a factor: 123456789 from bit :70: to :74:")
    );
}

#[tokio::test]
async fn test_archive_is_concatenation_of_every_pass() {
    let mut fx = fixture("ABC123,12345,60,64\nDEF456,23456,60,64\n").await;
    let chunks = [
        "mfaktc 0.21 started\nno factor for M12345 from 2^60 to 2^64\n",
        "no factor for M23456 from 2^60 to 2^64\n",
        "no factor for M77777 from 2^60 to 2^64\nM23456 garbage line\n",
    ];

    for (i, chunk) in chunks.iter().enumerate() {
        append_result(&fx.results, chunk, 10 * (i as u64 + 1));
        assert!(matches!(fx.watcher.tick().await, WatchState::Watching { .. }));
        // 修改时间没变，不会重复处理
        fx.watcher.tick().await;
    }

    assert_eq!(std::fs::read_to_string(&fx.archive).unwrap(), chunks.concat());
    assert_eq!(std::fs::read_to_string(&fx.results).unwrap(), "");
    assert_eq!(fx.submitter.params().len(), 2);
}

#[tokio::test]
async fn test_lines_without_work_unit_are_ignored() {
    let mut fx = fixture("ABC123,12345,60,64\n").await;

    append_result(&fx.results, "Starting trial factoring\n\nCUDA device info: ok\n", 10);
    fx.watcher.tick().await;

    assert!(fx.submitter.params().is_empty());
    assert!(matches!(fx.watcher.state(), WatchState::Watching { .. }));
}

#[tokio::test]
async fn test_deleted_results_file_stops_watcher() {
    let mut fx = fixture("ABC123,12345,60,64\n").await;

    std::fs::remove_file(&fx.results).unwrap();

    assert_eq!(fx.watcher.tick().await, WatchState::Stopped(StopReason::Deleted));
}

#[tokio::test]
async fn test_missing_assignment_file_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        results_file: dir.path().join("results.txt"),
        archive_file: dir.path().join("archived_results.txt"),
        assignment_file: dir.path().join("assignments.txt"),
        ..Config::default()
    };

    let result = App::initialize(config).await;

    assert!(result.is_err());
}
