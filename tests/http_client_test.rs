use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use otdr_submit::error::{ServiceFailure, GENERIC_FAILURE_MESSAGE};
use otdr_submit::{
    App, ArtifactHandler, CandidateFile, Config, HttpExtractionClient, SubmissionFlow,
    SubmissionState, WavelengthProfile,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const XLSX_MEDIA_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 服务收到的一个 multipart 字段
#[derive(Debug, Clone)]
struct CapturedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
enum Reply {
    Workbook(Vec<u8>),
    Detail(StatusCode, String),
    Raw(StatusCode, String),
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<Vec<CapturedField>>>>,
    reply: Reply,
}

async fn process(State(state): State<StubState>, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        fields.push(CapturedField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    state.requests.lock().unwrap().push(fields);

    match state.reply {
        Reply::Workbook(bytes) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, XLSX_MEDIA_TYPE)], bytes).into_response()
        }
        Reply::Detail(status, detail) => {
            (status, Json(json!({ "detail": detail }))).into_response()
        }
        Reply::Raw(status, body) => (status, body).into_response(),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// 启动一个本地的提取服务替身
async fn spawn_stub(reply: Reply) -> (String, Arc<Mutex<Vec<Vec<CapturedField>>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        requests: requests.clone(),
        reply,
    };

    let router = Router::new()
        .route("/process", post(process))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), requests)
}

fn write_pdf(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    let mut content = b"%PDF-1.4\n".to_vec();
    content.resize(size, b' ');
    std::fs::write(&path, content).unwrap();
    path
}

async fn candidates(paths: &[PathBuf]) -> Vec<CandidateFile> {
    let mut out = Vec::new();
    for path in paths {
        out.push(CandidateFile::from_path(path).await.unwrap());
    }
    out
}

#[tokio::test]
async fn test_request_wire_shape_keeps_order() {
    let (url, requests) = spawn_stub(Reply::Workbook(b"PK\x03\x04".to_vec())).await;
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 1024 * 1024);
    let b = write_pdf(dir.path(), "b.pdf", 1024 * 1024);

    let client = HttpExtractionClient::with_base_url(&url).unwrap();
    let mut flow = SubmissionFlow::new(client, ArtifactHandler::new(dir.path().join("out")));
    flow.select_files(candidates(&[a, b]).await);
    flow.select_wavelength(WavelengthProfile::Nm1310And1550);
    flow.submit().await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let fields = &requests[0];
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["wavelengths", "pdfs", "pdfs"]);

    assert_eq!(fields[0].data, b"1310nm & 1550nm");
    assert_eq!(fields[1].file_name.as_deref(), Some("a.pdf"));
    assert_eq!(fields[2].file_name.as_deref(), Some("b.pdf"));
    for pdf in &fields[1..] {
        assert_eq!(pdf.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(pdf.data.len(), 1024 * 1024);
        assert!(pdf.data.starts_with(b"%PDF"));
    }
}

#[tokio::test]
async fn test_success_payload_is_saved_verbatim() {
    let workbook = b"PK\x03\x04 workbook bytes \x00\xff".to_vec();
    let (url, _) = spawn_stub(Reply::Workbook(workbook.clone())).await;
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 4096);

    let client = HttpExtractionClient::with_base_url(&url).unwrap();
    let mut flow = SubmissionFlow::new(client, ArtifactHandler::new(dir.path().join("out")));
    flow.select_files(candidates(&[a]).await);
    flow.submit().await.unwrap();

    assert!(matches!(flow.state(), SubmissionState::Succeeded(_)));
    let saved = flow.download().await.unwrap();
    assert_eq!(saved, dir.path().join("out").join("Updated_OTDR_Results.xlsx"));
    assert_eq!(std::fs::read(saved).unwrap(), workbook);
}

#[tokio::test]
async fn test_detail_error_is_surfaced_verbatim() {
    let (url, _) = spawn_stub(Reply::Detail(
        StatusCode::BAD_REQUEST,
        "bad wavelength".to_string(),
    ))
    .await;
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 4096);

    let client = HttpExtractionClient::with_base_url(&url).unwrap();
    let mut flow = SubmissionFlow::new(client, ArtifactHandler::new(dir.path()));
    flow.select_files(candidates(&[a]).await);
    flow.submit().await.unwrap();

    assert_eq!(
        flow.state(),
        &SubmissionState::Failed("bad wavelength".to_string())
    );
}

#[tokio::test]
async fn test_error_without_body_uses_generic_message() {
    let (url, _) = spawn_stub(Reply::Raw(StatusCode::INTERNAL_SERVER_ERROR, String::new())).await;
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 4096);

    let client = HttpExtractionClient::with_base_url(&url).unwrap();
    let mut flow = SubmissionFlow::new(client, ArtifactHandler::new(dir.path()));
    flow.select_files(candidates(&[a]).await);
    flow.submit().await.unwrap();

    assert_eq!(flow.state().failure_message(), Some(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    // 绑定后立即释放，得到一个没有服务监听的端口
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpExtractionClient::with_base_url(format!("http://{}", addr)).unwrap();
    let err = tokio_test::assert_err!(client.health().await);
    assert!(matches!(err, ServiceFailure::Transport { .. }));
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_health_check() {
    let (url, _) = spawn_stub(Reply::Workbook(Vec::new())).await;
    let client = HttpExtractionClient::with_base_url(&url).unwrap();
    tokio_test::assert_ok!(client.health().await);
}

#[tokio::test]
async fn test_app_submits_and_saves() {
    let (url, requests) = spawn_stub(Reply::Workbook(b"xlsx".to_vec())).await;
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "first.pdf", 2048);
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not a pdf").unwrap();
    let b = write_pdf(dir.path(), "second.pdf", 2048);

    let config = Config {
        service_base_url: url,
        output_dir: dir.path().join("results"),
        ..Config::default()
    };
    let app = App::initialize(config).unwrap();
    let saved = app
        .submit(
            &[a, notes, b],
            Some(WavelengthProfile::Nm1310And1550And1625),
        )
        .await
        .unwrap();

    assert_eq!(std::fs::read(saved).unwrap(), b"xlsx");

    // 被拒绝的文件不会提交
    let requests = requests.lock().unwrap();
    let fields = &requests[0];
    assert_eq!(fields[0].data, b"1310nm, 1550nm & 1625nm");
    let files: Vec<_> = fields[1..]
        .iter()
        .map(|f| f.file_name.clone().unwrap())
        .collect();
    assert_eq!(files, vec!["first.pdf", "second.pdf"]);
}

#[tokio::test]
async fn test_app_with_no_valid_files_never_calls_service() {
    let (url, requests) = spawn_stub(Reply::Workbook(b"xlsx".to_vec())).await;
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not a pdf").unwrap();

    let config = Config {
        service_base_url: url,
        output_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let err = App::initialize(config)
        .unwrap()
        .submit(&[notes], None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Please upload at least one PDF file.");
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
#[ignore] // 需要真实服务：OTDR_SERVICE_URL=... cargo test -- --ignored
async fn test_live_service_health() {
    otdr_submit::utils::logging::init(true);

    let config = Config::from_env().expect("加载配置失败");
    let app = App::initialize(config).expect("初始化失败");

    app.health().await.expect("服务不可用");
}
