use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mediacat::catalog::{count_files, parse_document, MediaNode};
use mediacat::http::{build_router, state::AppState};

const DOCUMENT: &str = r#"[
    { "path": "a.mp4", "type": "video", "info": { "streams": [
        { "codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080 },
        { "codec_type": "audio", "codec_name": "aac", "channels": 2, "channel_layout": "stereo" } ],
        "format": { "duration": "120", "bit_rate": "5000000" } } },
    { "path": "dir", "type": "directory", "contents": [
        { "path": "b.mkv", "type": "video", "info": { "streams": [
            { "codec_type": "video", "codec_name": "hevc", "width": 3840, "height": 2160 },
            { "codec_type": "audio", "codec_name": "ac3", "channels": 6, "channel_layout": "5.1" } ],
            "format": { "duration": "300", "bit_rate": "15000000" } } } ] } ]"#;

fn make_app() -> axum::Router {
    build_router(AppState::from_document(DOCUMENT).unwrap())
}

async fn get(uri: &str) -> (StatusCode, String) {
    let response = make_app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_tree(uri: &str) -> Vec<MediaNode> {
    let (status, body) = get(uri).await;
    assert_eq!(status, StatusCode::OK, "{uri}: {body}");
    parse_document(&body).unwrap()
}

// ── GET /media_info.json ──────────────────────────────────────────────────────

#[tokio::test]
async fn document_is_served_unchanged() {
    let (status, body) = get("/media_info.json").await;
    assert_eq!(status, StatusCode::OK);
    let served: serde_json::Value = serde_json::from_str(&body).unwrap();
    let original: serde_json::Value = serde_json::from_str(DOCUMENT).unwrap();
    assert_eq!(served, original);
}

#[tokio::test]
async fn document_keeps_fields_the_catalog_does_not_model() {
    let raw = r#"[
        { "path": "notes.txt", "type": "file" },
        { "path": "a.mkv", "type": "video", "info": {
            "streams": [{ "index": 0, "codec_type": "video", "codec_name": "h264",
                          "profile": "High", "width": 1280, "height": 720 }],
            "format": { "filename": "a.mkv", "duration": "7260.512000", "bit_rate": "900000" } } } ]"#;
    let state = AppState::from_document(raw).unwrap();
    assert_eq!(count_files(&state.catalog), 1);

    let response = build_router(state)
        .oneshot(Request::builder().uri("/media_info.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let served: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(served, serde_json::from_str::<serde_json::Value>(raw).unwrap());
    assert_eq!(served[0]["type"], "file");
    assert_eq!(served[1]["info"]["format"]["duration"], "7260.512000");
    assert_eq!(served[1]["info"]["streams"][0]["profile"], "High");
}

#[tokio::test]
async fn invalid_document_is_rejected() {
    assert!(AppState::from_document("{ not json").is_err());
}

#[tokio::test]
async fn document_content_type_is_json() {
    let response = make_app()
        .oneshot(Request::builder().uri("/media_info.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let ct = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(ct.contains("application/json"), "Expected application/json, got: {ct}");
}

// ── GET /api/options ──────────────────────────────────────────────────────────

#[tokio::test]
async fn options_lists_every_dimension() {
    let (status, body) = get("/api/options").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["videoCodecs"], serde_json::json!(["h264", "hevc"]));
    assert_eq!(json["audioCodecs"], serde_json::json!(["aac", "ac3"]));
    assert_eq!(json["audioChannels"], serde_json::json!([2, 6]));
    assert_eq!(json["videoResolutions"], serde_json::json!(["1920x1080", "3840x2160"]));
}

// ── GET /api/catalog ──────────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_without_params_is_whole_tree() {
    let tree = get_tree("/api/catalog").await;
    assert_eq!(count_files(&tree), 2);
}

#[tokio::test]
async fn catalog_filters_by_video_codec() {
    let tree = get_tree("/api/catalog?videoCodec=HEVC").await;
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].path(), std::path::Path::new("dir"));
    assert_eq!(count_files(&tree), 1);
}

#[tokio::test]
async fn catalog_accepts_snake_case_params() {
    let tree = get_tree("/api/catalog?audio_channels=2").await;
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].path(), std::path::Path::new("a.mp4"));
}

#[tokio::test]
async fn catalog_blank_params_are_ignored() {
    let tree = get_tree("/api/catalog?videoCodec=&audioCodec=&audioChannels=&videoResolution=").await;
    assert_eq!(count_files(&tree), 2);
}

#[tokio::test]
async fn catalog_conjunction_can_match_nothing() {
    let tree = get_tree("/api/catalog?videoCodec=h264&videoResolution=3840x2160").await;
    assert!(tree.is_empty());
}

#[tokio::test]
async fn repeated_filters_start_from_original_tree() {
    let app = make_app();
    for (uri, expected) in [
        ("/api/catalog?videoCodec=hevc", 1),
        ("/api/catalog?videoCodec=h264", 1),
        ("/api/catalog", 2),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let tree = parse_document(std::str::from_utf8(&bytes).unwrap()).unwrap();
        assert_eq!(count_files(&tree), expected, "{uri}");
    }
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _) = get("/device.xml").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
