mod common;

use async_trait::async_trait;
use common::{page, put, script};
use lens_core::navigator::paths::RAW_TEXT_PATH;
use lens_core::{ImageSource, Lens, LensError, LensTransport, RawPage};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Mutex;

/// Answers every upload with a canned results page and records the sources.
struct StubTransport {
    body: String,
    seen: Mutex<Vec<ImageSource>>,
}

impl StubTransport {
    fn new(body: String) -> Self {
        Self {
            body,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LensTransport for StubTransport {
    async fn fetch(&self, source: &ImageSource) -> lens_core::Result<RawPage> {
        self.seen.lock().unwrap().push(source.clone());
        Ok(RawPage::new(self.body.clone()))
    }
}

struct FailingTransport;

#[async_trait]
impl LensTransport for FailingTransport {
    async fn fetch(&self, _source: &ImageSource) -> lens_core::Result<RawPage> {
        Err(LensError::RedirectNotFound)
    }
}

fn text_page() -> String {
    let mut data = json!([]);
    put(&mut data, RAW_TEXT_PATH, json!(["hello", "world"]));
    page(&[script("ds:1", &data)])
}

#[tokio::test]
async fn test_upload_image_routes_each_input_kind() {
    let lens = Lens::with_transport(StubTransport::new(text_page()));

    for input in [
        ImageSource::from("https://example.com/cat.jpg"),
        ImageSource::from("tests/cat.jpg"),
        ImageSource::from(vec![0x89, b'P', b'N', b'G']),
    ] {
        let results = lens.upload_image(input).await.expect("upload failed");
        assert_eq!(results.extract_raw_text().unwrap(), vec!["hello", "world"]);
    }

    let seen = lens_seen(&lens);
    assert_eq!(seen[0], ImageSource::Url("https://example.com/cat.jpg".to_string()));
    assert_eq!(seen[1], ImageSource::Path(PathBuf::from("tests/cat.jpg")));
    assert_eq!(seen[2].kind(), "bytes");
}

#[tokio::test]
async fn test_transport_errors_propagate() {
    let lens = Lens::with_transport(FailingTransport);
    let err = lens.upload_image("https://example.com/cat.jpg").await.unwrap_err();
    assert!(matches!(err, LensError::RedirectNotFound));
    assert!(!err.is_extraction_error());
}

fn lens_seen(lens: &Lens<StubTransport>) -> Vec<ImageSource> {
    lens.transport().seen.lock().unwrap().clone()
}
