//! Shared fixtures for integration tests.

use std::collections::HashMap;
use std::future::Future;
use std::io::Cursor;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use sgwc_registry::api::{self, AppState};
use sgwc_registry::assets::{AssetSource, FetchedAsset};
use sgwc_registry::config::GlobalConfig;
use sgwc_registry::document::Compositor;
use sgwc_registry::models::worker::{Registration, WorkerRecord};
use sgwc_registry::persistence::db::{self, Database};
use sgwc_registry::registry::WorkerRegistry;

pub const BACKGROUND_URL: &str = "https://cdn.test/formbg.jpg";
pub const LOGO_URL: &str = "https://cdn.test/logo.png";
pub const PHOTO_URL: &str = "https://cdn.test/photo.png";

/// In-memory asset source keyed by URL; unknown URLs are absent.
#[derive(Default)]
pub struct StubAssets {
    assets: HashMap<String, Bytes>,
}

impl StubAssets {
    pub fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.assets.insert(url.to_owned(), Bytes::from(body));
        self
    }

    /// Background, logo, and photo all available.
    pub fn all() -> Self {
        Self::default()
            .with(BACKGROUND_URL, jpeg_bytes(32, 45))
            .with(LOGO_URL, png_bytes(16, 16))
            .with(PHOTO_URL, png_bytes(20, 24))
    }
}

impl AssetSource for StubAssets {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchedAsset> + Send + 'a>> {
        let found = self
            .assets
            .get(url)
            .cloned()
            .map_or(FetchedAsset::Absent, FetchedAsset::Bytes);
        Box::pin(async move { found })
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 60, 200]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode png");
    out
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([240, 240, 230]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    out
}

pub fn test_config() -> GlobalConfig {
    let mut config = GlobalConfig::from_toml_str(
        r#"
public_host = "forms.example.org"

[assets]
fetch_timeout_seconds = 2
"#,
    )
    .expect("test config");
    config.assets.background_url = BACKGROUND_URL.into();
    config.assets.logo_url = LOGO_URL.into();
    config
}

pub fn compositor(assets: impl AssetSource + 'static) -> Compositor {
    Compositor::new(Arc::new(assets), &test_config().assets)
}

/// A registration with every profile field filled with short values.
pub fn full_registration(admin: &str) -> Registration {
    Registration {
        admin_id: admin.into(),
        zone: Some("nfr".into()),
        photo_url: Some(PHOTO_URL.into()),
        designation: Some("Loader".into()),
        name: Some("Ravi Kumar".into()),
        fh_name: Some("Suresh Kumar".into()),
        dob: Some("1990-04-12".into()),
        sex: Some("Male".into()),
        blood_group: Some("B+".into()),
        category: Some("General".into()),
        marital_status: Some("Married".into()),
        mobile_no: Some("9876543210".into()),
        email: Some("ravi@example.org".into()),
        communication_address: Some("12 Station Road, Guwahati".into()),
        address: Some("Village Rampur, Nalbari".into()),
        education: Some("10th Pass".into()),
        aadhaar_no: Some("1234 5678 9012".into()),
        pan_no: Some("ABCDE1234F".into()),
        eshram_no: Some("UAN-998877".into()),
        acc_name: Some("Ravi Kumar".into()),
        acc_no: Some("00112233445566".into()),
        ifsc: Some("SBIN0000123".into()),
        bank_name: Some("State Bank".into()),
        division: Some("Lumding".into()),
        shed: Some("Pandu Goods Shed".into()),
    }
}

/// A record carrying only identity and provenance.
pub fn empty_record(form_no: &str) -> WorkerRecord {
    Registration {
        admin_id: "admin-1".into(),
        ..Registration::default()
    }
    .into_record(form_no.into())
}

pub async fn test_app_state(config: GlobalConfig, assets: impl AssetSource + 'static) -> (Arc<AppState>, Arc<Database>) {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    let compositor = Compositor::new(Arc::new(assets), &config.assets);
    let state = Arc::new(AppState {
        registry: WorkerRegistry::new(Arc::clone(&pool), &config),
        config: Arc::new(config),
        compositor,
    });
    (state, pool)
}

/// Serve `state` on an ephemeral port. Cancel the token to stop.
pub async fn spawn_server(state: Arc<AppState>) -> (String, CancellationToken) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral");
    let addr = listener.local_addr().expect("local addr");
    let ct = CancellationToken::new();
    let server_ct = ct.clone();
    tokio::spawn(async move {
        api::serve_on(listener, state, server_ct).await.expect("server");
    });
    (format!("http://{addr}"), ct)
}

pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    count(haystack, needle) > 0
}
