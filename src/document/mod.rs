//! Document composition: application forms and acknowledgement receipts.
//!
//! Both variants are painted onto a single fixed-geometry A4 page. Remote
//! decorations (background, photo, logo) are fetched one at a time and
//! each embedded image is written to the sink before the next fetch
//! starts. A missing decoration never fails a document.

pub mod application_form;
pub mod canvas;
pub mod metrics;
pub mod pdf;
pub mod receipt;
pub mod rows;
pub mod sink;

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use tracing::{debug, warn};

use crate::assets::{AssetSource, FetchedAsset};
use crate::config::AssetConfig;

use self::pdf::PdfImage;

/// A4 width in points.
pub const PAGE_WIDTH: f64 = 595.28;
/// A4 height in points.
pub const PAGE_HEIGHT: f64 = 841.89;

const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// What ended up in the photo frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoOutcome {
    /// Photo fetched and embedded.
    Embedded,
    /// A photo was referenced but could not be fetched or decoded.
    Unavailable,
    /// No photo was referenced.
    NotProvided,
}

/// Summary of a finished render, used for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Background (form) or logo (receipt) embedded.
    pub decoration_embedded: bool,
    /// Photo frame state; `None` for receipts.
    pub photo: Option<PhotoOutcome>,
    /// Verification QR drawn.
    pub qr_embedded: bool,
    /// URL the QR code and its link annotation point at.
    pub verification_url: Option<String>,
    /// Total bytes written to the sink.
    pub bytes_written: usize,
}

/// Builds documents from worker records.
#[derive(Clone)]
pub struct Compositor {
    assets: Arc<dyn AssetSource>,
    background_url: String,
    logo_url: String,
}

impl Compositor {
    /// Create a compositor fetching decorations through `assets`.
    #[must_use]
    pub fn new(assets: Arc<dyn AssetSource>, config: &AssetConfig) -> Self {
        Self {
            assets,
            background_url: config.background_url.clone(),
            logo_url: config.logo_url.clone(),
        }
    }

    /// Fetch and decode an image; any failure yields `None`.
    async fn fetch_image(&self, url: &str, what: &'static str) -> Option<PdfImage> {
        let bytes = match self.assets.fetch(url).await {
            FetchedAsset::Bytes(bytes) => bytes,
            FetchedAsset::Absent => {
                debug!(asset = what, "asset unavailable");
                return None;
            }
        };
        let len = bytes.len();
        // PNG and CMYK JPEG assets are fully decoded and recompressed.
        let image = match tokio::task::spawn_blocking(move || PdfImage::decode(&bytes)).await {
            Ok(image) => image,
            Err(err) => {
                warn!(asset = what, %url, %err, "image decode task failed");
                return None;
            }
        };
        if image.is_none() {
            warn!(asset = what, %url, bytes = len, "asset is not a decodable image");
        }
        image
    }
}

/// Download filename of the application form.
#[must_use]
pub fn application_filename(form_no: &str) -> String {
    format!("Application_{}.pdf", form_no.replace('/', "_"))
}

/// Download filename of the acknowledgement receipt.
#[must_use]
pub fn receipt_filename(form_no: &str) -> String {
    format!("Acknowledgement_{}.pdf", form_no.replace('/', "_"))
}

/// Submission time in India Standard Time, e.g. `19-Oct-2026, 3:45 pm`.
#[must_use]
pub fn submission_timestamp(at: DateTime<Utc>) -> String {
    let ist = FixedOffset::east_opt(IST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix());
    at.with_timezone(&ist).format("%d-%b-%Y, %-I:%M %P").to_string()
}

/// Generation time in server-local time, e.g. `10/19/2026, 3:45:07 PM`.
#[must_use]
pub fn generation_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Current server-local generation time.
#[must_use]
pub fn generated_now() -> String {
    generation_timestamp(&Local::now())
}
