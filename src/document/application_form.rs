//! Application form layout.

use std::io::Write;

use tracing::{info, info_span, warn, Instrument};

use super::canvas::{Canvas, Rgb, TextStyle};
use super::metrics::Font;
use super::pdf::{PdfImage, PdfStreamWriter};
use super::rows::{address_block, field_row, split_row, ADDRESS_HEIGHT, ROW_HEIGHT};
use super::{Compositor, PhotoOutcome, RenderReport, PAGE_HEIGHT, PAGE_WIDTH};
use crate::models::worker::{WorkerProfile, WorkerRecord};
use crate::qr;
use crate::Result;

const LEFT: f64 = 50.0;
const FULL_WIDTH: f64 = 495.0;
const PART_ONE_TOP: f64 = 182.0;

const PHOTO_X: f64 = 475.0;
const PHOTO_Y: f64 = 165.0;
const PHOTO_W: f64 = 70.0;
const PHOTO_H: f64 = 85.0;

const DECLARATION_HEIGHT: f64 = 85.0;
const OFFICIAL_HEIGHT: f64 = 110.0;

/// QR raster is encoded at this size and scaled down on the page.
const QR_PIXELS: u32 = 60;
const QR_SIDE: f64 = 42.0;

const BAND_FILL: Rgb = Rgb(0xee, 0xee, 0xee);
const MUTED: Rgb = Rgb(0x99, 0x99, 0x99);
const FAINT: Rgb = Rgb(0xcc, 0xcc, 0xcc);
const CAPTION: Rgb = Rgb(0x44, 0x44, 0x44);

const BLANK_ZONE: &str = "__________________";
const BLANK_FIELD: &str = "______________________";

fn declaration_text(name: Option<&str>) -> String {
    let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("the applicant");
    format!(
        "I, {name}, hereby declare that all information given above is true and correct to the \
         best of my knowledge and belief. I further affirm that this declaration is made in sound \
         state of mine and good health without any peer & pressure or any undue influence. I \
         understand that providing false or misleading information may lead to cancellation of my \
         application or legal action as per company rules."
    )
}

impl Compositor {
    /// Render the application form for `record` into `sink`.
    ///
    /// `host` is embedded in the verification URL behind the QR code.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the sink rejects a write. Unavailable
    /// decorations and QR failures are not errors.
    pub async fn application_form<W: Write + Send>(
        &self,
        record: &WorkerRecord,
        host: &str,
        sink: W,
    ) -> Result<RenderReport> {
        let span = info_span!("application_form", form_no = %record.form_no);
        self.render_application_form(record, host, sink)
            .instrument(span)
            .await
    }

    async fn render_application_form<W: Write + Send>(
        &self,
        record: &WorkerRecord,
        host: &str,
        sink: W,
    ) -> Result<RenderReport> {
        let mut writer = PdfStreamWriter::new(sink)?;
        let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT, 0.0);

        let decoration_embedded = match self.fetch_image(&self.background_url, "background").await {
            Some(image) => {
                let name = writer.add_image(&image)?;
                canvas.image(&name, 0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT);
                true
            }
            None => false,
        };

        let photo = self
            .draw_photo(&mut writer, &mut canvas, record.photo_url.as_deref())
            .await?;

        draw_header(&mut canvas, &record.form_no);
        let y = draw_part_one(&mut canvas, &record.profile);
        let y = draw_part_two(&mut canvas, &record.profile, y);
        let y = draw_declaration(&mut canvas, record.profile.name.as_deref(), y + 12.0);

        let official_top = y + DECLARATION_HEIGHT + 20.0;
        draw_official_box(&mut canvas, record.zone.as_deref(), official_top);

        let verification_url = qr::verification_url(host, &record.id);
        let qr_embedded = match qr::encode(&verification_url, QR_PIXELS) {
            Ok(raster) => {
                let name = writer.add_image(&PdfImage::from_gray(&raster)?)?;
                let (x, y) = (385.0, official_top + 45.0);
                canvas.image(&name, x, y, QR_SIDE, QR_SIDE);
                canvas.link(x, y, QR_SIDE, QR_SIDE, &verification_url);
                canvas.text(
                    "SCAN TO VERIFY",
                    380.0,
                    official_top + 90.0,
                    &TextStyle::new(Font::Regular, 5.5, CAPTION).width(55.0).centered(),
                );
                true
            }
            Err(err) => {
                warn!(%err, "verification qr omitted");
                false
            }
        };

        draw_seal(&mut canvas, official_top + 28.0);

        let (content, links) = canvas.finish();
        let bytes_written = writer.finish(
            (PAGE_WIDTH, PAGE_HEIGHT),
            &content,
            &links,
            &format!("Application {}", record.form_no),
        )?;

        info!(bytes_written, ?photo, decoration_embedded, qr_embedded, "application form rendered");
        Ok(RenderReport {
            decoration_embedded,
            photo: Some(photo),
            qr_embedded,
            verification_url: Some(verification_url),
            bytes_written,
        })
    }

    async fn draw_photo<W: Write + Send>(
        &self,
        writer: &mut PdfStreamWriter<W>,
        canvas: &mut Canvas,
        photo_url: Option<&str>,
    ) -> Result<PhotoOutcome> {
        canvas.stroke_rect(PHOTO_X, PHOTO_Y, PHOTO_W, PHOTO_H, Rgb::NAVY, 0.8);

        let Some(url) = photo_url.filter(|u| !u.trim().is_empty()) else {
            draw_photo_placeholder(canvas, "BLUE BACKGROUND PHOTO", 7.0, FAINT);
            return Ok(PhotoOutcome::NotProvided);
        };

        if let Some(image) = self.fetch_image(url, "photo").await {
            let name = writer.add_image(&image)?;
            canvas.image(&name, PHOTO_X + 1.5, PHOTO_Y + 1.5, PHOTO_W - 3.0, PHOTO_H - 3.0);
            return Ok(PhotoOutcome::Embedded);
        }

        draw_photo_placeholder(canvas, "NO PHOTO", 6.0, MUTED);
        Ok(PhotoOutcome::Unavailable)
    }
}

fn draw_photo_placeholder(canvas: &mut Canvas, label: &str, size: f64, color: Rgb) {
    canvas.stroke_rect(PHOTO_X + 2.0, PHOTO_Y + 2.0, PHOTO_W - 4.0, PHOTO_H - 4.0, Rgb::NAVY, 0.8);
    canvas.text(label, PHOTO_X + 5.0, PHOTO_Y + 35.0, &TextStyle::new(Font::Regular, size, color));
}

fn draw_header(canvas: &mut Canvas, form_no: &str) {
    canvas.text(
        &format!("FORM NO: {form_no}"),
        55.0,
        138.0,
        &TextStyle::new(Font::Bold, 8.5, Rgb::RED),
    );
    canvas.fill_rect(LEFT, 148.0, FULL_WIDTH, 22.0, Rgb::NAVY);
    canvas.text(
        "APPLICATION FORM FOR REGISTRATION",
        LEFT,
        155.0,
        &TextStyle::new(Font::Bold, 11.0, Rgb::WHITE).width(FULL_WIDTH).centered(),
    );
    canvas.fill_rect(LEFT, 170.0, FULL_WIDTH, 12.0, BAND_FILL);
    canvas.text(
        "PART 1",
        LEFT,
        173.0,
        &TextStyle::new(Font::Bold, 8.0, Rgb::NAVY).width(FULL_WIDTH).centered(),
    );
}

/// Personal details and both addresses. Returns the top of the Part 2 rows.
fn draw_part_one(canvas: &mut Canvas, p: &WorkerProfile) -> f64 {
    let mut y = PART_ONE_TOP;
    field_row(canvas, y, "Designation", p.designation.as_deref());
    y += ROW_HEIGHT;
    field_row(canvas, y, "Full Name", p.name.as_deref());
    y += ROW_HEIGHT;
    field_row(canvas, y, "Father/Husband Name", p.fh_name.as_deref());
    y += ROW_HEIGHT;
    split_row(canvas, y, ("Date of Birth", p.dob.as_deref()), ("Gender", p.sex.as_deref()));
    y += ROW_HEIGHT;
    split_row(
        canvas,
        y,
        ("Category", p.category.as_deref()),
        ("Blood Group", p.blood_group.as_deref()),
    );
    y += ROW_HEIGHT;
    field_row(canvas, y, "Marital Status", p.marital_status.as_deref());
    y += ROW_HEIGHT;
    split_row(
        canvas,
        y,
        ("Contact No", p.mobile_no.as_deref()),
        ("Email ID", p.email.as_deref()),
    );
    y += ROW_HEIGHT;

    address_block(canvas, y, "COMMUNICATION ADDRESS", p.communication_address.as_deref());
    y += ADDRESS_HEIGHT;
    address_block(canvas, y, "PERMANENT ADDRESS", p.address.as_deref());
    y += ADDRESS_HEIGHT + 8.0;

    canvas.fill_rect(LEFT, y, FULL_WIDTH, 18.0, BAND_FILL);
    canvas.text(
        "PART 2",
        LEFT,
        y + 5.0,
        &TextStyle::new(Font::Bold, 9.0, Rgb::NAVY).width(FULL_WIDTH).centered(),
    );
    y + 18.0
}

/// Identity and bank details. Returns the bottom of the last row.
fn draw_part_two(canvas: &mut Canvas, p: &WorkerProfile, top: f64) -> f64 {
    let mut y = top;
    split_row(
        canvas,
        y,
        ("Aadhaar No", p.aadhaar_no.as_deref()),
        ("PAN Card No", p.pan_no.as_deref()),
    );
    y += ROW_HEIGHT;
    field_row(canvas, y, "E-Shram No", p.eshram_no.as_deref());
    y += ROW_HEIGHT;
    field_row(canvas, y, "A/C Holder Name", p.acc_name.as_deref());
    y += ROW_HEIGHT;
    field_row(canvas, y, "Bank A/C No", p.acc_no.as_deref());
    y += ROW_HEIGHT;
    split_row(
        canvas,
        y,
        ("IFSC Code", p.ifsc.as_deref()),
        ("Bank Name", p.bank_name.as_deref()),
    );
    y += ROW_HEIGHT;
    field_row(canvas, y, "Education", p.education.as_deref());
    y + ROW_HEIGHT
}

/// Declaration box at `y`. Returns `y` unchanged for chaining.
fn draw_declaration(canvas: &mut Canvas, name: Option<&str>, y: f64) -> f64 {
    canvas.stroke_rect(LEFT, y, FULL_WIDTH, DECLARATION_HEIGHT, Rgb::NAVY, 0.8);
    canvas.text(
        "DECLARATION BY APPLICANT",
        60.0,
        y + 8.0,
        &TextStyle::new(Font::Bold, 8.5, Rgb::NAVY),
    );
    canvas.text(
        &declaration_text(name),
        60.0,
        y + 20.0,
        &TextStyle::new(Font::Regular, 8.0, Rgb::BLACK)
            .width(475.0)
            .justified()
            .line_gap(1.5),
    );
    canvas.line((390.0, y + 75.0), (480.0, y + 75.0), Rgb::BLACK, 0.5);
    canvas.text(
        "APPLICANT SIGNATURE",
        390.0,
        y + 78.0,
        &TextStyle::new(Font::Regular, 7.0, Rgb::BLACK).width(90.0).centered(),
    );
    y
}

fn zone_label(zone: Option<&str>) -> String {
    match zone.map(str::trim).filter(|z| !z.is_empty()) {
        Some(zone) => zone.to_uppercase(),
        None => BLANK_ZONE.to_owned(),
    }
}

/// Office section. Division and shed are always printed blank for manual
/// entry, whatever the record holds.
fn draw_official_box(canvas: &mut Canvas, zone: Option<&str>, top: f64) {
    let label = TextStyle::new(Font::Bold, 9.0, Rgb::NAVY);
    let value = TextStyle::new(Font::Regular, 9.0, Rgb::BLACK);

    canvas.stroke_rect(LEFT, top, FULL_WIDTH, OFFICIAL_HEIGHT, Rgb::RED, 1.5);
    canvas.text(
        "FOR OFFICIAL USE ONLY",
        LEFT,
        top + 8.0,
        &TextStyle::new(Font::Bold, 10.0, Rgb::RED).width(FULL_WIDTH).centered(),
    );

    canvas.text("ZONE:", 70.0, top + 35.0, &label);
    canvas.text(&zone_label(zone), 110.0, top + 35.0, &value);
    canvas.text("DIVISION:", 260.0, top + 35.0, &label);
    canvas.text(BLANK_FIELD, 315.0, top + 35.0, &value);
    canvas.text("SHED:", 70.0, top + 60.0, &label);
    canvas.text(BLANK_FIELD, 110.0, top + 60.0, &value);

    canvas.text("VERIFIER NAME & SIGNATURE:", 70.0, top + 85.0, &label);
    canvas.line((215.0, top + 95.0), (360.0, top + 95.0), Rgb::BLACK, 0.5);
}

fn draw_seal(canvas: &mut Canvas, top: f64) {
    const X: f64 = 440.0;
    const W: f64 = 95.0;
    canvas.stroke_rect(X, top, W, 70.0, Rgb::NAVY, 0.8);
    let heading = TextStyle::new(Font::Bold, 7.0, Rgb::NAVY).width(W).centered();
    canvas.text("APPROVER'S SEAL", X, top + 8.0, &heading);
    canvas.text("& SIGNATURE", X, top + 18.0, &heading);
    canvas.text(
        "(Authorized Authority)",
        X,
        top + 58.0,
        &TextStyle::new(Font::Regular, 6.0, Rgb::NAVY).width(W).centered(),
    );
}
