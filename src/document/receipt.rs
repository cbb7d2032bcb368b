//! Acknowledgement receipt layout.

use std::io::Write;

use tracing::{info, info_span, Instrument};

use super::canvas::{Canvas, Rgb, TextStyle};
use super::metrics::Font;
use super::pdf::PdfStreamWriter;
use super::rows::value_or_na;
use super::{generated_now, submission_timestamp, Compositor, RenderReport, PAGE_HEIGHT, PAGE_WIDTH};
use crate::models::worker::WorkerRecord;
use crate::Result;

/// Page margin; bounds text drawn without an explicit width.
const MARGIN: f64 = 40.0;

const CARD_TOP: f64 = 180.0;
const ROW_PITCH: f64 = 44.0;

const INK: Rgb = Rgb(0x1a, 0x20, 0x2c);
const SLATE: Rgb = Rgb(0x2d, 0x37, 0x48);
const HAIRLINE: Rgb = Rgb(0xe2, 0xe8, 0xf0);
const LABEL: Rgb = Rgb(0x64, 0x74, 0x8b);
const FORM_NO: Rgb = Rgb(0xd3, 0x2f, 0x2f);
const SUCCESS: Rgb = Rgb(0x16, 0xa3, 0x4a);
const REVIEW: Rgb = Rgb(0xea, 0x58, 0x0c);

const LETTERHEAD_ADDRESS: &str =
    "RS. 430, 4TH FLOOR, ASMI INDUSTRIAL COMPLEX, GOREGAON WEST, MUMBAI";

const NOTE: &str = "Note: This document serves as a formal acknowledgement of your membership \
    application. Verification of documents and digital credentials are currently under review. \
    Final approval is subject to multi-level administrative validation.";

impl Compositor {
    /// Render the acknowledgement receipt for `record` into `sink`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the sink rejects a write. A missing logo
    /// is not an error.
    pub async fn receipt<W: Write + Send>(&self, record: &WorkerRecord, sink: W) -> Result<RenderReport> {
        let span = info_span!("receipt", form_no = %record.form_no);
        self.render_receipt(record, sink, generated_now()).instrument(span).await
    }

    async fn render_receipt<W: Write + Send>(
        &self,
        record: &WorkerRecord,
        sink: W,
        generated_at: String,
    ) -> Result<RenderReport> {
        let mut writer = PdfStreamWriter::new(sink)?;
        let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT, MARGIN);

        canvas.fill_rect(0.0, 0.0, PAGE_WIDTH, 90.0, Rgb::NAVY);
        let decoration_embedded = match self.fetch_image(&self.logo_url, "logo").await {
            Some(image) => {
                let name = writer.add_image(&image)?;
                canvas.image(&name, 20.0, 15.0, 55.0, 55.0);
                true
            }
            None => false,
        };

        draw_letterhead(&mut canvas);
        draw_title(&mut canvas);
        draw_card(&mut canvas, record);
        draw_note(&mut canvas);
        draw_signatures(&mut canvas);
        draw_footer(&mut canvas, &generated_at);

        let (content, links) = canvas.finish();
        let bytes_written = writer.finish(
            (PAGE_WIDTH, PAGE_HEIGHT),
            &content,
            &links,
            &format!("Acknowledgement {}", record.form_no),
        )?;

        info!(bytes_written, decoration_embedded, "receipt rendered");
        Ok(RenderReport {
            decoration_embedded,
            photo: None,
            qr_embedded: false,
            verification_url: None,
            bytes_written,
        })
    }
}

fn draw_letterhead(canvas: &mut Canvas) {
    canvas.text(
        "SHRAMJIVI GOODSHED WORKERS",
        85.0,
        25.0,
        &TextStyle::new(Font::Bold, 14.0, Rgb::WHITE),
    );
    canvas.text(
        "MANAGEMENT CORPORATION LIMITED",
        85.0,
        40.0,
        &TextStyle::new(Font::Bold, 12.0, Rgb::WHITE),
    );
    canvas.text(
        LETTERHEAD_ADDRESS,
        85.0,
        55.0,
        &TextStyle::new(Font::Regular, 7.5, Rgb::WHITE),
    );
    canvas.text(
        "MEMBER REGISTRATION ACKNOWLEDGEMENT",
        85.0,
        68.0,
        &TextStyle::new(Font::Bold, 9.0, Rgb::WHITE),
    );
}

fn draw_title(canvas: &mut Canvas) {
    canvas.text(
        "OFFICIAL ACKNOWLEDGEMENT",
        0.0,
        130.0,
        &TextStyle::new(Font::Bold, 18.0, INK).centered(),
    );
    canvas.line((220.0, 150.0), (375.0, 150.0), Rgb::NAVY, 1.5);
}

fn draw_card(canvas: &mut Canvas, record: &WorkerRecord) {
    canvas.stroke_rect(50.0, CARD_TOP, 495.0, 220.0, HAIRLINE, 0.5);
    canvas.fill_rect(50.5, CARD_TOP + 0.5, 494.0, 45.0, Rgb(0xf8, 0xfa, 0xfc));
    canvas.text(
        "APPLICATION FORM NUMBER",
        75.0,
        CARD_TOP + 18.0,
        &TextStyle::new(Font::Bold, 10.0, Rgb(0x4a, 0x55, 0x68)),
    );
    canvas.text(
        &record.form_no,
        260.0,
        CARD_TOP + 16.0,
        &TextStyle::new(Font::Bold, 14.0, FORM_NO),
    );

    let name = record.profile.name.as_deref().map(str::to_uppercase);
    let submitted = submission_timestamp(record.created_at);
    let rows: [(&str, &str, Rgb); 4] = [
        ("WORKER FULL NAME", value_or_na(name.as_deref()), INK),
        ("SUBMISSION TIMESTAMP", submitted.as_str(), SLATE),
        ("SUBMISSION STATUS", "SUCCESSFULLY RECEIVED", SUCCESS),
        ("INTERNAL VERIFICATION", "UNDER ADMINISTRATIVE REVIEW", REVIEW),
    ];

    let mut y = CARD_TOP + 45.0;
    for (label, value, color) in rows {
        canvas.line((50.0, y), (545.0, y), HAIRLINE, 0.5);
        canvas.text(label, 75.0, y + 14.0, &TextStyle::new(Font::Bold, 9.0, LABEL));
        canvas.text(value, 260.0, y + 13.0, &TextStyle::new(Font::Regular, 11.0, color));
        y += ROW_PITCH;
    }
}

fn draw_note(canvas: &mut Canvas) {
    canvas.fill_rect(50.0, 430.0, 495.0, 60.0, Rgb(0xf1, 0xf5, 0xf9));
    canvas.text(
        NOTE,
        70.0,
        445.0,
        &TextStyle::new(Font::Regular, 8.5, Rgb(0x47, 0x55, 0x69))
            .width(455.0)
            .justified(),
    );
}

fn draw_signatures(canvas: &mut Canvas) {
    const Y: f64 = 620.0;
    let rule = Rgb(0xcb, 0xd5, 0xe0);
    canvas.line((50.0, Y), (180.0, Y), rule, 0.5);
    canvas.line((415.0, Y), (545.0, Y), rule, 0.5);
    let caption = TextStyle::new(Font::Bold, 8.0, SLATE).width(130.0).centered();
    canvas.text("SYSTEM ADMINISTRATOR", 50.0, Y + 8.0, &caption);
    canvas.text("AUTHORIZED SIGNATORY", 415.0, Y + 8.0, &caption);
}

/// Footer band. The generation line stays inside the band on the same page.
fn draw_footer(canvas: &mut Canvas, generated_at: &str) {
    canvas.fill_rect(0.0, 770.0, PAGE_WIDTH, 71.0, Rgb::NAVY);
    canvas.text(
        &format!("AUTHENTICATED GENERATION ON: {generated_at}"),
        0.0,
        802.0,
        &TextStyle::new(Font::Regular, 7.5, Rgb::WHITE).centered(),
    );
}
