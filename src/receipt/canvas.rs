//! Draws a [`ReceiptSheet`] onto a detached canvas and reads it back as JPEG.
#![allow(deprecated)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::layout::*;
use crate::error::AppError;

/// Device pixels per layout pixel.
pub const SCALE: f64 = 2.0;
const JPEG_QUALITY: f64 = 0.92;

const BRAND: &str = "#14532d";
const ACCENT: &str = "#16a34a";
const INK: &str = "#111827";
const MUTED: &str = "#6b7280";
const RULE: &str = "#e5e7eb";
const PANEL: &str = "#f3f4f6";

pub struct Raster {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

fn js_err(context: &str) -> impl Fn(JsValue) -> AppError + '_ {
    move |e| AppError::Render(format!("{context}: {e:?}"))
}

pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, AppError> {
    let (_, encoded) = data_url
        .split_once(";base64,")
        .ok_or_else(|| AppError::Render("canvas returned an unexpected data URL".to_string()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Render(format!("canvas data: {e}")))
}

async fn load_image(src: &str) -> Result<HtmlImageElement, AppError> {
    let img = HtmlImageElement::new().map_err(js_err("image"))?;
    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_cross_origin(Some("anonymous"));
    img.set_src(src);
    JsFuture::from(loaded).await.map_err(js_err("logo"))?;
    img.set_onload(None);
    img.set_onerror(None);
    Ok(img)
}

pub async fn rasterize(sheet: &ReceiptSheet) -> Result<Raster, AppError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Render("no document".to_string()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_err("canvas"))?
        .dyn_into()
        .map_err(|_| AppError::Render("not a canvas".to_string()))?;

    let width = (SHEET_WIDTH * SCALE).round() as u32;
    let height = (sheet.height() * SCALE).round() as u32;
    canvas.set_width(width);
    canvas.set_height(height);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(js_err("context"))?
        .ok_or_else(|| AppError::Render("2d context unavailable".to_string()))?
        .dyn_into()
        .map_err(|_| AppError::Render("2d context unavailable".to_string()))?;
    ctx.scale(SCALE, SCALE).map_err(js_err("scale"))?;

    let logo = match load_image(&sheet.logo).await {
        Ok(img) => Some(img),
        Err(e) => {
            warn!("Receipt logo unavailable, continuing without it: {e}");
            None
        }
    };

    paint(&ctx, sheet, logo.as_ref())?;

    let data_url = canvas
        .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(JPEG_QUALITY))
        .map_err(js_err("encode"))?;
    Ok(Raster {
        jpeg: decode_data_url(&data_url)?,
        width,
        height,
    })
}

fn fill(ctx: &CanvasRenderingContext2d, color: &str) {
    ctx.set_fill_style(&JsValue::from_str(color));
}

fn text(
    ctx: &CanvasRenderingContext2d,
    value: &str,
    x: f64,
    y: f64,
    font: &str,
    color: &str,
    align: &str,
) -> Result<(), AppError> {
    ctx.set_font(font);
    ctx.set_text_align(align);
    fill(ctx, color);
    ctx.fill_text(value, x, y).map_err(js_err("text"))
}

fn rule(ctx: &CanvasRenderingContext2d, y: f64) {
    ctx.set_stroke_style(&JsValue::from_str(RULE));
    ctx.set_line_width(1.0);
    ctx.begin_path();
    ctx.move_to(MARGIN, y);
    ctx.line_to(SHEET_WIDTH - MARGIN, y);
    ctx.stroke();
}

fn paint(
    ctx: &CanvasRenderingContext2d,
    sheet: &ReceiptSheet,
    logo: Option<&HtmlImageElement>,
) -> Result<(), AppError> {
    let height = sheet.height();
    let right = SHEET_WIDTH - MARGIN;

    // jpeg has no alpha; start from white
    fill(ctx, "#ffffff");
    ctx.fill_rect(0.0, 0.0, SHEET_WIDTH, height);
    fill(ctx, BRAND);
    ctx.fill_rect(0.0, 0.0, SHEET_WIDTH, 8.0);

    let mut text_x = MARGIN;
    if let Some(img) = logo {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, MARGIN, 36.0, LOGO_SIZE, LOGO_SIZE)
            .map_err(js_err("logo"))?;
        text_x += LOGO_SIZE + 16.0;
    }
    text(ctx, "NACOS", text_x, 62.0, "bold 26px sans-serif", BRAND, "left")?;
    text(ctx, sheet.organisation, text_x, 86.0, "13px sans-serif", MUTED, "left")?;
    text(ctx, sheet.title, right, 58.0, "bold 20px sans-serif", INK, "right")?;
    text(
        ctx,
        &format!("No. {}", sheet.receipt_number),
        right,
        82.0,
        "13px sans-serif",
        MUTED,
        "right",
    )?;
    text(ctx, &sheet.issued, right, 102.0, "13px sans-serif", MUTED, "right")?;
    rule(ctx, HEADER_HEIGHT - 16.0);

    let mut y = HEADER_HEIGHT;
    for section in &sheet.sections {
        y += SECTION_GAP;
        text(ctx, section.title, MARGIN, y + 20.0, "bold 15px sans-serif", BRAND, "left")?;
        y += SECTION_TITLE_HEIGHT;
        for row in &section.rows {
            text(ctx, row.label, MARGIN, y + 20.0, "14px sans-serif", MUTED, "left")?;
            text(ctx, &row.value, right, y + 20.0, "600 14px sans-serif", INK, "right")?;
            y += ROW_HEIGHT;
        }
        rule(ctx, y + 6.0);
    }

    y += SECTION_GAP;
    fill(ctx, PANEL);
    ctx.fill_rect(MARGIN, y, SHEET_WIDTH - 2.0 * MARGIN, TOTAL_HEIGHT - 12.0);
    text(ctx, "Total paid", MARGIN + 20.0, y + 38.0, "bold 16px sans-serif", INK, "left")?;
    text(ctx, &sheet.total, right - 20.0, y + 40.0, "bold 22px sans-serif", ACCENT, "right")?;
    y += TOTAL_HEIGHT;

    text(
        ctx,
        sheet.footer,
        SHEET_WIDTH / 2.0,
        y + 40.0,
        "12px sans-serif",
        MUTED,
        "center",
    )?;
    fill(ctx, ACCENT);
    ctx.fill_rect(0.0, height - 8.0, SHEET_WIDTH, 8.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_data_url("data:image/jpeg;base64,/9j/4AA=").unwrap();
        assert_eq!(bytes, vec![0xff, 0xd8, 0xff, 0xe0, 0x00]);
    }

    #[test]
    fn test_decode_rejects_plain_url() {
        assert!(matches!(
            decode_data_url("data:,"),
            Err(AppError::Render(_))
        ));
    }
}
