//! Receipt PDF export: lay out, rasterize on a canvas, wrap in a PDF and
//! hand it to the browser as a download.

mod canvas;
pub mod layout;
mod pdf;

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::config::config;
use crate::error::AppError;
use crate::models::Receipt;
use layout::ReceiptSheet;

/// How long the blob URL stays alive after the download click. Revoking it
/// in the same tick cancels the download in some browsers.
const REVOKE_AFTER_MS: u32 = 40_000;

/// At most one export at a time per holder of the flag.
#[derive(Clone, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.get()
    }

    pub fn try_acquire(&self) -> Option<BusyGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(BusyGuard(self.0.clone()))
    }
}

impl PartialEq for BusyFlag {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Clears the flag on drop, including when the export bails out early.
pub struct BusyGuard(Rc<Cell<bool>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub async fn download(receipt: &Receipt) -> Result<String, AppError> {
    let sheet = ReceiptSheet::build(receipt, &config().receipt_logo);
    let raster = canvas::rasterize(&sheet).await?;
    let bytes = pdf::single_page(
        &raster.jpeg,
        raster.width,
        raster.height,
        &format!("Receipt {}", sheet.receipt_number),
    );
    save(&bytes, &sheet.file_name)?;
    info!("Receipt saved as {} ({} bytes)", sheet.file_name, bytes.len());
    Ok(sheet.file_name)
}

fn save(bytes: &[u8], file_name: &str) -> Result<(), AppError> {
    let render = |e: wasm_bindgen::JsValue| AppError::Render(format!("download: {e:?}"));
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Render("no document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| AppError::Render("no document body".to_string()))?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(render)?;
    let href = Url::create_object_url_with_blob(&blob).map_err(render)?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(render)?
        .dyn_into()
        .map_err(|_| AppError::Render("not an anchor".to_string()))?;
    anchor.set_href(&href);
    anchor.set_download(file_name);
    body.append_child(&anchor).map_err(render)?;
    anchor.click();
    anchor.remove();
    Timeout::new(REVOKE_AFTER_MS, move || {
        if let Err(e) = Url::revoke_object_url(&href) {
            warn!("Could not revoke receipt URL: {:?}", e);
        }
    })
    .forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_flag_admits_one() {
        let flag = BusyFlag::default();
        let guard = flag.try_acquire();
        assert!(guard.is_some());
        assert!(flag.is_busy());
        assert!(flag.clone().try_acquire().is_none());
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn test_download_url_outlives_click() {
        assert!(REVOKE_AFTER_MS >= 1_000);
    }
}
