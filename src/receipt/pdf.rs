use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

/// A4 width in points.
pub const PAGE_WIDTH: f32 = 595.28;

const IMAGE_NAME: Name<'static> = Name(b"Receipt");

/// One A4-wide page whose height follows the raster's aspect ratio.
pub fn page_size(px_width: u32, px_height: u32) -> (f32, f32) {
    let ratio = px_height as f32 / px_width.max(1) as f32;
    (PAGE_WIDTH, PAGE_WIDTH * ratio)
}

/// Wraps a JPEG raster in a single-page PDF, scaled to fill the page.
pub fn single_page(jpeg: &[u8], px_width: u32, px_height: u32, title: &str) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let info_id = Ref::new(6);

    let (width, height) = page_size(px_width, px_height);
    let mut pdf = Pdf::new();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, width, height));
    page.parent(pages_id);
    page.contents(content_id);
    page.resources().x_objects().pair(IMAGE_NAME, image_id);
    page.finish();

    let mut image = pdf.image_xobject(image_id, jpeg);
    image.filter(Filter::DctDecode);
    image.width(px_width as i32);
    image.height(px_height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([width, 0.0, 0.0, height, 0.0, 0.0]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr("NACOS Dues Portal"));

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_page_follows_aspect_ratio() {
        let (w, h) = page_size(1600, 2400);
        assert_eq!(w, PAGE_WIDTH);
        assert!((h - PAGE_WIDTH * 1.5).abs() < 0.01);
    }

    #[test]
    fn test_single_page_embeds_jpeg() {
        let jpeg = [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0xff, 0xd9];
        let bytes = single_page(&jpeg, 1600, 2000, "Receipt RCP-0001");
        assert!(bytes.starts_with(b"%PDF"));
        assert!(contains(&bytes, b"/DCTDecode"));
        assert!(contains(&bytes, &jpeg));
        assert!(contains(&bytes, b"/Count 1"));
    }
}
