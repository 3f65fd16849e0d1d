//! PDF document with an optional cover page.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

/// A4 landscape in points.
pub const PAGE_WIDTH: f32 = 841.89;
pub const PAGE_HEIGHT: f32 = 595.28;

const COVER_BACKGROUND: (f32, f32, f32) = (0.07, 0.08, 0.10);
const TITLE_SIZE: f32 = 40.0;
const SUBTITLE_SIZE: f32 = 20.0;
/// Average Helvetica-Bold advance as a fraction of the font size.
const HELVETICA_BOLD_ADVANCE: f32 = 0.58;

/// Text for the cover page.
#[derive(Debug, Clone, Copy)]
pub struct Cover<'a> {
    pub title: &'a str,
    pub map: &'a str,
}

/// Build a PDF whose last page shows `jpeg` scaled to the page width and
/// centred. A cover page comes first when `cover` is given.
pub fn build_pdf(jpeg: &[u8], width: u32, height: u32, cover: Option<Cover<'_>>) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let font_id = alloc.bump();
    let image_id = alloc.bump();
    let cover_ids = cover.map(|_| (alloc.bump(), alloc.bump()));
    let image_page_id = alloc.bump();
    let image_content_id = alloc.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);

    let mut kids = Vec::new();
    if let Some((page_id, _)) = cover_ids {
        kids.push(page_id);
    }
    kids.push(image_page_id);
    pdf.pages(page_tree_id).kids(kids.iter().copied()).count(kids.len() as i32);

    let media_box = Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT);

    if let (Some(cover), Some((page_id, content_id))) = (cover, cover_ids) {
        pdf.type1_font(font_id).base_font(Name(b"Helvetica-Bold"));

        let mut page = pdf.page(page_id);
        page.media_box(media_box);
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(Name(b"F1"), font_id);
        page.finish();

        pdf.stream(content_id, &cover_content(cover).finish());
    }

    let mut image = pdf.image_xobject(image_id, jpeg);
    image.filter(Filter::DctDecode);
    image.width(width as i32);
    image.height(height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut page = pdf.page(image_page_id);
    page.media_box(media_box);
    page.parent(page_tree_id);
    page.contents(image_content_id);
    page.resources().x_objects().pair(Name(b"Im1"), image_id);
    page.finish();

    let (w, h, x, y) = fit_to_page(width as f32, height as f32);
    let mut content = Content::new();
    content.set_fill_rgb(0.0, 0.0, 0.0);
    content.rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT);
    content.fill_nonzero();
    content.save_state();
    content.transform([w, 0.0, 0.0, h, x, y]);
    content.x_object(Name(b"Im1"));
    content.restore_state();
    pdf.stream(image_content_id, &content.finish());

    pdf.finish()
}

/// Size and lower-left corner of an image scaled to the page width,
/// shrunk further if it would overflow the height.
fn fit_to_page(width: f32, height: f32) -> (f32, f32, f32, f32) {
    let mut scale = PAGE_WIDTH / width;
    if height * scale > PAGE_HEIGHT {
        scale = PAGE_HEIGHT / height;
    }
    let (w, h) = (width * scale, height * scale);
    (w, h, (PAGE_WIDTH - w) / 2.0, (PAGE_HEIGHT - h) / 2.0)
}

fn cover_content(cover: Cover<'_>) -> Content {
    let mut content = Content::new();
    let (r, g, b) = COVER_BACKGROUND;
    content.set_fill_rgb(r, g, b);
    content.rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT);
    content.fill_nonzero();

    let title = winansi(cover.title);
    let map = winansi(cover.map);
    content.set_fill_rgb(1.0, 1.0, 1.0);
    centered_line(&mut content, &title, TITLE_SIZE, PAGE_HEIGHT / 2.0 + 10.0);
    content.set_fill_rgb(0.7, 0.7, 0.7);
    centered_line(&mut content, &map, SUBTITLE_SIZE, PAGE_HEIGHT / 2.0 - 30.0);
    content
}

fn centered_line(content: &mut Content, text: &[u8], size: f32, baseline: f32) {
    let width = text.len() as f32 * size * HELVETICA_BOLD_ADVANCE;
    content.begin_text();
    content.set_font(Name(b"F1"), size);
    content.next_line(((PAGE_WIDTH - width) / 2.0).max(24.0), baseline);
    content.show(Str(text));
    content.end_text();
}

/// Latin-1 bytes for the standard font; anything else becomes `?`.
fn winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            0x20..=0x7e | 0xa0..=0xff => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_pdf_without_cover_has_one_page() {
        let pdf = build_pdf(&[0xFF, 0xD8, 0xFF, 0xD9], 3200, 1800, None);
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(count(&pdf, b"/Count 1"), 1);
        assert_eq!(count(&pdf, b"/DCTDecode"), 1);
        assert_eq!(count(&pdf, b"Helvetica-Bold"), 0);
    }

    #[test]
    fn test_pdf_with_cover_has_two_pages() {
        let cover = Cover { title: "Week 3 Finals", map: "Alpine" };
        let pdf = build_pdf(&[0xFF, 0xD8, 0xFF, 0xD9], 3200, 1800, Some(cover));
        assert_eq!(count(&pdf, b"/Count 2"), 1);
        assert_eq!(count(&pdf, b"Helvetica-Bold"), 1);
        assert_eq!(count(&pdf, b"(Week 3 Finals)"), 1);
        assert_eq!(count(&pdf, b"(Alpine)"), 1);
    }

    #[test]
    fn test_fit_to_page_keeps_aspect() {
        let (w, h, x, y) = fit_to_page(3200.0, 1800.0);
        assert!((w - PAGE_WIDTH).abs() < 0.01);
        assert!((w / h - 16.0 / 9.0).abs() < 0.001);
        assert!(x.abs() < 0.01);
        assert!((y - (PAGE_HEIGHT - h) / 2.0).abs() < 0.01);

        // Tall images are limited by the height instead.
        let (w, h, x, _) = fit_to_page(100.0, 200.0);
        assert!((h - PAGE_HEIGHT).abs() < 0.01);
        assert!((x - (PAGE_WIDTH - w) / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_winansi_replaces_unsupported() {
        assert_eq!(winansi("Café 日本"), b"Caf\xe9 ??".to_vec());
    }
}
