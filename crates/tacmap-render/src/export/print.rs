//! Standalone print document.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// HTML page showing only `png`, which prints itself once the image has
/// loaded and then closes.
pub fn print_document(png: &[u8], title: &str) -> String {
    let data = STANDARD.encode(png);
    format!(
        concat!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>",
            "<style>@page{{size:landscape;margin:0}}html,body{{margin:0;background:#000}}",
            "img{{display:block;width:100%;height:auto}}</style></head>",
            "<body><img src=\"data:image/png;base64,{data}\" onload=\"window.print();window.close()\">",
            "</body></html>"
        ),
        title = crate::svg::escape(title),
        data = data
    )
}
