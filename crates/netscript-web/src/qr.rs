//! QR code rendering for sharing a script to a phone.

use qrcodegen::{QrCode, QrCodeEcc};

/// Shown when the script does not fit in a single QR code.
pub const QR_TOO_LONG: &str =
    "This script is too long to generate a standard QR code. Please copy the text manually.";

const BORDER: i32 = 4;

/// Render `text` as an SVG QR code with low error correction.
///
/// Returns `None` when the text is empty or exceeds QR capacity.
pub fn render_svg(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let code = QrCode::encode_text(text, QrCodeEcc::Low).ok()?;
    Some(to_svg(&code))
}

fn to_svg(code: &QrCode) -> String {
    let size = code.size();
    let dimension = size + BORDER * 2;

    let mut path = String::new();
    for y in 0..size {
        for x in 0..size {
            if code.get_module(x, y) {
                if !path.is_empty() {
                    path.push(' ');
                }
                path.push_str(&format!("M{},{}h1v1h-1z", x + BORDER, y + BORDER));
            }
        }
    }

    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
            "<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n",
            "<path d=\"{1}\" fill=\"#000000\"/>\n",
            "</svg>\n"
        ),
        dimension, path
    )
}
