use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use log::{info, warn};

const AVATAR_SIZE: u32 = 40;

/// Resolve a stored avatar reference to displayable PNG bytes.
///
/// Any failure along the way (no reference, unreadable file, bytes that do
/// not decode as an image) falls back to the bundled default avatar; a
/// broken reference is never an error for the rest of the app.
pub fn load_avatar(reference: Option<&str>) -> Vec<u8> {
    let Some(path) = reference else {
        return default_avatar();
    };

    info!("Loading image from ref={path}");

    match std::fs::read(path) {
        Ok(bytes) => {
            if image::load_from_memory(&bytes).is_ok() {
                bytes
            } else {
                warn!("avatar ref {path} does not decode as an image, using default");
                default_avatar()
            }
        }
        Err(err) => {
            warn!("failed to read avatar ref {path}: {err}, using default");
            default_avatar()
        }
    }
}

/// Flat placeholder rendered in-process so no bundled asset is needed.
pub fn default_avatar() -> Vec<u8> {
    let image = RgbaImage::from_pixel(AVATAR_SIZE, AVATAR_SIZE, Rgba([0x9e, 0x9e, 0x9e, 0xff]));
    let mut bytes = Vec::new();
    // Encoding a solid in-memory buffer to PNG cannot fail
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap_or_else(|err| unreachable!("PNG encode of in-memory buffer failed: {err}"));
    bytes
}
