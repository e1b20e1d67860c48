use std::io::Cursor;

use crate::{
    foundation::error::{CapsuleError, CapsuleResult},
    render::compositor::SnapshotFrame,
};

/// Encode a snapshot frame as PNG.
pub fn encode_png(frame: &SnapshotFrame) -> CapsuleResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| CapsuleError::encode("snapshot buffer does not match its dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CapsuleError::encode(format!("png encode: {e}")))?;
    if buf.is_empty() {
        return Err(CapsuleError::encode("png encoder produced no bytes"));
    }
    Ok(buf)
}
