use std::sync::Arc;

use crate::{
    assets::decode::{DecodedImage, decode_image},
    canvas::placed::PlacedItem,
    config::CanvasConfig,
    foundation::core::{Affine, Canvas, Rgba8, Size},
    foundation::error::{CapsuleError, CapsuleResult},
    foundation::math::unpremultiply_rgba8_in_place,
    render::encode::encode_png,
};

/// Flattened snapshot in straight (non-premultiplied) RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl SnapshotFrame {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(i..i + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Renders a placed-item list into one raster, item by item in list order.
#[derive(Clone, Debug)]
pub struct SnapshotCompositor {
    canvas: Canvas,
    base_display_width: f64,
    background: Rgba8,
}

impl SnapshotCompositor {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            canvas: config.canvas,
            base_display_width: config.base_display_width,
            background: config.background,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Composite onto the background. Items whose photo is missing or does not decode are
    /// skipped; later items are drawn over earlier ones.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub fn composite(&self, items: &[PlacedItem]) -> CapsuleResult<SnapshotFrame> {
        let width_u16: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| CapsuleError::encode("snapshot width exceeds u16"))?;
        let height_u16: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| CapsuleError::encode("snapshot height exceeds u16"))?;
        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let bg = self.background;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        let center = self.canvas.center();
        for placed in items {
            let Some(paint) = item_paint(placed) else {
                continue;
            };
            let affine = placed.transform.placement_affine(
                Size::new(paint.w, paint.h),
                self.base_display_width,
                center,
            );

            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(affine));
            ctx.set_paint(paint.paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, paint.w, paint.h));
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Ok(SnapshotFrame {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
        })
    }

    /// [`Self::composite`] followed by PNG encoding; the blob stored on the outfit.
    pub fn composite_png(&self, items: &[PlacedItem]) -> CapsuleResult<Vec<u8>> {
        let frame = self.composite(items)?;
        encode_png(&frame)
    }
}

struct ImagePaint {
    paint: vello_cpu::Image,
    w: f64,
    h: f64,
}

fn item_paint(placed: &PlacedItem) -> Option<ImagePaint> {
    let Some(bytes) = placed.item.image_bytes() else {
        tracing::warn!(item = %placed.item_id(), "item has no photo; skipped");
        return None;
    };
    let decoded = match decode_image(bytes) {
        Ok(img) => img,
        Err(err) => {
            tracing::warn!(item = %placed.item_id(), error = %err, "item photo unreadable; skipped");
            return None;
        }
    };
    let pixmap = match pixmap_from_premul(&decoded) {
        Ok(p) => p,
        Err(err) => {
            tracing::warn!(item = %placed.item_id(), error = %err, "item photo unusable; skipped");
            return None;
        }
    };
    Some(ImagePaint {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        w: f64::from(decoded.width),
        h: f64::from(decoded.height),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul(img: &DecodedImage) -> CapsuleResult<vello_cpu::Pixmap> {
    let w: u16 = img
        .width
        .try_into()
        .map_err(|_| CapsuleError::encode("image width exceeds u16"))?;
    let h: u16 = img
        .height
        .try_into()
        .map_err(|_| CapsuleError::encode("image height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(CapsuleError::encode("image has zero area"));
    }
    if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
        return Err(CapsuleError::encode("decoded image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(img.width as usize * img.height as usize);
    for px in img.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
