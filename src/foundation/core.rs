use std::{fmt, str::FromStr};

use crate::foundation::error::{CapsuleError, CapsuleResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Allocate a fresh random identifier.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CapsuleError;

            fn from_str(s: &str) -> CapsuleResult<Self> {
                uuid::Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| {
                        CapsuleError::validation(format!(
                            "invalid {} '{s}': {e}",
                            stringify!($name)
                        ))
                    })
            }
        }
    };
}

uuid_id!(
    /// Stable catalog identifier of a clothing item, assigned outside this engine.
    ItemId
);
uuid_id!(
    /// Session-local identifier of one item placed on the canvas.
    PlacedItemId
);
uuid_id!(
    /// Identifier of a persisted outfit.
    OutfitId
);

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> CapsuleResult<Self> {
        if width == 0 || height == 0 {
            return Err(CapsuleError::validation("canvas width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Canvas midpoint; item offsets are measured from here.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}
