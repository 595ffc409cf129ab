use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates.
///
/// Stores both corners and the width/height so conversions between the
/// corner and top-left+size forms stay cheap.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, PartialOrd)]
pub struct DetBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub w: f32,
    pub h: f32,
}

impl DetBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            w: x2 - x1,
            h: y2 - y1,
        }
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f32 {
        self.w
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f32 {
        self.h
    }

    /// Returns the minimum x-coordinate of the bounding box.
    pub fn x_min(&self) -> f32 {
        self.x1
    }

    /// The minimum y-coordinate of the bounding box.
    pub fn y_min(&self) -> f32 {
        self.y1
    }

    /// Returns the maximum x-coordinate of the bounding box.
    pub fn x_max(&self) -> f32 {
        self.x1 + self.w
    }

    /// Returns the maximum y-coordinate of the bounding box.
    pub fn y_max(&self) -> f32 {
        self.y1 + self.h
    }

    /// Returns the center x-coordinate of the bounding box.
    pub fn cx(&self) -> f32 {
        self.x1 + self.w / 2.
    }

    /// Returns the center y-coordinate of the bounding box.
    pub fn cy(&self) -> f32 {
        self.y1 + self.h / 2.
    }

    /// Computes the area of the bounding box.
    pub fn area(&self) -> f32 {
        self.h * self.w
    }

    /// Computes the intersection area between this bounding box and another.
    pub fn intersect(&self, other: &DetBox) -> f32 {
        let left = self.x1.max(other.x1);
        let right = (self.x1 + self.w).min(other.x1 + other.w);
        let top = self.y1.max(other.y1);
        let bottom = (self.y1 + self.h).min(other.y1 + other.h);
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Computes the union area between this bounding box and another.
    pub fn union(&self, other: &DetBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Checks if this bounding box completely contains another bounding box `other`.
    pub fn contains(&self, other: &DetBox) -> bool {
        self.x_min() <= other.x_min()
            && self.x_max() >= other.x_max()
            && self.y_min() <= other.y_min()
            && self.y_max() >= other.y_max()
    }

    /// Grows the box width and height by `(1 + ratio)` around its center,
    /// then clamps the top-left corner at zero. A ratio of `0.0` is the
    /// identity. The clamp shifts the corner without re-shrinking the size,
    /// matching the submission tooling this crate replaces.
    pub fn enlarge(&self, ratio: f32) -> DetBox {
        if ratio == 0.0 {
            return *self;
        }
        let new_w = self.w * (1. + ratio);
        let new_h = self.h * (1. + ratio);
        let new_x = (self.x1 - (new_w - self.w) / 2.).max(0.);
        let new_y = (self.y1 - (new_h - self.h) / 2.).max(0.);
        DetBox::default().with_x1y1_wh(new_x, new_y, new_w, new_h)
    }

    /// Clips the box to `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: f32, height: f32) -> DetBox {
        let x1 = self.x1.clamp(0., width);
        let y1 = self.y1.clamp(0., height);
        let x2 = self.x2.clamp(0., width);
        let y2 = self.y2.clamp(0., height);
        DetBox::new(x1, y1, x2, y2)
    }

    /// Returns `(x, y, w, h)` truncated to integers, the form the
    /// submission file stores.
    pub fn as_xywh_i32(&self) -> (i32, i32, i32, i32) {
        (self.x1 as i32,
         self.y1 as i32,
         self.w as i32,
         self.h as i32)
    }

    /// Sets the bounding box's coordinates using `(x1, y1, x2, y2)` and calculates width and height.
    pub fn with_x1y1_x2y2(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;

        self.w = x2 - x1;
        self.h = y2 - y1;
        self
    }

    /// Sets the bounding box's coordinates and dimensions using `(x, y, w, h)`.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.w = w;
        self.h = h;

        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Sets the bounding box's coordinates and dimensions using `(cx, cy, w, h)`.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - (w / 2.0);
        self.y1 = cy - (h / 2.0);
        self.w = w;
        self.h = h;

        self.x2 = cx + (w / 2.0);
        self.y2 = cy + (h / 2.0);
        self
    }
}
