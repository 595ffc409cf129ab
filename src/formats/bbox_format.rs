use crate::common::DetBox;

/// On-disk bounding box conventions this tooling reads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BoxFormat {
    /// Normalized `cx cy w h`, the YOLO label convention.
    #[default] Yolo,
    /// Absolute `x1 y1 x2 y2` pixel corners (Pascal VOC).
    Voc,
    /// Absolute `x y w h` pixels, top-left anchored (COCO).
    Coco,
}

impl BoxFormat {
    pub fn from_str(format: &str) -> Option<Self> {
        match format.to_lowercase().as_str() {
            "yolo" => Some(BoxFormat::Yolo),
            "voc" => Some(BoxFormat::Voc),
            "coco" => Some(BoxFormat::Coco),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoxFormat::Yolo => "yolo",
            BoxFormat::Voc => "voc",
            BoxFormat::Coco => "coco",
        }
    }

    /// Converts the four raw coordinates of this format into a COCO-style
    /// pixel box for an image of `img_width` x `img_height`.
    pub fn to_coco(&self, coords: [f32; 4], img_width: u32, img_height: u32) -> DetBox {
        let (w, h) = (img_width as f32, img_height as f32);
        match self {
            BoxFormat::Yolo => DetBox::default().with_cxcy_wh(
                coords[0] * w,
                coords[1] * h,
                coords[2] * w,
                coords[3] * h,
            ),
            BoxFormat::Voc => {
                DetBox::default().with_x1y1_x2y2(coords[0], coords[1], coords[2], coords[3])
            }
            BoxFormat::Coco => {
                DetBox::default().with_x1y1_wh(coords[0], coords[1], coords[2], coords[3])
            }
        }
    }
}
