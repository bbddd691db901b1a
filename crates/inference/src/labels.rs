//! Class index to category name mapping.
//!
//! [`VOCABULARY`] is the dense vocabulary: a background placeholder at index 0
//! followed by the 80 COCO categories. Detectors trained on the original COCO
//! annotations (torchvision's Faster R-CNN among them) emit the sparse COCO
//! category ids instead, which skip unused slots; [`LabelSpace::Coco91`]
//! translates those before the lookup.

use serde::Deserialize;

pub const BACKGROUND_LABEL: &str = "__background__";
pub const UNKNOWN_LABEL: &str = "unknown";

pub const VOCABULARY: [&str; 81] = [
    BACKGROUND_LABEL,
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// COCO category id of each `VOCABULARY[1..]` entry, in order.
const COCO_CATEGORY_IDS: [u8; 80] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 27, 28,
    31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55,
    56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 67, 70, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 84,
    85, 86, 87, 88, 89, 90,
];

/// Index space of the class ids a detector emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSpace {
    /// Indices address [`VOCABULARY`] directly.
    #[default]
    Contiguous,
    /// Sparse COCO category ids (1..=90 with gaps, 0 = background).
    Coco91,
}

impl LabelSpace {
    fn vocabulary_index(self, class_index: i64) -> Option<usize> {
        match self {
            LabelSpace::Contiguous => usize::try_from(class_index).ok(),
            LabelSpace::Coco91 if class_index == 0 => Some(0),
            LabelSpace::Coco91 => COCO_CATEGORY_IDS
                .iter()
                .position(|&id| i64::from(id) == class_index)
                .map(|position| position + 1),
        }
    }
}

/// Human-readable name for a raw class index; never fails.
pub fn label_for(class_index: i64, space: LabelSpace) -> &'static str {
    space
        .vocabulary_index(class_index)
        .and_then(|index| VOCABULARY.get(index).copied())
        .unwrap_or(UNKNOWN_LABEL)
}
