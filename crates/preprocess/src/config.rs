/// Input size of the fine-tuned classifier (width, height).
pub const CLASSIFIER_INPUT_SIZE: (u32, u32) = (224, 224);

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];
