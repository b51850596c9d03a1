mod backend;
mod backends;
mod nms;
mod result;

pub use backend::PersonDetector;
pub use backends::StubDetector;
#[cfg(feature = "backend-tract")]
pub use backends::TractDetector;
pub use nms::{iou, suppress_overlaps, DEFAULT_IOU_THRESHOLD};
pub use result::Detection;
