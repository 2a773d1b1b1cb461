pub mod camera_planner;
pub mod camera_utils;

// Re-export main types
pub use camera_planner::{CameraOutcome, CameraPlanner, CAMERA_NAME, FOCUS_NAME};
pub use camera_utils::{CameraData, PRODUCT_FOCAL_LENGTH_MM};
