pub mod config;
pub mod error;
pub mod logo;

// 重新导出logo模块中的常用类型和函数
pub use error::{DetectError, DetectResult};
pub use logo::{BoundingBox, Detection, LogoDetector, LOGO_CLASSES, annotation_path, draw_detections};
pub use logo::{LoadedImage, PrepareQueue, PreparedInput, decode_image, load_image, prepare, prepare_image};
pub use logo::{InferenceEngine, OnnxEngine, OnnxEngineBuilder, decode, suppress};
