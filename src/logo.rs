//! Logo模块 - 基于YOLO的品牌标志检测
//!
//! 该模块提供完整的检测流程：
//! - 图像预处理：去alpha、拉伸到640x640、归一化并转换为平面张量
//! - 模型推理：通过`InferenceEngine`接口调用，默认实现基于ONNX Runtime
//! - 输出解码：在8400个锚点上取最高类别分数、按置信度过滤、还原到原图坐标
//! - 非极大值抑制：贪心去除重叠框（不区分类别）
//! - 可视化绘制
//!
//! # 示例
//!
//! ```no_run
//! use logodet::{LogoDetector, OnnxEngine, draw_detections, load_image};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = OnnxEngine::load("models/logos.onnx")?;
//! let image = load_image("data/street.jpg")?;
//!
//! let mut detector = LogoDetector::new(engine);
//! let detections = detector.detect(&image)?;
//! let annotated = draw_detections(&image, &detections);
//! annotated.save("results/street.png")?;
//! # Ok(())
//! # }
//! ```

pub mod bounds;
pub mod decode;
pub mod detect;
pub mod draw;
pub mod engine;
pub mod image;
pub mod labels;
pub mod nms;
pub mod queue;

// 重新导出常用类型和函数
pub use self::bounds::{BoundingBox, Detection};
pub use self::decode::decode;
pub use self::detect::LogoDetector;
pub use self::draw::{annotation_path, draw_detections};
pub use self::engine::{InferenceEngine, OnnxEngine, OnnxEngineBuilder};
pub use self::image::{PreparedInput, decode_image, load_image, prepare, prepare_image};
pub use self::labels::LOGO_CLASSES;
pub use self::nms::suppress;
pub use self::queue::{LoadedImage, PrepareQueue};
