use image::DynamicImage;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_NMS_THRESHOLD};
use crate::error::DetectResult;
use crate::logo::bounds::Detection;
use crate::logo::decode::decode;
use crate::logo::engine::InferenceEngine;
use crate::logo::image::{PreparedInput, decode_image, prepare_image};
use crate::logo::nms::suppress;

/// 品牌标志检测器
///
/// 封装了完整的检测流程，包括图像预处理、模型推理和结果后处理。
/// 检测器本身不保存跨调用的状态，除了推理引擎。
///
/// # 示例
///
/// ```no_run
/// use logodet::{LogoDetector, OnnxEngine, load_image};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = OnnxEngine::load("models/logos.onnx")?;
/// let image = load_image("data/street.jpg")?;
/// let mut detector = LogoDetector::new(engine)
///     .with_confidence_threshold(0.5)
///     .with_nms_threshold(0.7);
///
/// let detections = detector.detect(&image)?;
/// # Ok(())
/// # }
/// ```
pub struct LogoDetector<E> {
    engine: E,
    /// 置信度阈值，低于此值的检测结果将被过滤
    confidence_threshold: f32,
    /// NMS（非极大值抑制）阈值，用于去除重复检测
    nms_threshold: f32,
}

impl<E: InferenceEngine> LogoDetector<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
        }
    }

    /// 设置置信度阈值 (0.0 - 1.0)
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// 设置NMS阈值 (0.0 - 1.0)
    pub fn with_nms_threshold(mut self, threshold: f32) -> Self {
        self.nms_threshold = threshold;
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn nms_threshold(&self) -> f32 {
        self.nms_threshold
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// 从原始图像字节执行检测
    ///
    /// # 错误处理
    /// 图像无法解码返回`DetectError::Decode`，推理失败返回`DetectError::Inference`，
    /// 模型输出长度不符返回`DetectError::ShapeMismatch`
    pub fn detect_bytes(&mut self, bytes: &[u8]) -> DetectResult<Vec<Detection>> {
        let img = decode_image(bytes)?;
        self.detect(&img)
    }

    /// 对已解码的图像执行完整检测流程
    pub fn detect(&mut self, img: &DynamicImage) -> DetectResult<Vec<Detection>> {
        let start = Instant::now();
        let prepared = prepare_image(img);
        debug!("预处理耗时: {:?}", start.elapsed());

        self.detect_prepared(prepared)
    }

    /// 对预处理好的输入执行推理、解码和NMS
    pub fn detect_prepared(&mut self, prepared: PreparedInput) -> DetectResult<Vec<Detection>> {
        let start = Instant::now();
        let output = self.engine.infer(&prepared.tensor)?;
        info!("模型推理耗时: {:?}", start.elapsed());

        let start = Instant::now();
        let candidates = decode(
            &output,
            prepared.original_width,
            prepared.original_height,
            self.confidence_threshold,
        )?;
        let detections = suppress(candidates, self.nms_threshold);
        debug!("后处理耗时: {:?}", start.elapsed());

        Ok(detections)
    }
}
