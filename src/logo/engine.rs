//! 推理引擎模块
//!
//! 检测流程只依赖`InferenceEngine`这一窄接口：输入[1, 3, 640, 640]的张量，返回展平的[1, 84, 8400]输出。
//! `OnnxEngine`基于ONNX Runtime实现该接口；测试中可以用返回固定张量的桩实现替代。

use ndarray::Array4;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::{inputs, value::Tensor};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{DEFAULT_INTRA_THREADS, INPUT_NAME, OUTPUT_NAME};
use crate::error::{DetectError, DetectResult};

/// 推理引擎接口
pub trait InferenceEngine {
    /// 对输入张量执行一次推理，返回展平的模型输出
    fn infer(&mut self, input: &Array4<f32>) -> DetectResult<Vec<f32>>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn infer(&mut self, input: &Array4<f32>) -> DetectResult<Vec<f32>> {
        (**self).infer(input)
    }
}

/// 基于ONNX Runtime的推理引擎
pub struct OnnxEngine {
    session: Session,
}

/// `OnnxEngine`构建器
pub struct OnnxEngineBuilder {
    model_path: PathBuf,
    intra_threads: usize,
    optimization_level: GraphOptimizationLevel,
}

impl OnnxEngineBuilder {
    /// 设置算子内部并行线程数
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = threads;
        self
    }

    /// 设置图优化级别
    pub fn with_optimization_level(mut self, level: GraphOptimizationLevel) -> Self {
        self.optimization_level = level;
        self
    }

    /// 加载模型并创建推理会话
    ///
    /// # 错误处理
    /// 模型文件读取失败或会话创建失败时返回`DetectError::Inference`
    pub fn build(self) -> DetectResult<OnnxEngine> {
        info!("加载模型文件: {}", self.model_path.display());
        let start = Instant::now();

        let session = Session::builder()?
            .with_optimization_level(self.optimization_level)?
            .with_intra_threads(self.intra_threads)?
            .commit_from_file(&self.model_path)
            .map_err(|e| {
                DetectError::inference(format!("无法加载模型 {}: {}", self.model_path.display(), e))
            })?;

        info!("模型加载完成，耗时: {:.2?}", start.elapsed());
        Ok(OnnxEngine { session })
    }
}

impl OnnxEngine {
    /// 创建构建器
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use logodet::OnnxEngine;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = OnnxEngine::builder("models/logos.onnx")
    ///     .with_intra_threads(2)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(model_path: impl AsRef<Path>) -> OnnxEngineBuilder {
        OnnxEngineBuilder {
            model_path: model_path.as_ref().to_path_buf(),
            intra_threads: DEFAULT_INTRA_THREADS,
            optimization_level: GraphOptimizationLevel::Level3,
        }
    }

    /// 使用默认配置加载模型
    pub fn load(model_path: impl AsRef<Path>) -> DetectResult<Self> {
        Self::builder(model_path).build()
    }
}

impl InferenceEngine for OnnxEngine {
    fn infer(&mut self, input: &Array4<f32>) -> DetectResult<Vec<f32>> {
        let shape: Vec<usize> = input.shape().to_vec();
        let data: Vec<f32> = input.iter().copied().collect();
        let input_tensor = Tensor::from_array(([shape[0], shape[1], shape[2], shape[3]], data))?;

        let outputs = self.session.run(inputs![INPUT_NAME => input_tensor])?;
        let output = outputs
            .get(OUTPUT_NAME)
            .ok_or_else(|| DetectError::inference(format!("模型缺少输出: {}", OUTPUT_NAME)))?;

        let (shape, data) = output.try_extract_tensor::<f32>()?;
        debug!("模型输出形状: {:?}", shape);

        Ok(data.to_vec())
    }
}
