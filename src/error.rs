use thiserror::Error;

/// 检测流程中可能出现的错误
#[derive(Error, Debug)]
pub enum DetectError {
    /// 输入数据不是可解码的图像
    #[error("图像解码失败: {0}")]
    Decode(#[from] image::ImageError),
    /// 推理引擎加载或执行失败
    #[error("模型推理失败: {0}")]
    Inference(String),
    /// 模型输出长度与 [1, 84, 8400] 不符
    #[error("模型输出长度不符合预期: 期望 {expected}, 实际 {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    /// 后台预处理任务崩溃或被取消
    #[error("预处理任务异常退出: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ort::Error> for DetectError {
    fn from(err: ort::Error) -> Self {
        DetectError::Inference(err.to_string())
    }
}

impl DetectError {
    pub fn inference(msg: impl Into<String>) -> Self {
        DetectError::Inference(msg.into())
    }
}

pub type DetectResult<T> = Result<T, DetectError>;
