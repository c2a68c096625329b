//! 有界预处理队列
//!
//! 图像解码和预处理放在tokio的阻塞线程池中提前执行，但同时在途的任务数不超过窗口大小，
//! 每取走一个结果才补充一个新任务。推理慢于预处理时，内存中最多只保留窗口大小份的图像和张量。

use image::DynamicImage;
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::task::JoinHandle;

use crate::error::DetectResult;
use crate::logo::image::{PreparedInput, load_image, prepare_image};

/// 已加载的图像及其模型输入
pub struct LoadedImage {
    pub image: DynamicImage,
    pub prepared: PreparedInput,
}

/// 按输入顺序产出预处理结果的队列
///
/// 必须在tokio运行时内创建和使用。
pub struct PrepareQueue<I> {
    paths: I,
    pending: VecDeque<(PathBuf, JoinHandle<DetectResult<LoadedImage>>)>,
    window: usize,
}

impl<I: Iterator<Item = PathBuf>> PrepareQueue<I> {
    /// 创建队列并立即启动最多`window`个预处理任务，`window`至少为1
    pub fn new(paths: impl IntoIterator<IntoIter = I>, window: usize) -> Self {
        let mut queue = Self {
            paths: paths.into_iter(),
            pending: VecDeque::new(),
            window: window.max(1),
        };
        queue.refill();
        queue
    }

    /// 当前在途（已启动但尚未取走）的任务数
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    fn refill(&mut self) {
        while self.pending.len() < self.window {
            let Some(path) = self.paths.next() else {
                break;
            };
            let task_path = path.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let image = load_image(&task_path)?;
                let prepared = prepare_image(&image);
                Ok(LoadedImage { image, prepared })
            });
            self.pending.push_back((path, handle));
        }
    }

    /// 取出下一张图像的预处理结果，所有图像处理完毕后返回None
    ///
    /// 单张图像失败不会影响后续图像。
    pub async fn next(&mut self) -> Option<(PathBuf, DetectResult<LoadedImage>)> {
        let (path, handle) = self.pending.pop_front()?;
        self.refill();
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        };
        Some((path, result))
    }
}
