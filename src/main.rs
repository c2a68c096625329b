use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use logodet::config::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_INTRA_THREADS, DEFAULT_NMS_THRESHOLD, DEFAULT_PREPARE_WINDOW,
};
use logodet::{Detection, LoadedImage, LogoDetector, OnnxEngine, PrepareQueue, annotation_path, draw_detections};

/// 品牌标志检测命令行工具
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ONNX 模型文件路径
    #[arg(long, value_name = "FILE")]
    model: PathBuf,

    /// 待检测的图像文件，可以指定多个
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// 置信度阈值 (0.0 - 1.0)
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD, value_name = "THRESHOLD")]
    confidence: f32,

    /// NMS IOU 阈值 (0.0 - 1.0)
    #[arg(long, default_value_t = DEFAULT_NMS_THRESHOLD, value_name = "THRESHOLD")]
    nms_threshold: f32,

    /// 推理时算子内部的线程数
    #[arg(long, default_value_t = DEFAULT_INTRA_THREADS, value_name = "COUNT")]
    intra_threads: usize,

    /// 同时预处理的图像数上限
    #[arg(long, default_value_t = DEFAULT_PREPARE_WINDOW, value_name = "COUNT")]
    prepare_window: usize,

    /// 标注图像的输出目录，不指定时不输出图像
    #[arg(long, value_name = "DIR")]
    annotate: Option<PathBuf>,
}

/// 每张图像输出一行JSON
#[derive(Serialize)]
struct ImageReport<'a> {
    path: &'a Path,
    detections: &'a [Detection],
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("模型文件路径: {}", args.model.display());
    info!("图像数量: {}", args.images.len());
    info!("置信度阈值: {}", args.confidence);
    info!("NMS 阈值: {}", args.nms_threshold);

    let engine = OnnxEngine::builder(&args.model)
        .with_intra_threads(args.intra_threads)
        .build()
        .with_context(|| format!("无法加载模型: {}", args.model.display()))?;
    let mut detector = LogoDetector::new(engine)
        .with_confidence_threshold(args.confidence)
        .with_nms_threshold(args.nms_threshold);

    if let Some(dir) = &args.annotate {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("无法创建输出目录: {}", dir.display()))?;
    }

    // 解码和预处理在阻塞线程池中提前执行，在途任务数受窗口限制；推理按输入顺序串行
    let mut queue = PrepareQueue::new(args.images.iter().cloned(), args.prepare_window);

    let mut failures = 0usize;
    let mut index = 0usize;
    while let Some((path, result)) = queue.next().await {
        index += 1;
        let LoadedImage { image, prepared } = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
                continue;
            }
        };

        let detections = match tokio::task::block_in_place(|| detector.detect_prepared(prepared)) {
            Ok(detections) => detections,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
                continue;
            }
        };
        info!("{}: 检测到 {} 个目标", path.display(), detections.len());

        let report = ImageReport {
            path: &path,
            detections: &detections,
        };
        println!("{}", serde_json::to_string(&report)?);

        if let Some(dir) = &args.annotate {
            let output_path = annotation_path(dir, &path, index);
            draw_detections(&image, &detections)
                .save(&output_path)
                .with_context(|| format!("无法保存标注图像: {}", output_path.display()))?;
            info!("标注图像已保存到: {}", output_path.display());
        }
    }

    if failures > 0 {
        bail!("{} 张图像处理失败", failures);
    }

    Ok(())
}
