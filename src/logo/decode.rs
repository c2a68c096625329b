//! 模型输出解码模块
//!
//! 把形状为[1, 84, 8400]的原始输出解释为8400个锚点：每个锚点前4行是中心点和宽高（640x640输入坐标），
//! 后80行是各类别的置信度。解码只做置信度过滤和坐标还原，不做任何空间去重，去重交给NMS。

use ndarray::{ArrayView1, ArrayView2, Axis, s};
use tracing::{debug, warn};

use crate::config::{BOX_PARAMS, INPUT_HEIGHT, INPUT_WIDTH, NUM_ANCHORS, OUTPUT_LEN, OUTPUT_ROWS};
use crate::error::{DetectError, DetectResult};
use crate::logo::bounds::{BoundingBox, Detection};
use crate::logo::labels::label_for;

/// 求置信度最高的类别
///
/// 使用严格大于比较，分数完全相同时保留下标最小的类别。NaN分数不参与比较。
/// 没有任何有效分数时返回None。
pub fn best_class(scores: ArrayView1<'_, f32>) -> Option<(usize, f32)> {
    let mut iter = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan());
    let first = iter.next()?;
    Some(iter.fold(first, |best, item| if item.1 > best.1 { item } else { best }))
}

/// 把640x640输入坐标系中的边界框映射回原始图像
///
/// x方向和y方向分别按原始宽度和高度缩放，对应预处理时的非等比拉伸。
pub fn rescale_box(bbox: BoundingBox, original_width: f32, original_height: f32) -> BoundingBox {
    let (input_width, input_height) = (INPUT_WIDTH as f32, INPUT_HEIGHT as f32);
    BoundingBox {
        x1: bbox.x1 / input_width * original_width,
        y1: bbox.y1 / input_height * original_height,
        x2: bbox.x2 / input_width * original_width,
        y2: bbox.y2 / input_height * original_height,
    }
}

/// 解码模型原始输出
///
/// # 参数
/// * `output` - 展平的模型输出，长度必须为84 * 8400
/// * `original_width` - 原始图像宽度
/// * `original_height` - 原始图像高度
/// * `confidence_threshold` - 置信度阈值，只保留分数严格大于阈值的锚点
///
/// # 返回值
/// 按锚点顺序排列的候选检测结果，其中会包含大量相互重叠的框
///
/// # 错误处理
/// 输出长度不符时返回`DetectError::ShapeMismatch`，不做部分解码
///
/// # 示例
///
/// ```
/// use logodet::decode;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let output = vec![0.0f32; 84 * 8400];
/// let detections = decode(&output, 1280, 720, 0.5)?;
/// assert!(detections.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn decode(
    output: &[f32],
    original_width: u32,
    original_height: u32,
    confidence_threshold: f32,
) -> DetectResult<Vec<Detection>> {
    if output.len() != OUTPUT_LEN {
        return Err(DetectError::ShapeMismatch {
            expected: OUTPUT_LEN,
            actual: output.len(),
        });
    }

    let grid = ArrayView2::from_shape((OUTPUT_ROWS, NUM_ANCHORS), output).map_err(|_| {
        DetectError::ShapeMismatch {
            expected: OUTPUT_LEN,
            actual: output.len(),
        }
    })?;
    let geometry = grid.slice(s![..BOX_PARAMS, ..]);
    let scores = grid.slice(s![BOX_PARAMS.., ..]);

    let (img_width, img_height) = (original_width as f32, original_height as f32);
    let mut detections = Vec::new();

    for (anchor, anchor_scores) in scores.axis_iter(Axis(1)).enumerate() {
        let Some((class_id, confidence)) = best_class(anchor_scores) else {
            continue;
        };

        // 恰好等于阈值的分数也被丢弃
        if confidence <= confidence_threshold {
            continue;
        }

        let Some(class_name) = label_for(class_id) else {
            warn!("锚点 {} 的类别ID {} 超出类别表范围，已跳过", anchor, class_id);
            continue;
        };

        let column = geometry.column(anchor);
        let bbox = BoundingBox::from_center(column[0], column[1], column[2], column[3]);

        detections.push(Detection {
            bbox: rescale_box(bbox, img_width, img_height),
            class_id,
            class_name,
            confidence,
        });
    }

    debug!("解码得到 {} 个候选框", detections.len());
    Ok(detections)
}
