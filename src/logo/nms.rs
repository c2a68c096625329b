use tracing::debug;

use crate::logo::bounds::Detection;

/// 应用非极大值抑制
///
/// 去除重叠度高的重复检测框，只保留置信度最高的框。
///
/// 1. 按置信度降序稳定排序，置信度相同的候选保持输入顺序
/// 2. 依次取出剩余候选中置信度最高的一个加入结果
/// 3. 丢弃所有与它的交并比不小于`nms_threshold`的剩余候选
///
/// 抑制不区分类别：不同类别的框只要重叠足够也会被去掉。
///
/// # 参数
/// * `candidates` - 候选检测结果
/// * `nms_threshold` - NMS阈值，交并比严格小于该值的框才会保留
///
/// # 返回值
/// 按接受顺序（即置信度降序）排列的检测结果
///
/// # 示例
///
/// ```
/// use logodet::{BoundingBox, Detection, suppress};
///
/// let a = Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0, "Adidas", 0.9);
/// let b = Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 9.0), 1, "Apple", 0.8);
/// let kept = suppress(vec![b, a.clone()], 0.7);
/// assert_eq!(kept, vec![a]);
/// ```
pub fn suppress(mut candidates: Vec<Detection>, nms_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let total = candidates.len();
    let mut result = Vec::new();
    let mut suppressed = vec![false; total];

    for i in 0..total {
        if suppressed[i] {
            continue;
        }

        let accepted = &candidates[i];
        for j in (i + 1)..total {
            if suppressed[j] {
                continue;
            }

            if accepted.bbox.iou(&candidates[j].bbox) >= nms_threshold {
                suppressed[j] = true;
            }
        }

        result.push(accepted.clone());
    }

    debug!("NMS: {} 个候选框保留 {} 个", total, result.len());
    result
}
