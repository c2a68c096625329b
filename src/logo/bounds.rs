use serde::ser::{Serialize, SerializeTuple, Serializer};

/// 边界框结构
///
/// 以左上角和右下角表示的轴对齐矩形，坐标为原始图像像素坐标。
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct BoundingBox {
    /// 左上角x坐标
    pub x1: f32,
    /// 左上角y坐标
    pub y1: f32,
    /// 右下角x坐标
    pub x2: f32,
    /// 右下角y坐标
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// 由中心点和宽高构造边界框
    pub fn from_center(xc: f32, yc: f32, w: f32, h: f32) -> Self {
        Self {
            x1: xc - w / 2.0,
            y1: yc - h / 2.0,
            x2: xc + w / 2.0,
            y2: yc + h / 2.0,
        }
    }

    /// 宽度，坐标颠倒时为0
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    /// 高度，坐标颠倒时为0
    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// 计算两个边界框的交集面积
    ///
    /// 每个方向的重叠长度先截断到0再相乘，两个方向都不重叠时不会得到正的"面积"。
    pub fn intersection(&self, other: &BoundingBox) -> f32 {
        let width = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let height = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        width * height
    }

    /// 计算两个边界框的并集面积
    pub fn union(&self, other: &BoundingBox) -> f32 {
        self.area() + other.area() - self.intersection(other)
    }

    /// 计算交并比(IOU)
    ///
    /// 并集面积不大于0时返回0，所以退化的边界框与任何框的交并比都是0。
    ///
    /// # 示例
    ///
    /// ```
    /// use logodet::BoundingBox;
    ///
    /// let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    /// let b = BoundingBox::new(5.0, 0.0, 15.0, 10.0);
    /// assert_eq!(a.iou(&a), 1.0);
    /// assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    /// ```
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let union = self.union(other);
        if union <= 0.0 {
            return 0.0;
        }
        self.intersection(other) / union
    }
}

/// 检测结果结构
///
/// 由解码器创建，之后不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// 目标的边界框（原始图像坐标）
    pub bbox: BoundingBox,
    /// 类别ID
    pub class_id: usize,
    /// 类别名称
    pub class_name: &'static str,
    /// 置信度
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_id: usize, class_name: &'static str, confidence: f32) -> Self {
        Self { bbox, class_id, class_name, confidence }
    }
}

// 序列化为 [x1, y1, x2, y2, label, confidence]
impl Serialize for Detection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(6)?;
        tuple.serialize_element(&self.bbox.x1)?;
        tuple.serialize_element(&self.bbox.y1)?;
        tuple.serialize_element(&self.bbox.x2)?;
        tuple.serialize_element(&self.bbox.y2)?;
        tuple.serialize_element(self.class_name)?;
        tuple.serialize_element(&self.confidence)?;
        tuple.end()
    }
}
