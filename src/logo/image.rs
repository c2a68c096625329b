use image::{DynamicImage, RgbImage, imageops::FilterType};
use ndarray::{Array, Array4};
use std::path::Path;
use tracing::debug;

use crate::config::{INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH};
use crate::error::DetectResult;

/// 预处理后的模型输入
///
/// 保存模型输入张量以及原始图像尺寸，后者用于把检测框映射回原图坐标。
#[derive(Debug, Clone)]
pub struct PreparedInput {
    /// 形状为(1, 3, 640, 640)的平面RGB张量，像素值范围[0, 1]
    pub tensor: Array4<f32>,
    /// 缩放前的原始宽度
    pub original_width: u32,
    /// 缩放前的原始高度
    pub original_height: u32,
}

/// 加载图像文件
///
/// # 参数
/// * `path` - 图像文件路径
///
/// # 错误处理
/// 文件读取失败返回`DetectError::Io`，内容无法解码返回`DetectError::Decode`
pub fn load_image(path: impl AsRef<Path>) -> DetectResult<DynamicImage> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_image(&bytes)
}

/// 从内存中的字节解码图像，格式由内容自动识别
pub fn decode_image(bytes: &[u8]) -> DetectResult<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// 调整图像大小以适应模型输入
///
/// 宽和高分别被强制拉伸到目标尺寸，不保持宽高比。解码器依赖这一点按两个方向分别还原坐标。
///
/// # 示例
///
/// ```
/// use image::DynamicImage;
/// use logodet::logo::image::resize_image;
///
/// let img = DynamicImage::new_rgb8(1920, 1080);
/// let resized = resize_image(&img.to_rgb8(), 640, 640);
/// assert_eq!(resized.dimensions(), (640, 640));
/// ```
pub fn resize_image(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    image::imageops::resize(img, width, height, FilterType::Lanczos3)
}

/// 将RGB图像转换为模型输入张量
///
/// 1. 按行优先顺序读取像素
/// 2. 每个字节除以255归一化到[0, 1]
/// 3. 由交错的RGB排列转换为平面排列（先全部R，再全部G，最后全部B）
///
/// 返回的张量为标准内存布局，展平后即为平面排列。
pub fn image_to_tensor(img: &RgbImage) -> Array4<f32> {
    let (width, height) = img.dimensions();
    let mut tensor = Array::zeros((1, INPUT_CHANNELS, height as usize, width as usize));

    for (x, y, pixel) in img.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        let [r, g, b] = pixel.0;

        tensor[[0, 0, y, x]] = (r as f32) / 255.0;
        tensor[[0, 1, y, x]] = (g as f32) / 255.0;
        tensor[[0, 2, y, x]] = (b as f32) / 255.0;
    }

    tensor
}

/// 把已解码的图像准备为模型输入
///
/// 先去掉alpha通道，再拉伸到640x640，最后生成归一化的平面张量。
/// 顺序会影响像素值，必须与模型训练时的预处理保持一致。
pub fn prepare_image(img: &DynamicImage) -> PreparedInput {
    let (original_width, original_height) = (img.width(), img.height());
    let rgb = img.to_rgb8();
    let resized = resize_image(&rgb, INPUT_WIDTH as u32, INPUT_HEIGHT as u32);
    let tensor = image_to_tensor(&resized);

    debug!(
        "预处理完成: 原始尺寸 {}x{} -> 输入尺寸 {}x{}",
        original_width, original_height, INPUT_WIDTH, INPUT_HEIGHT
    );

    PreparedInput {
        tensor,
        original_width,
        original_height,
    }
}

/// 把原始图像字节准备为模型输入
///
/// # 示例
///
/// ```
/// use image::{DynamicImage, ImageFormat};
/// use std::io::Cursor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut bytes = Vec::new();
/// DynamicImage::new_rgb8(320, 240).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
///
/// let prepared = logodet::prepare(&bytes)?;
/// assert_eq!(prepared.tensor.shape(), &[1, 3, 640, 640]);
/// assert_eq!((prepared.original_width, prepared.original_height), (320, 240));
/// # Ok(())
/// # }
/// ```
pub fn prepare(bytes: &[u8]) -> DetectResult<PreparedInput> {
    let img = decode_image(bytes)?;
    Ok(prepare_image(&img))
}
