use image::{DynamicImage, GenericImageView, RgbaImage};
use raqote::{DrawOptions, DrawTarget, LineJoin, PathBuilder, SolidSource, Source, StrokeStyle};
use std::path::{Path, PathBuf};

use crate::logo::bounds::Detection;

// 按类别ID循环取色
const PALETTE: [(u8, u8, u8); 8] = [
    (0xFF, 0x38, 0x38),
    (0x00, 0xC2, 0xFF),
    (0xFF, 0xB2, 0x1D),
    (0x48, 0xF9, 0x0A),
    (0xCF, 0x00, 0xFF),
    (0x00, 0xFF, 0xB4),
    (0xFF, 0x37, 0xC7),
    (0x34, 0x45, 0xFF),
];

/// 类别ID对应的边框颜色
pub fn class_color(class_id: usize) -> SolidSource {
    let (r, g, b) = PALETTE[class_id % PALETTE.len()];
    SolidSource { r, g, b, a: 0xFF }
}

/// 在图像上绘制检测结果
///
/// 不同类别使用不同颜色的边框，返回绘制后的新图像，原图不变。
///
/// # 示例
///
/// ```
/// use image::DynamicImage;
/// use logodet::{BoundingBox, Detection, draw_detections};
///
/// let image = DynamicImage::new_rgb8(64, 48);
/// let detections = [Detection::new(BoundingBox::new(4.0, 4.0, 40.0, 30.0), 2, "BMW", 0.9)];
/// let annotated = draw_detections(&image, &detections);
/// assert_eq!((annotated.width(), annotated.height()), (64, 48));
/// ```
pub fn draw_detections(image: &DynamicImage, detections: &[Detection]) -> DynamicImage {
    let (img_width, img_height) = image.dimensions();
    let mut dt = DrawTarget::new(img_width as i32, img_height as i32);

    // 将原始图像绘制到DrawTarget上
    let rgba_image = image.to_rgba8();
    let image_data: Vec<u32> = rgba_image
        .pixels()
        .map(|pixel| {
            let [r, g, b, a] = pixel.0;
            u32::from_le_bytes([b, g, r, a])
        })
        .collect();

    let img = raqote::Image {
        width: img_width as i32,
        height: img_height as i32,
        data: &image_data,
    };
    dt.draw_image_at(0.0, 0.0, &img, &DrawOptions::new());

    for detection in detections {
        let bbox = &detection.bbox;

        let mut pb = PathBuilder::new();
        pb.rect(bbox.x1, bbox.y1, bbox.x2 - bbox.x1, bbox.y2 - bbox.y1);
        let path = pb.finish();

        dt.stroke(
            &path,
            &Source::Solid(class_color(detection.class_id)),
            &StrokeStyle {
                join: LineJoin::Round,
                width: 2.0,
                ..StrokeStyle::default()
            },
            &DrawOptions::default(),
        );
    }

    // 将DrawTarget转换回图像（BGRA to RGBA）
    let mut output = RgbaImage::new(img_width, img_height);
    for (dst, &pixel) in output.pixels_mut().zip(dt.get_data().iter()) {
        let [b, g, r, a] = pixel.to_le_bytes();
        dst.0 = [r, g, b, a];
    }

    DynamicImage::ImageRgba8(output)
}

/// 标注图像的输出路径：`<dir>/<index>_<文件名>_logos.png`
///
/// `index`为图像在本批次中的序号，不同目录下的同名图像不会互相覆盖。
pub fn annotation_path(dir: &Path, image_path: &Path, index: usize) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{:04}_{}_logos.png", index, stem))
}
