#![allow(dead_code)]

use image::{DynamicImage, ImageFormat};
use ndarray::Array4;
use std::io::Cursor;

use logodet::config::{BOX_PARAMS, NUM_ANCHORS, OUTPUT_LEN};
use logodet::{DetectError, DetectResult, InferenceEngine};

/// 全零的模型输出
pub fn empty_output() -> Vec<f32> {
    vec![0.0; OUTPUT_LEN]
}

/// 在指定锚点写入中心点、宽高以及某个类别的分数
pub fn set_anchor(output: &mut [f32], anchor: usize, geometry: [f32; 4], class_id: usize, score: f32) {
    for (row, value) in geometry.iter().enumerate() {
        output[row * NUM_ANCHORS + anchor] = *value;
    }
    output[(BOX_PARAMS + class_id) * NUM_ANCHORS + anchor] = score;
}

/// 编码为PNG字节
pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG编码失败");
    bytes
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "期望 {}, 实际 {}",
        expected,
        actual
    );
}

/// 返回固定输出的推理引擎
pub struct StubEngine {
    pub output: Vec<f32>,
    pub calls: usize,
    pub input_shapes: Vec<Vec<usize>>,
}

impl StubEngine {
    pub fn new(output: Vec<f32>) -> Self {
        Self {
            output,
            calls: 0,
            input_shapes: Vec::new(),
        }
    }
}

impl InferenceEngine for StubEngine {
    fn infer(&mut self, input: &Array4<f32>) -> DetectResult<Vec<f32>> {
        self.calls += 1;
        self.input_shapes.push(input.shape().to_vec());
        Ok(self.output.clone())
    }
}

/// 总是失败的推理引擎
pub struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn infer(&mut self, _input: &Array4<f32>) -> DetectResult<Vec<f32>> {
        Err(DetectError::inference("引擎不可用"))
    }
}
