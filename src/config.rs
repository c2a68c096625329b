// 模型输入几何参数（填充拉伸到固定尺寸，不保持宽高比）
pub const INPUT_WIDTH: usize = 640;
pub const INPUT_HEIGHT: usize = 640;
pub const INPUT_CHANNELS: usize = 3;

// 模型输出张量布局 [1, 84, 8400]
pub const NUM_ANCHORS: usize = 8400;
pub const BOX_PARAMS: usize = 4;
pub const NUM_CLASS_SLOTS: usize = 80;
pub const OUTPUT_ROWS: usize = BOX_PARAMS + NUM_CLASS_SLOTS;
pub const OUTPUT_LEN: usize = OUTPUT_ROWS * NUM_ANCHORS;

// ONNX 模型的输入输出名称
pub const INPUT_NAME: &str = "images";
pub const OUTPUT_NAME: &str = "output0";

// 目标检测超参数配置
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_NMS_THRESHOLD: f32 = 0.7;
pub const DEFAULT_INTRA_THREADS: usize = 4;

// 命令行批量处理时同时在途的预处理任务数
pub const DEFAULT_PREPARE_WINDOW: usize = 4;
