mod common;

use image::{DynamicImage, Rgb, RgbImage};
use logodet::{DetectError, LogoDetector, draw_detections};

use common::{FailingEngine, StubEngine, assert_close, empty_output, encode_png, set_anchor};

fn street_scene_output() -> Vec<f32> {
    let mut output = empty_output();
    // 覆盖整幅图的Apple
    set_anchor(&mut output, 100, [320.0, 320.0, 640.0, 640.0], 1, 0.9);
    // 与上面高度重叠的DHL，交并比约0.88
    set_anchor(&mut output, 101, [320.0, 320.0, 600.0, 600.0], 5, 0.8);
    // 位于内部的小框Yahoo
    set_anchor(&mut output, 4000, [50.0, 50.0, 20.0, 20.0], 26, 0.6);
    // 低于阈值
    set_anchor(&mut output, 5000, [500.0, 500.0, 40.0, 40.0], 10, 0.3);
    output
}

fn solid_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 120, 200])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_image_with_zero_scores() -> Result<(), Box<dyn std::error::Error>> {
        let bytes = encode_png(&solid_image(1280, 720));
        let mut detector = LogoDetector::new(StubEngine::new(empty_output()));

        let detections = detector.detect_bytes(&bytes)?;
        assert!(detections.is_empty());

        let engine = detector.engine_mut();
        assert_eq!(engine.calls, 1);
        assert_eq!(engine.input_shapes[0], vec![1, 3, 640, 640]);
        Ok(())
    }

    #[test]
    fn test_detect_decodes_and_suppresses() -> Result<(), Box<dyn std::error::Error>> {
        let mut detector = LogoDetector::new(StubEngine::new(street_scene_output()));
        let detections = detector.detect(&solid_image(1280, 720))?;

        assert_eq!(detections.len(), 2);

        assert_eq!(detections[0].class_name, "Apple");
        assert_eq!(detections[0].confidence, 0.9);
        assert_eq!(detections[0].bbox.x1, 0.0);
        assert_eq!(detections[0].bbox.y1, 0.0);
        assert_eq!(detections[0].bbox.x2, 1280.0);
        assert_eq!(detections[0].bbox.y2, 720.0);

        assert_eq!(detections[1].class_name, "Yahoo");
        assert_close(detections[1].bbox.x1, 80.0);
        assert_close(detections[1].bbox.y1, 45.0);
        assert_close(detections[1].bbox.x2, 120.0);
        assert_close(detections[1].bbox.y2, 67.5);
        Ok(())
    }

    #[test]
    fn test_thresholds_are_configurable() -> Result<(), Box<dyn std::error::Error>> {
        let image = solid_image(640, 640);

        let mut strict = LogoDetector::new(StubEngine::new(street_scene_output()))
            .with_confidence_threshold(0.95);
        assert_eq!(strict.confidence_threshold(), 0.95);
        assert!(strict.detect(&image)?.is_empty());

        let mut loose = LogoDetector::new(StubEngine::new(street_scene_output()))
            .with_nms_threshold(0.9);
        assert_eq!(loose.nms_threshold(), 0.9);
        let labels: Vec<&str> = loose.detect(&image)?.iter().map(|d| d.class_name).collect();
        assert_eq!(labels, vec!["Apple", "DHL", "Yahoo"]);

        let mut lenient = LogoDetector::new(StubEngine::new(street_scene_output()))
            .with_confidence_threshold(0.2);
        let labels: Vec<&str> = lenient.detect(&image)?.iter().map(|d| d.class_name).collect();
        assert_eq!(labels, vec!["Apple", "Yahoo", "Heineken"]);
        Ok(())
    }

    #[test]
    fn test_default_thresholds() {
        let detector = LogoDetector::new(StubEngine::new(empty_output()));
        assert_eq!(detector.confidence_threshold(), 0.5);
        assert_eq!(detector.nms_threshold(), 0.7);
    }

    #[test]
    fn test_detection_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let bytes = encode_png(&solid_image(800, 600));
        let mut detector = LogoDetector::new(StubEngine::new(street_scene_output()));

        let first = detector.detect_bytes(&bytes)?;
        let second = detector.detect_bytes(&bytes)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_engine_error_propagates() {
        let mut detector = LogoDetector::new(FailingEngine);
        match detector.detect(&solid_image(64, 64)) {
            Err(DetectError::Inference(msg)) => assert_eq!(msg, "引擎不可用"),
            other => panic!("期望 Inference 错误, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_engine_output_of_wrong_length() {
        let mut detector = LogoDetector::new(StubEngine::new(vec![0.0; 85 * 8400]));
        assert!(matches!(
            detector.detect(&solid_image(64, 64)),
            Err(DetectError::ShapeMismatch { expected, actual }) if expected == 84 * 8400 && actual == 85 * 8400
        ));
    }

    #[test]
    fn test_undecodable_bytes_skip_inference() {
        let mut detector = LogoDetector::new(StubEngine::new(empty_output()));
        assert!(matches!(
            detector.detect_bytes(&[0x89, 0x50, 0x4e, 0x47]),
            Err(DetectError::Decode(_))
        ));
        assert_eq!(detector.engine_mut().calls, 0);
    }

    #[test]
    fn test_boxed_engine() -> Result<(), Box<dyn std::error::Error>> {
        let engine: Box<dyn logodet::InferenceEngine> = Box::new(StubEngine::new(street_scene_output()));
        let mut detector = LogoDetector::new(engine);
        assert_eq!(detector.detect(&solid_image(640, 640))?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_json_output_format() -> Result<(), Box<dyn std::error::Error>> {
        let mut detector = LogoDetector::new(StubEngine::new(street_scene_output()));
        let detections = detector.detect(&solid_image(1280, 720))?;

        let value = serde_json::to_value(&detections)?;
        let rows = value.as_array().expect("应为数组");
        assert_eq!(rows.len(), 2);

        let first = rows[0].as_array().expect("应为数组");
        assert_eq!(first.len(), 6);
        assert_eq!(first[0], 0.0);
        assert_eq!(first[2], 1280.0);
        assert_eq!(first[3], 720.0);
        assert_eq!(first[4], "Apple");
        assert!((first[5].as_f64().expect("应为数字") - 0.9).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_annotation_keeps_size() -> Result<(), Box<dyn std::error::Error>> {
        let image = solid_image(320, 200);
        let mut detector = LogoDetector::new(StubEngine::new(street_scene_output()));
        let detections = detector.detect(&image)?;

        let annotated = draw_detections(&image, &detections);
        assert_eq!((annotated.width(), annotated.height()), (320, 200));
        assert_ne!(annotated.to_rgb8(), image.to_rgb8());
        Ok(())
    }
}
