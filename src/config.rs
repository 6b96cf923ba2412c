use serde::{Deserialize, Serialize};

use crate::error::TriangulationError;

/// 三角剖分配置
///
/// 所有容差都定义在归一化坐标系中：输入点先平移到包围盒中心，
/// 再按最大边长缩放，因此同一组容差对任意尺度的输入都适用。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulatorConfig {
    /// 外接圆测试容差：点必须在圆内超过该值才算"在圆内"
    pub circumcircle_epsilon: f64,
    /// 有向面积（两倍）不超过该值的三角形视为退化并被丢弃
    pub area_epsilon: f64,
    /// 共线判定容差
    pub collinear_epsilon: f64,
    /// 工作三角形数量超过该值时用 rayon 并行扫描
    pub parallel_threshold: usize,
}

impl Default for TriangulatorConfig {
    fn default() -> Self {
        Self {
            circumcircle_epsilon: 1e-10,
            area_epsilon: 1e-12,
            collinear_epsilon: 1e-9,
            parallel_threshold: 2048,
        }
    }
}

impl TriangulatorConfig {
    pub fn with_circumcircle_epsilon(mut self, epsilon: f64) -> Self {
        self.circumcircle_epsilon = epsilon;
        self
    }

    pub fn with_area_epsilon(mut self, epsilon: f64) -> Self {
        self.area_epsilon = epsilon;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), TriangulationError> {
        let tolerances = [
            ("circumcircle_epsilon", self.circumcircle_epsilon),
            ("area_epsilon", self.area_epsilon),
            ("collinear_epsilon", self.collinear_epsilon),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(TriangulationError::invalid_config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TriangulatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let config = TriangulatorConfig::default().with_circumcircle_epsilon(-1.0);
        assert!(config.validate().is_err());

        let config = TriangulatorConfig::default().with_circumcircle_epsilon(f64::NAN);
        assert!(config.validate().is_err());

        let config = TriangulatorConfig::default().with_area_epsilon(f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(TriangulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let config: TriangulatorConfig =
            serde_json::from_str(r#"{ "parallel_threshold": 50 }"#).unwrap();
        assert_eq!(config.parallel_threshold, 50);
        assert_eq!(
            config.circumcircle_epsilon,
            TriangulatorConfig::default().circumcircle_epsilon
        );

        let json = serde_json::to_string(&TriangulatorConfig::default()).unwrap();
        let back: TriangulatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TriangulatorConfig::default());
    }
}
