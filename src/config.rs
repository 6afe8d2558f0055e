use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct FlyConfig {
    #[serde(default = "FlyConfig::default_trim_deadzone")]
    pub trim_deadzone: f32,
    #[serde(default = "FlyConfig::default_trim_speed_up")]
    pub trim_speed_up: f32,
    #[serde(default = "FlyConfig::default_trim_slow_down")]
    pub trim_slow_down: f32,
    /// Lower bound for the speed trim factor. `None` leaves the ramp unbounded.
    #[serde(default)]
    pub move_factor_min: Option<f32>,
    #[serde(default)]
    pub move_factor_max: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RotateScaleConfig {
    /// Controller separations below this length (rig-local units) do not define a gesture.
    #[serde(default = "RotateScaleConfig::default_min_start_distance")]
    pub min_start_distance: f32,
    #[serde(default = "RotateScaleConfig::default_min_scale_ratio")]
    pub min_scale_ratio: f32,
    #[serde(default = "RotateScaleConfig::default_anchor_height_offset")]
    pub anchor_height_offset: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_near")]
    pub near: f32,
    #[serde(default = "CameraConfig::default_far")]
    pub far: f32,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NavigationConfig {
    #[serde(default)]
    pub fly: FlyConfig,
    #[serde(default)]
    pub rotate_scale: RotateScaleConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationConfigOverrides {
    pub move_factor_min: Option<f32>,
    pub move_factor_max: Option<f32>,
    pub anchor_height_offset: Option<f32>,
}

impl FlyConfig {
    fn default_trim_deadzone() -> f32 {
        0.5
    }

    fn default_trim_speed_up() -> f32 {
        1.01
    }

    fn default_trim_slow_down() -> f32 {
        0.99
    }

    pub fn clamp_move_factor(&self, factor: f32) -> f32 {
        let mut clamped = factor;
        if let Some(min) = self.move_factor_min {
            clamped = clamped.max(min);
        }
        if let Some(max) = self.move_factor_max {
            clamped = clamped.min(max);
        }
        clamped
    }
}

impl Default for FlyConfig {
    fn default() -> Self {
        Self {
            trim_deadzone: Self::default_trim_deadzone(),
            trim_speed_up: Self::default_trim_speed_up(),
            trim_slow_down: Self::default_trim_slow_down(),
            move_factor_min: None,
            move_factor_max: None,
        }
    }
}

impl RotateScaleConfig {
    fn default_min_start_distance() -> f32 {
        1.0e-4
    }

    fn default_min_scale_ratio() -> f32 {
        1.0e-3
    }

    fn default_anchor_height_offset() -> f32 {
        0.8
    }
}

impl Default for RotateScaleConfig {
    fn default() -> Self {
        Self {
            min_start_distance: Self::default_min_start_distance(),
            min_scale_ratio: Self::default_min_scale_ratio(),
            anchor_height_offset: Self::default_anchor_height_offset(),
        }
    }
}

impl CameraConfig {
    fn default_near() -> f32 {
        0.01
    }

    fn default_far() -> f32 {
        10_000.0
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { near: Self::default_near(), far: Self::default_far() }
    }
}

impl NavigationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &NavigationConfigOverrides) {
        if let Some(min) = overrides.move_factor_min {
            self.fly.move_factor_min = Some(min);
        }
        if let Some(max) = overrides.move_factor_max {
            self.fly.move_factor_max = Some(max);
        }
        if let Some(offset) = overrides.anchor_height_offset {
            self.rotate_scale.anchor_height_offset = offset;
        }
    }
}

impl NavigationConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.move_factor_min.is_none() && self.move_factor_max.is_none() && self.anchor_height_offset.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.move_factor_min.is_some() {
            fields.push("move_factor_min");
        }
        if self.move_factor_max.is_some() {
            fields.push("move_factor_max");
        }
        if self.anchor_height_offset.is_some() {
            fields.push("anchor_height_offset");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let mut temp = NamedTempFile::new().expect("temp config");
        write!(temp, r#"{{"fly":{{"trim_deadzone":0.25,"move_factor_max":8.0}},"camera":{{"far":500.0}}}}"#)
            .expect("write config");

        let cfg = NavigationConfig::load(temp.path()).expect("config parses");
        assert!((cfg.fly.trim_deadzone - 0.25).abs() < f32::EPSILON);
        assert!((cfg.fly.trim_speed_up - 1.01).abs() < f32::EPSILON);
        assert_eq!(cfg.fly.move_factor_min, None);
        assert_eq!(cfg.fly.move_factor_max, Some(8.0));
        assert!((cfg.rotate_scale.anchor_height_offset - 0.8).abs() < f32::EPSILON);
        assert!((cfg.camera.near - 0.01).abs() < f32::EPSILON);
        assert!((cfg.camera.far - 500.0).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = NavigationConfig::load_or_default(dir.path().join("absent.json"));
        assert!((cfg.fly.trim_deadzone - 0.5).abs() < f32::EPSILON);
        assert!(cfg.fly.move_factor_max.is_none());
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut temp = NamedTempFile::new().expect("temp config");
        write!(temp, "{{not json").expect("write config");
        let err = NavigationConfig::load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut cfg = NavigationConfig::default();
        let overrides = NavigationConfigOverrides { move_factor_max: Some(4.0), ..Default::default() };
        cfg.apply_overrides(&overrides);
        assert_eq!(cfg.fly.move_factor_min, None);
        assert_eq!(cfg.fly.move_factor_max, Some(4.0));
        assert_eq!(overrides.applied_fields(), vec!["move_factor_max"]);
        assert!(NavigationConfigOverrides::default().is_empty());
    }

    #[test]
    fn clamp_is_identity_without_bounds() {
        let fly = FlyConfig::default();
        assert!((fly.clamp_move_factor(1.0e6) - 1.0e6).abs() < 1.0);
        let bounded = FlyConfig { move_factor_min: Some(0.5), move_factor_max: Some(2.0), ..fly };
        assert!((bounded.clamp_move_factor(3.0) - 2.0).abs() < f32::EPSILON);
        assert!((bounded.clamp_move_factor(0.1) - 0.5).abs() < f32::EPSILON);
    }
}
