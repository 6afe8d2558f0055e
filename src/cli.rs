use crate::config::NavigationConfigOverrides;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    pub recording: Option<PathBuf>,
    pub config: Option<PathBuf>,
    move_factor_min: Option<f32>,
    move_factor_max: Option<f32>,
    anchor_offset: Option<f32>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Use --recording/--config and tuning flags with values.");
            };
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "recording" => overrides.recording = Some(PathBuf::from(value)),
                "config" => overrides.config = Some(PathBuf::from(value)),
                "move-factor-min" => overrides.move_factor_min = Some(parse_positive(flag, &value)?),
                "move-factor-max" => overrides.move_factor_max = Some(parse_positive(flag, &value)?),
                "anchor-offset" => {
                    overrides.anchor_offset =
                        Some(value.parse::<f32>().with_context(|| format!("Invalid anchor offset '{value}'"))?);
                }
                _ => bail!(
                    "Unknown flag '{flag}'. Supported flags: --recording, --config, --move-factor-min, \
                     --move-factor-max, --anchor-offset."
                ),
            }
        }
        if let (Some(min), Some(max)) = (overrides.move_factor_min, overrides.move_factor_max) {
            if min > max {
                bail!("--move-factor-min ({min}) exceeds --move-factor-max ({max})");
            }
        }
        Ok(overrides)
    }

    pub fn config_overrides(&self) -> NavigationConfigOverrides {
        NavigationConfigOverrides {
            move_factor_min: self.move_factor_min,
            move_factor_max: self.move_factor_max,
            anchor_height_offset: self.anchor_offset,
        }
    }
}

fn parse_positive(flag: &str, value: &str) -> Result<f32> {
    let parsed = value.parse::<f32>().with_context(|| format!("Invalid {flag} value '{value}'"))?;
    if !parsed.is_finite() || parsed <= 0.0 {
        bail!("{flag} must be a positive number, got '{value}'");
    }
    Ok(parsed)
}
