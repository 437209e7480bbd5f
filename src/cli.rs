//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ScenarioConfig;
use crate::devices::{BatteryKind, InverterKind, LoadShape};

#[derive(Debug, Parser)]
#[command(
    name = "offgrid-sim",
    version,
    about = "Size the panel and battery of an off-grid solar system",
    after_help = "If no --scenario or --preset is given, the baseline preset is used."
)]
pub struct CliArgs {
    /// Load scenario from TOML config file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, night_lithium, continuous_flat)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the inverter preset
    #[arg(long, value_enum)]
    pub inverter: Option<InverterKind>,

    /// Override the load shape
    #[arg(long, value_enum)]
    pub load: Option<LoadShape>,

    /// Override the battery chemistry
    #[arg(long, value_enum)]
    pub battery: Option<BatteryKind>,

    /// Export the sized system's step trace to CSV
    #[arg(long, value_name = "PATH", conflicts_with = "matrix")]
    pub trace_out: Option<PathBuf>,

    /// Run every inverter × load × battery combination and print a LaTeX table
    #[arg(long)]
    pub matrix: bool,

    /// Only log warnings and errors
    #[arg(long, short)]
    pub quiet: bool,
}

impl CliArgs {
    /// Resolves the scenario: `--scenario` file, else `--preset`, else baseline,
    /// then applies the component overrides.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unreadable file or unknown preset.
    pub fn scenario(&self) -> Result<ScenarioConfig, crate::config::ConfigError> {
        let mut cfg = match (&self.scenario, &self.preset) {
            (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
            (None, Some(name)) => ScenarioConfig::from_preset(name)?,
            (None, None) => ScenarioConfig::baseline(),
        };
        if let Some(kind) = self.inverter {
            cfg.inverter.kind = kind;
        }
        if let Some(shape) = self.load {
            cfg.load.shape = shape;
        }
        if let Some(kind) = self.battery {
            cfg.battery = crate::config::BatteryConfig::preset(kind);
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("offgrid-sim").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_baseline() {
        let args = parse(&[]).unwrap();
        assert!(!args.matrix);
        assert_eq!(args.scenario().unwrap().label(), "typical day lead_acid");
    }

    #[test]
    fn preset_with_overrides() {
        let args = parse(&["--preset", "night_lithium", "--inverter", "flat"]).unwrap();
        let cfg = args.scenario().unwrap();
        assert_eq!(cfg.label(), "flat night lithium_ion");
    }

    #[test]
    fn battery_override_resets_to_preset() {
        let args = parse(&["--battery", "lithium_ion"]).unwrap();
        assert_eq!(args.scenario().unwrap().battery.kind, BatteryKind::LithiumIon);
    }

    #[test]
    fn scenario_and_preset_conflict() {
        assert!(parse(&["--scenario", "a.toml", "--preset", "baseline"]).is_err());
    }

    #[test]
    fn unknown_preset_is_reported() {
        let args = parse(&["--preset", "nope"]).unwrap();
        assert!(args.scenario().is_err());
    }

    #[test]
    fn unknown_inverter_rejected() {
        assert!(parse(&["--inverter", "quantum"]).is_err());
    }
}
