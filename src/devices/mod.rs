//! Hardware collaborators queried by the energy balance simulator.

/// Storage battery model and chemistry presets.
pub mod battery;
pub mod curve;
/// Constant-efficiency hardware for tests and sanity checks.
pub mod ideal;
/// Inverter transfer curves.
pub mod inverter;
/// Customer load shapes.
pub mod load;
/// Photovoltaic array and irradiance model.
pub mod panel;
pub mod system;
pub mod types;

// Re-export the main types for convenience
pub use battery::{Battery, BatteryKind};
pub use curve::Curve;
pub use ideal::IdealHardware;
pub use inverter::{Inverter, InverterKind};
pub use load::LoadShape;
pub use panel::{Irradiance, Panel};
pub use system::SystemModel;
pub use types::{HardwareError, HardwareModel};
