//! Domain entities exchanged with the surrounding application.
//!
//! Everything here is ephemeral: constructed per call from whatever snapshot
//! the caller supplies and discarded when the call returns. The engine never
//! persists or caches these records.

pub mod inventory;
pub mod location;
pub mod picking;

pub use inventory::{InventoryLot, LotStatus, OrderType};
pub use location::{
    Dimensions, LocationStatus, ProductProfile, StorageLocation, TemperatureRegime, Velocity, Zone,
};
pub use picking::{
    OrderAllocation, PickDemand, PickLine, PickListValidation, PickResult, WaveAllocation,
    WaveDemand, WavePickLine,
};
