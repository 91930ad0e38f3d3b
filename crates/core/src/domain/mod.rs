pub mod amounts;
pub mod events;
pub mod pool;
pub mod values;

pub use amounts::{ScaledAmount, SCALE_DECIMALS, UNITS_PER_TOKEN};
pub use events::{EventLog, SwapEvent};
pub use pool::{AccountSnapshot, PoolSnapshot, Quote, SwapDirection};
pub use values::ScValue;
