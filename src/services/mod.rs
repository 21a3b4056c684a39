pub mod poller;

pub use poller::{CycleOutcome, Poller};
