pub mod components;
pub mod error;
pub mod events;
pub mod grid;
pub mod hex;
pub mod persist;
pub mod rng;
pub mod session;
pub mod systems;

pub use error::RestoreError;
pub use events::{Event, GameOverReason, GamePhase};
pub use grid::{Board, Cell, Special};
pub use hex::HexGeometry;
pub use persist::{PersistentState, WireCell};
pub use rng::Rng;
pub use session::{Action, GameSession};
