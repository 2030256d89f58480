pub mod error;
pub mod normalize;
pub mod rest;
pub mod traits;
pub mod wire;

pub use error::{RemoteError, RemoteResult};
pub use normalize::{normalize_board, FieldDirectory};
pub use rest::RestBoardSource;
pub use traits::BoardSource;
