#![deny(clippy::all)]

pub use crate::client::{HttpTransport, ImageSource, Lens, LensTransport};
pub use crate::config::LensConfig;
pub use crate::error::{LensError, Result};
pub use crate::navigator::{VisualBlocks, VisualMatch, VisualResultSet};
pub use crate::payload::{EmbeddedPayload, PayloadKey, WrapperStrategy};
pub use crate::results::{LensResults, RawPage};

pub mod client;
pub mod config;
pub mod error;
pub mod navigator;
pub mod payload;
mod results;
