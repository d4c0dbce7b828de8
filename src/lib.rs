#![forbid(unsafe_code)]

pub mod buffer;
pub mod codec;
pub mod error;
pub mod ops;
pub mod pipeline;
pub mod registry;
pub mod session;
pub mod settings;
pub mod store;

pub use buffer::PixelBuffer;
pub use error::{TuneError, TuneResult};
pub use ops::{ColorOp, Operation, TransparencyOp};
pub use pipeline::run_pipeline;
pub use registry::OperationRegistry;
pub use session::{DisplayMode, OpenReport, Session};
pub use settings::SettingsMap;
pub use store::{load_settings, save_settings};
