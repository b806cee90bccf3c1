//! Dataset store, column inspector and plot renderers for uploaded CSV
//! tables.
//!
//! ```text
//!   DatasetService ──► DatasetStore ──► loader ──► Table
//!                                                   │
//!                          inspect ◄────────────────┤
//!                          plot::histogram ◄────────┘
//! ```

pub mod color;
pub mod data;
pub mod error;
pub mod plot;
pub mod service;

pub use data::model::{Column, DataType, Table, Value};
pub use data::store::DatasetStore;
pub use error::{DatasetError, ErrorKind, ErrorReport, Result};
pub use service::DatasetService;
