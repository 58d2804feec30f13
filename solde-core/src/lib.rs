//! solde-core: shared types for the statement balance extractor

pub mod error;
pub mod layout;
pub mod money;
pub mod record;
pub mod series;
pub mod value;

pub use error::{Boundary, ExtractError, Result};
pub use layout::Layout;
pub use money::format_minor_units;
pub use record::{Record, RecordKind};
pub use series::{IgnoreRules, filter_values};
pub use value::Value;
