//! simplekube core: the pieces every query shares.
//!
//! Error taxonomy and the not-found normalizer, the label selector builder,
//! list query options and the cancellation/deadline context handed to backends.

#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod labels;
pub mod options;

pub use context::Context;
pub use error::{format, Error, Result, TranslateError, NOT_FOUND};
pub use labels::flatten_labels;
pub use options::{ListFilter, QueryOptions};

pub mod prelude {
    pub use super::{flatten_labels, format, Context, Error, ListFilter, QueryOptions, Result, TranslateError, NOT_FOUND};
}
