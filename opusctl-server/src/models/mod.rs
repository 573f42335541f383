//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod title;
pub mod composer;
pub mod work;
pub mod filter;

pub use validation::{parse_id, Validate, ValidationError};
pub use title::WorkTitle;
pub use composer::{
    ComposerName, ComposerPatch, CreateComposerRequest, NewComposer, NotableWorkRequest,
    UpdateComposerRequest,
};
pub use work::{CreateWorkRequest, NewWork, UpdateWorkRequest, WorkPatch};
pub use filter::{
    BornFilter, ComposerFilter, ComposerQueryParams, ComposerSortField, SortDirection, SortKey,
    WorkFilter, WorkQueryParams,
};
