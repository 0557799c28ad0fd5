mod form_params;
pub use form_params::FormParams;

mod sample;
pub use sample::Sample;

mod result_item;
pub use result_item::ResultItem;

mod result_type;
pub use result_type::ResultType;

mod query_spec;
pub use query_spec::QuerySpec;

mod range_spec;
pub use range_spec::RangeSpec;

mod step;
pub use step::{DEFAULT_STEP, Step};

mod time_range;
pub use time_range::{DEFAULT_WINDOW_SECS, TimeRange, unix_now};

mod target_state;
pub use target_state::TargetState;

/// Unix epoch timestamp in seconds.
///
/// Used for the `time`, `start` and `end` request parameters.
pub type Timestamp = i64;
