pub mod error;
pub mod id;
pub mod section;
pub mod time;

pub use error::CoreError;
pub use id::{IdError, TEMP_ID_PREFIX, generate_id, is_temporary_id, parse_real_id, validate_id};
pub use section::SectionType;
pub use time::now_utc;
