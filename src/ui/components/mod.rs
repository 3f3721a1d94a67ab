mod key_result;
mod select;

pub use key_result::KeyResult;
pub use select::{Select, SelectEvent, SelectItem};
