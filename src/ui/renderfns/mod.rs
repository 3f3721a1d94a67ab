pub mod header;
pub mod status_bar;
pub mod utils;

pub use header::{draw_header, extract_domain};
pub use status_bar::draw_status_bar;
pub use utils::{approval_color, format_amount, format_date, truncate};
