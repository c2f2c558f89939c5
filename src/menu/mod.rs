mod files;
mod resource;

pub use files::{MenuFiles, is_cached, render_date_template};
pub use resource::build_resource_id;
