mod short_url;

pub use short_url::{create_handler, redirect_handler};
