mod url_mapping;

pub use url_mapping::{
    ErrorResponse, RedirectResponse, ShortenRequest, ShortenResponse, UrlMapping,
};
