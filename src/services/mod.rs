use std::sync::Arc;

use actix_web::web;

mod short_url;

pub use short_url::{ShortUrlService, ShortUrlServiceTrait};

use crate::repositories::MappingRepository;

/// Service Register
pub fn register(repository: Arc<dyn MappingRepository>, cfg: &mut web::ServiceConfig) {
    let short_url_service = ShortUrlService::new(repository);
    cfg.app_data(web::Data::new(short_url_service));
}
