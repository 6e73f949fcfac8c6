pub mod ready;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    /// 就绪检查
    pub async fn ready(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        ready::ready(self, request).await
    }
}
