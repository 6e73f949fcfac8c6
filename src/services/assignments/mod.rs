pub mod grade;
pub mod list;
pub mod stats;
pub mod submit;
pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::requests::{
    GradeAssignmentRequest, SubmitAssignmentRequest, UpsertAssignmentRequest,
};
use crate::models::auth::entities::AuthPrincipal;
use crate::storage::Storage;
use crate::workflow::AssignmentWorkflow;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn workflow(&self, request: &HttpRequest) -> AssignmentWorkflow {
        AssignmentWorkflow::new(self.get_storage(request))
    }

    /// 列出请求主体可见的作业
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        principal: AuthPrincipal,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, principal).await
    }

    /// 新建或编辑草稿
    pub async fn upsert_assignment(
        &self,
        request: &HttpRequest,
        principal: AuthPrincipal,
        req: UpsertAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_assignment(self, request, principal, req).await
    }

    /// 提交草稿
    pub async fn submit_assignment(
        &self,
        request: &HttpRequest,
        principal: AuthPrincipal,
        req: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, request, principal, req).await
    }

    /// 评分或重新评分
    pub async fn grade_assignment(
        &self,
        request: &HttpRequest,
        principal: AuthPrincipal,
        req: GradeAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_assignment(self, request, principal, req).await
    }

    /// 评分统计
    pub async fn assignment_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::assignment_stats(self, request).await
    }
}
