/*!
 * 请求主体解析中间件
 *
 * 从 `X-Principal` 请求头中解析身份声明，核对名册后把 [`AuthPrincipal`]
 * 放入请求扩展，供后续中间件和处理程序使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::{RequirePrincipal, RequireRole};
 * use crate::models::auth::entities::Role;
 *
 * web::scope("/api/v1/student")
 *     .wrap(RequirePrincipal)
 *     .service(
 *         web::scope("")
 *             .wrap(RequireRole::new(Role::Student))
 *             .route("/assignments", web::get().to(list_assignments)),
 *     )
 * ```
 *
 * ## 请求头格式
 *
 * ```text
 * X-Principal: {"user_id": 3, "teacher_id": 1}
 * ```
 *
 * `student_id`、`teacher_id`、`principal_id` 必须恰好出现一个。
 * 角色记录必须存在且属于 `user_id`，核对结果按 `principal:{role}:{id}` 缓存。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::errors::WorkflowError;
use crate::models::ErrorCode;
use crate::models::auth::entities::{AuthPrincipal, PrincipalClaims};
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

pub const PRINCIPAL_HEADER: &str = "X-Principal";

#[derive(Clone)]
pub struct RequirePrincipal;

/// 解析失败的原因
#[derive(Debug)]
enum PrincipalRejection {
    Missing,
    Invalid(String),
    Store(WorkflowError),
}

impl PrincipalRejection {
    fn status(&self) -> StatusCode {
        match self {
            PrincipalRejection::Missing | PrincipalRejection::Invalid(_) => {
                StatusCode::UNAUTHORIZED
            }
            PrincipalRejection::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            PrincipalRejection::Missing => ErrorCode::PrincipalMissing,
            PrincipalRejection::Invalid(_) => ErrorCode::PrincipalInvalid,
            PrincipalRejection::Store(_) => ErrorCode::InternalServerError,
        }
    }

    fn message(&self) -> String {
        match self {
            PrincipalRejection::Missing => "principal not found".to_string(),
            PrincipalRejection::Invalid(msg) => msg.clone(),
            PrincipalRejection::Store(e) => e.message().to_string(),
        }
    }
}

fn cache_key(principal: &AuthPrincipal) -> String {
    format!("principal:{}:{}", principal.role, principal.id)
}

// 辅助函数：解析请求头中的身份声明
fn parse_claims(req: &ServiceRequest) -> Result<AuthPrincipal, PrincipalRejection> {
    let raw = req
        .headers()
        .get(PRINCIPAL_HEADER)
        .ok_or(PrincipalRejection::Missing)?
        .to_str()
        .map_err(|_| PrincipalRejection::Invalid("principal header is not valid text".into()))?;

    let claims: PrincipalClaims = serde_json::from_str(raw)
        .map_err(|e| PrincipalRejection::Invalid(format!("malformed principal: {e}")))?;

    AuthPrincipal::from_claims(&claims)
        .map_err(|e| PrincipalRejection::Invalid(e.message().to_string()))
}

// 辅助函数：核对角色记录归属
async fn resolve_principal(req: &ServiceRequest) -> Result<AuthPrincipal, PrincipalRejection> {
    let principal = parse_claims(req)?;
    let key = cache_key(&principal);

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    // 缓存中保存角色记录所属的 user_id
    match cache.get_raw(&key).await {
        CacheResult::Found(owner) => match owner.parse::<i64>() {
            Ok(owner) if owner == principal.user_id => return Ok(principal),
            Ok(_) => {
                return Err(PrincipalRejection::Invalid(format!(
                    "{} {} does not belong to user {}",
                    principal.role, principal.id, principal.user_id
                )));
            }
            Err(_) => {
                cache.remove(&key).await;
                info!("Dropped malformed cached principal owner for {}", key);
            }
        },
        _ => {
            debug!("Principal owner not found in cache: {}", key);
        }
    }

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let member = storage
        .get_role_member(principal.role, principal.id)
        .await
        .map_err(PrincipalRejection::Store)?
        .ok_or_else(|| {
            PrincipalRejection::Invalid(format!("{} {} not found", principal.role, principal.id))
        })?;

    cache
        .insert_raw(
            key,
            member.user_id.to_string(),
            AppConfig::get().cache.default_ttl,
        )
        .await;

    if member.user_id != principal.user_id {
        return Err(PrincipalRejection::Invalid(format!(
            "{} {} does not belong to user {}",
            principal.role, principal.id, principal.user_id
        )));
    }

    Ok(principal)
}

impl<S, B> Transform<S, ServiceRequest> for RequirePrincipal
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePrincipalMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePrincipalMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequirePrincipalMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequirePrincipalMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match resolve_principal(&req).await {
                Ok(principal) => {
                    debug!(
                        "Principal resolved: {} {} (user {})",
                        principal.role, principal.id, principal.user_id
                    );
                    req.extensions_mut().insert(principal);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(rejection) => {
                    if let PrincipalRejection::Store(ref e) = rejection {
                        error!("Principal lookup failed for {}: {}", req.path(), e);
                    } else {
                        info!(
                            "Principal rejected for request to {}: {}",
                            req.path(),
                            rejection.message()
                        );
                    }
                    Ok(req.into_response(
                        create_error_response(
                            rejection.status(),
                            rejection.code(),
                            &rejection.message(),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取主体信息
impl RequirePrincipal {
    /// 从请求扩展中提取已解析的主体
    /// 此函数应该在应用了RequirePrincipal中间件的路由处理程序中使用
    pub fn extract_principal(req: &actix_web::HttpRequest) -> Option<AuthPrincipal> {
        req.extensions().get::<AuthPrincipal>().copied()
    }
}
