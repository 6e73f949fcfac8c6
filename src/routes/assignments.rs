use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::principal_or_unauthorized;
use crate::middlewares;
use crate::models::assignments::requests::{
    GradeAssignmentRequest, SubmitAssignmentRequest, UpsertAssignmentRequest,
};
use crate::models::auth::entities::Role;
use crate::services::AssignmentService;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// 列出作业（范围由角色决定）
pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    let principal = match principal_or_unauthorized(&req) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    ASSIGNMENT_SERVICE.list_assignments(&req, principal).await
}

// 新建或编辑草稿
pub async fn upsert_assignment(
    req: HttpRequest,
    body: web::Json<UpsertAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let principal = match principal_or_unauthorized(&req) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    ASSIGNMENT_SERVICE
        .upsert_assignment(&req, principal, body.into_inner())
        .await
}

// 提交草稿
pub async fn submit_assignment(
    req: HttpRequest,
    body: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let principal = match principal_or_unauthorized(&req) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    ASSIGNMENT_SERVICE
        .submit_assignment(&req, principal, body.into_inner())
        .await
}

// 评分（教师与校长）
pub async fn grade_assignment(
    req: HttpRequest,
    body: web::Json<GradeAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let principal = match principal_or_unauthorized(&req) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    ASSIGNMENT_SERVICE
        .grade_assignment(&req, principal, body.into_inner())
        .await
}

// 评分统计
pub async fn assignment_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.assignment_stats(&req).await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student")
            .wrap(middlewares::RequirePrincipal)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(Role::Student))
                    .route("/assignments", web::get().to(list_assignments))
                    .route("/assignments", web::post().to(upsert_assignment))
                    .route("/assignments/submit", web::post().to(submit_assignment)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/teacher")
            .wrap(middlewares::RequirePrincipal)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(Role::Teacher))
                    .route("/assignments", web::get().to(list_assignments))
                    .route("/assignments/grade", web::post().to(grade_assignment)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/principal")
            .wrap(middlewares::RequirePrincipal)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(Role::Principal))
                    .route("/assignments", web::get().to(list_assignments))
                    .route("/assignments/grade", web::post().to(grade_assignment))
                    .route("/assignments/stats", web::get().to(assignment_stats))
                    .route("/teachers", web::get().to(super::teachers::list_teachers)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::AppStartTime;
    use crate::storage::Storage;
    use crate::storage::testing::seeded_dyn_storage;
    use crate::utils::{json_error_handler, query_error_handler};

    const STUDENT_1: &str = r#"{"user_id": 1, "student_id": 1}"#;
    const STUDENT_2: &str = r#"{"user_id": 2, "student_id": 2}"#;
    const TEACHER_1: &str = r#"{"user_id": 3, "teacher_id": 1}"#;
    const TEACHER_2: &str = r#"{"user_id": 4, "teacher_id": 2}"#;
    const PRINCIPAL: &str = r#"{"user_id": 5, "principal_id": 1}"#;

    macro_rules! test_app {
        () => {{
            let storage: Arc<dyn Storage> = seeded_dyn_storage().await;
            let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(64, 60));
            test::init_service(
                App::new()
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                    .app_data(web::Data::new(storage))
                    .app_data(web::Data::new(cache))
                    .app_data(web::Data::new(AppStartTime {
                        start_datetime: chrono::Utc::now(),
                    }))
                    .configure(crate::routes::configure_assignment_routes)
                    .configure(crate::routes::configure_system_routes),
            )
            .await
        }};
    }

    macro_rules! call {
        ($app:expr, $req:expr) => {{
            let resp = test::call_service(&$app, $req.to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    fn ids(body: &Value) -> Vec<i64> {
        body["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_i64().unwrap())
            .collect()
    }

    #[actix_web::test]
    async fn test_ready() {
        let app = test_app!();
        let (status, body) = call!(app, test::TestRequest::get().uri("/"));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ready");
        assert!(body["data"]["time"].is_string());
    }

    #[actix_web::test]
    async fn test_student_lists_own_assignments() {
        let app = test_app!();
        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/student/assignments")
                .insert_header(("X-Principal", STUDENT_1))
        );

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![1, 2, 5]);
        for item in body["data"]["items"].as_array().unwrap() {
            assert_eq!(item["student_id"], 1);
        }
    }

    #[actix_web::test]
    async fn test_missing_principal_header() {
        let app = test_app!();
        let (status, body) = call!(
            app,
            test::TestRequest::get().uri("/api/v1/student/assignments")
        );

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "principal not found");
    }

    #[actix_web::test]
    async fn test_principal_must_match_roster() {
        let app = test_app!();

        // 教师 1 属于用户 3
        let (status, _) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/teacher/assignments")
                .insert_header(("X-Principal", r#"{"user_id": 4, "teacher_id": 1}"#))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/teacher/assignments")
                .insert_header(("X-Principal", r#"{"user_id": 3, "teacher_id": 9}"#))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/teacher/assignments")
                .insert_header(("X-Principal", "not json"))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_role_guard() {
        let app = test_app!();
        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/teacher/assignments")
                .insert_header(("X-Principal", STUDENT_1))
        );

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "requester should be a teacher");
    }

    #[actix_web::test]
    async fn test_student_draft_lifecycle() {
        let app = test_app!();

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/student/assignments")
                .insert_header(("X-Principal", STUDENT_1))
                .set_json(json!({"content": "some text"}))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["state"], "DRAFT");
        assert_eq!(body["data"]["student_id"], 1);
        assert!(body["data"]["grade"].is_null());
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/student/assignments/submit")
                .insert_header(("X-Principal", STUDENT_1))
                .set_json(json!({"id": id, "teacher_id": 2}))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["state"], "SUBMITTED");
        assert_eq!(body["data"]["teacher_id"], 2);

        // 已提交后不可再编辑
        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/student/assignments")
                .insert_header(("X-Principal", STUDENT_1))
                .set_json(json!({"id": id, "content": "changed"}))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "only assignment in draft state can be edited");
    }

    #[actix_web::test]
    async fn test_submit_rejections() {
        let app = test_app!();

        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/student/assignments/submit")
                .insert_header(("X-Principal", STUDENT_2))
                .set_json(json!({"id": 7, "teacher_id": 1}))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/student/assignments/submit")
                .insert_header(("X-Principal", STUDENT_2))
                .set_json(json!({"id": 5, "teacher_id": 1}))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "This assignment belongs to some other student");
    }

    #[actix_web::test]
    async fn test_teacher_grade_and_regrade() {
        let app = test_app!();

        for grade in ["C", "B"] {
            let (status, body) = call!(
                app,
                test::TestRequest::post()
                    .uri("/api/v1/teacher/assignments/grade")
                    .insert_header(("X-Principal", TEACHER_1))
                    .set_json(json!({"id": 4, "grade": grade}))
            );
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["data"]["state"], "GRADED");
            assert_eq!(body["data"]["grade"], grade);
        }
    }

    #[actix_web::test]
    async fn test_teacher_grade_failures() {
        let app = test_app!();

        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/teacher/assignments/grade")
                .insert_header(("X-Principal", TEACHER_2))
                .set_json(json!({"id": 1, "grade": "A"}))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/teacher/assignments/grade")
                .insert_header(("X-Principal", TEACHER_1))
                .set_json(json!({"id": 1, "grade": "AB"}))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/teacher/assignments/grade")
                .insert_header(("X-Principal", TEACHER_1))
                .set_json(json!({"id": 9999, "grade": "A"}))
        );
        assert_eq!(status, StatusCode::NOT_FOUND);

        // 请求体类型错误由 JSON 错误处理器处理
        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/teacher/assignments/grade")
                .insert_header(("X-Principal", TEACHER_1))
                .set_json(json!({"id": "invalid", "grade": "A"}))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 1000);
    }

    #[actix_web::test]
    async fn test_teacher_scope_excludes_drafts_and_others() {
        let app = test_app!();
        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/teacher/assignments")
                .insert_header(("X-Principal", TEACHER_2))
        );

        assert_eq!(status, StatusCode::OK);
        for item in body["data"]["items"].as_array().unwrap() {
            assert_eq!(item["teacher_id"], 2);
            assert!(["SUBMITTED", "GRADED"].contains(&item["state"].as_str().unwrap()));
        }
    }

    #[actix_web::test]
    async fn test_principal_grading() {
        let app = test_app!();

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/principal/assignments/grade")
                .insert_header(("X-Principal", PRINCIPAL))
                .set_json(json!({"id": 5, "grade": "A"}))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "draft cannot be graded");

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/principal/assignments/grade")
                .insert_header(("X-Principal", PRINCIPAL))
                .set_json(json!({"id": 2, "grade": "D"}))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["grade"], "D");
        assert_eq!(body["data"]["teacher_id"], 2);
    }

    #[actix_web::test]
    async fn test_principal_views() {
        let app = test_app!();

        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/principal/assignments")
                .insert_header(("X-Principal", PRINCIPAL))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![1, 2, 3, 4, 6]);

        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/principal/teachers")
                .insert_header(("X-Principal", PRINCIPAL))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![1, 2]);

        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/principal/assignments/stats")
                .insert_header(("X-Principal", PRINCIPAL))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["top_grader"]["teacher_id"], 2);
        assert_eq!(body["data"]["graded_per_student"][0]["student_id"], 2);
    }
}
