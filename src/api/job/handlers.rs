use actix_web::{
    HttpResponse, delete, get, middleware::from_fn, post, put,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::auth::{AuthUser, authenticate};
use super::dto::{JobListResponse, JobResponse, MessageResponse};
use super::models::{CreateJob, JobQuery, NewComment, NewReply, UpdateJob};
use super::service::{JobService, ServiceError};

#[post("")]
async fn create_job(
    service: Data<JobService>,
    user: AuthUser,
    job: Json<CreateJob>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.create_job(user.user_id, job.into_inner()).await?;
    Ok(HttpResponse::Created().json(JobResponse::with_message("Job created successfully", job)))
}

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<JobQuery>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.list_jobs(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JobListResponse { success: true, jobs }))
}

#[get("/{job_id}")]
async fn get_job(service: Data<JobService>, path: Path<i32>) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JobResponse::new(job)))
}

#[put("/{job_id}")]
async fn update_job(
    service: Data<JobService>,
    user: AuthUser,
    path: Path<i32>,
    changes: Json<UpdateJob>,
) -> Result<HttpResponse, ServiceError> {
    let job = service
        .update_job(user.user_id, path.into_inner(), changes.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(JobResponse::with_message("Job updated successfully", job)))
}

#[delete("/{job_id}")]
async fn delete_job(
    service: Data<JobService>,
    user: AuthUser,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let job_id = path.into_inner();
    service.delete_job(user.user_id, job_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Job deleted successfully".to_string(),
    }))
}

#[post("/{job_id}/comments")]
async fn add_comment(
    service: Data<JobService>,
    user: AuthUser,
    path: Path<i32>,
    comment: Json<NewComment>,
) -> Result<HttpResponse, ServiceError> {
    let content = comment.into_inner().content.unwrap_or_default();
    let job = service.add_comment(user.user_id, path.into_inner(), &content).await?;
    Ok(HttpResponse::Ok().json(JobResponse::with_message("Comment added successfully", job)))
}

#[post("/{job_id}/comments/{comment_id}/replies")]
async fn add_reply(
    service: Data<JobService>,
    user: AuthUser,
    path: Path<(i32, i32)>,
    reply: Json<NewReply>,
) -> Result<HttpResponse, ServiceError> {
    let (job_id, comment_id) = path.into_inner();
    let content = reply.into_inner().content.unwrap_or_default();
    let job = service
        .add_reply(user.user_id, job_id, comment_id, &content)
        .await?;
    Ok(HttpResponse::Ok().json(JobResponse::with_message("Reply added successfully", job)))
}

/// Mounts the job routes under `/jobs`, all behind the authentication gate
pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .wrap(from_fn(authenticate))
            .service(create_job)
            .service(list_jobs)
            .service(get_job)
            .service(update_job)
            .service(delete_job)
            .service(add_comment)
            .service(add_reply),
    );
}
