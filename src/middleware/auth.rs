use crate::error::AppError;
use crate::utils::jwt::TokenService;
use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use tracing::{error, warn};

/// Admits a request only when it carries `Authorization: Bearer <token>` with
/// a token the registered [`TokenService`] accepts. The decoded claims are
/// handed to downstream handlers through the request extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

/// The token part of a `Bearer` authorization header, if there is one.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn reject<B>(
    req: ServiceRequest,
    err: AppError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B, BoxBody>>, Error>>
where
    B: 'static,
{
    let (req, _pl) = req.into_parts();
    let res = err.error_response();
    Box::pin(async move { Ok(ServiceResponse::new(req, res).map_into_right_body()) })
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(token) = bearer_token(&req) else {
            warn!(path = %req.path(), "Request without bearer token");
            return reject(req, AppError::missing_token());
        };

        let Some(tokens) = req.app_data::<web::Data<TokenService>>().cloned() else {
            error!("TokenService is not registered as app data");
            return reject(
                req,
                AppError::Internal("token service unavailable".to_string()),
            );
        };

        let claims = match tokens.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                // The reason stays server-side
                warn!(reason = %e, path = %req.path(), "Rejected bearer token");
                return reject(req, AppError::invalid_token());
            }
        };

        // Insert claims into request extensions
        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
