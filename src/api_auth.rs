use std::future::{ready, Ready};
use std::rc::Rc;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse, http::StatusCode,
    body::{BoxBody, EitherBody},
};
use futures::future::LocalBoxFuture;
use log::warn;
use std::task::{Context, Poll};

/// Bearer-token guard for the API. With no key configured every request
/// passes through.
pub struct ApiKey {
    key: Option<Rc<str>>,
}

impl ApiKey {
    pub fn new(key: Option<String>) -> Self {
        ApiKey {
            key: key.map(Rc::from),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKey
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Transform = ApiKeyMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyMiddleware {
            service,
            key: self.key.clone(),
        }))
    }
}

pub struct ApiKeyMiddleware<S> {
    service: S,
    key: Option<Rc<str>>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authorized = match &self.key {
            None => true,
            Some(api_key) => req
                .headers()
                .get("Authorization")
                .and_then(|header| header.to_str().ok())
                .and_then(|header| header.strip_prefix("Bearer "))
                .map_or(false, |token| token == &**api_key),
        };

        if authorized {
            let fut = self.service.call(req);
            Box::pin(async move {
                let res: ServiceResponse<B> = fut.await?;
                Ok(res.map_into_left_body())
            })
        } else {
            warn!("Rejected unauthorized request to {}", req.path());
            Box::pin(async move {
                let (http_req, _payload) = req.into_parts();
                let res = HttpResponse::new(StatusCode::UNAUTHORIZED);
                Ok(ServiceResponse::new(http_req, res).map_into_right_body())
            })
        }
    }
}
