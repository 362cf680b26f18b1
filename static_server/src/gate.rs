use actix_service::{forward_ready, Service, Transform};
use actix_web::{
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{header, Method},
    Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use lms_gate::{
    edge::{decide_at_edge, is_asset, PRESENCE_COOKIE, ROLE_COOKIE},
    Decision,
};
use log::debug;
use std::sync::Arc;

/* -------------------------------------------------------------------------- */
/*            Middleware – décision d'accès avant de servir la SPA             */
/* -------------------------------------------------------------------------- */

#[derive(Clone)]
pub struct EdgeGate;

pub struct GateService<S> {
    inner: Arc<S>,
}

impl<S> Transform<S, ServiceRequest> for EdgeGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response  = ServiceResponse<BoxBody>;
    type Error     = Error;
    type InitError = ();
    type Transform = GateService<S>;
    type Future    = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, srv: S) -> Self::Future {
        ready(Ok(GateService { inner: Arc::new(srv) }))
    }
}

impl<S> Service<ServiceRequest> for GateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error    = Error;
    type Future   = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let inner = self.inner.clone();

        // pages seulement : assets et méthodes d'écriture passent tels quels
        let is_page = matches!(*req.method(), Method::GET | Method::HEAD) && !is_asset(req.path());
        if !is_page {
            return Box::pin(async move { inner.call(req).await });
        }

        let presence = req.cookie(PRESENCE_COOKIE);
        let role     = req.cookie(ROLE_COOKIE);
        let decision = decide_at_edge(
            presence.as_ref().map(|c| c.value()),
            role.as_ref().map(|c| c.value()),
            req.path(),
        );

        match decision {
            Decision::RedirectTo(target) => {
                debug!(
                    "edge redirect {} -> {} (role: {})",
                    req.path(),
                    target,
                    role.as_ref().map_or("-", |c| c.value())
                );
                let resp = HttpResponse::Found()
                    .insert_header((header::LOCATION, target))
                    .finish();
                Box::pin(async move { Ok(req.into_response(resp)) })
            }
            Decision::Allow | Decision::Defer => Box::pin(async move { inner.call(req).await }),
        }
    }
}
