//! Chain composition.

use crate::middleware::{Middleware, Next};
use std::sync::Arc;
use velo_core::{BoxFuture, Request, Response, Result};

/// Composes a middleware list and a terminal stage into one chain.
///
/// The fold runs right to left: the LAST middleware in `stages` becomes
/// the OUTERMOST wrapper and sees the request first, while the FIRST
/// entry runs immediately around the terminal stage. For a route whose
/// flattened middleware list is `[route-level.., inner-group..,
/// outer-group..]` this puts the outermost group around everything else,
/// which is the inheritance order route trees promise.
pub fn compose<F>(stages: &[Arc<dyn Middleware>], terminal: F) -> Next
where
    F: FnOnce(Request) -> BoxFuture<'static, Result<Response>> + Send + 'static,
{
    let mut next = Next::terminal(terminal);
    for middleware in stages.iter().rev() {
        next = Next::wrap(Arc::clone(middleware), next);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::FnMiddleware;
    use http::StatusCode;
    use http_body_util::BodyExt;
    use velo_core::ResponseExt;

    fn empty_request() -> Request {
        http::Request::new(http_body_util::Full::new(bytes::Bytes::new()))
    }

    async fn body_text(response: Response) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collect")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    /// Appends `tag` to the response body on the way out, so the final
    /// body records unwind order (innermost stage appends first).
    fn tagging(tag: &'static str) -> Arc<dyn Middleware> {
        Arc::new(FnMiddleware::new(tag, move |request: Request, next: Next| async move {
            let response = next.run(request).await?;
            let status = response.status();
            let mut body = body_text(response).await;
            body.push_str(tag);
            Ok(Response::text(status, body))
        }))
    }

    fn empty_terminal() -> impl FnOnce(Request) -> BoxFuture<'static, Result<Response>> + Send {
        |_request| Box::pin(async { Ok(Response::text(StatusCode::OK, "")) })
    }

    #[tokio::test]
    async fn empty_list_is_just_the_terminal() {
        let chain = compose(&[], empty_terminal());
        let response = chain.run(empty_request()).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn first_entry_is_innermost() {
        let stages = vec![tagging("m1"), tagging("m2"), tagging("m3")];
        let chain = compose(&stages, empty_terminal());
        let response = chain.run(empty_request()).await.expect("response");
        // Unwind order: m1 appends first, m3 last.
        assert_eq!(body_text(response).await, "m1m2m3");
    }

    #[tokio::test]
    async fn outermost_stage_can_stop_the_chain() {
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let ran_inner = Arc::clone(&ran);

        let inner: Arc<dyn Middleware> =
            Arc::new(FnMiddleware::new("inner", move |request: Request, next: Next| {
                let ran = Arc::clone(&ran_inner);
                async move {
                    ran.store(true, std::sync::atomic::Ordering::SeqCst);
                    next.run(request).await
                }
            }));
        let gate: Arc<dyn Middleware> =
            Arc::new(FnMiddleware::new("gate", |_request: Request, _next: Next| async {
                Ok(Response::text(StatusCode::TOO_MANY_REQUESTS, "slow down"))
            }));

        // gate is last, so it wraps inner and runs first.
        let chain = compose(&[inner, gate], empty_terminal());
        let response = chain.run(empty_request()).await.expect("response");

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn request_mutations_reach_the_terminal() {
        #[derive(Clone)]
        struct Marker(&'static str);

        let planter: Arc<dyn Middleware> =
            Arc::new(FnMiddleware::new("planter", |mut request: Request, next: Next| async move {
                request.extensions_mut().insert(Marker("planted"));
                next.run(request).await
            }));

        let chain = compose(&[planter], |request: Request| {
            Box::pin(async move {
                let marker = request
                    .extensions()
                    .get::<Marker>()
                    .map_or("missing", |m| m.0);
                Ok(Response::text(StatusCode::OK, marker))
            })
        });

        let response = chain.run(empty_request()).await.expect("response");
        assert_eq!(body_text(response).await, "planted");
    }
}
