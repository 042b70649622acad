//! Resources: one path, up to six verb handlers.
//!
//! A [`Resource`] lists which of GET, POST, PUT, DELETE, HEAD and PATCH it
//! implements. [`Api::resource`](crate::Api::resource) registers a route for
//! every one of the six; verbs left empty answer `405 Method Not Allowed`.

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// The verb handlers for one resource.
///
/// ```rust,ignore
/// let users = Resource::new()
///     .get(list_users)
///     .post(create_user);
/// ```
#[derive(Clone, Default)]
pub struct Resource {
    get: Option<BoxedHandler>,
    post: Option<BoxedHandler>,
    put: Option<BoxedHandler>,
    delete: Option<BoxedHandler>,
    head: Option<BoxedHandler>,
    patch: Option<BoxedHandler>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(mut self, handler: impl Handler) -> Self {
        self.get = Some(handler.into_boxed_handler());
        self
    }

    pub fn post(mut self, handler: impl Handler) -> Self {
        self.post = Some(handler.into_boxed_handler());
        self
    }

    pub fn put(mut self, handler: impl Handler) -> Self {
        self.put = Some(handler.into_boxed_handler());
        self
    }

    pub fn delete(mut self, handler: impl Handler) -> Self {
        self.delete = Some(handler.into_boxed_handler());
        self
    }

    pub fn head(mut self, handler: impl Handler) -> Self {
        self.head = Some(handler.into_boxed_handler());
        self
    }

    pub fn patch(mut self, handler: impl Handler) -> Self {
        self.patch = Some(handler.into_boxed_handler());
        self
    }

    /// The handler for `method`, if this resource implements it.
    pub(crate) fn handler(&self, method: Method) -> Option<&BoxedHandler> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Connect | Method::Options | Method::Trace => None,
        }
    }

    /// The verbs this resource implements.
    pub fn allowed(&self) -> Vec<Method> {
        Method::RESOURCE.into_iter().filter(|m| self.handler(*m).is_some()).collect()
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource").field("allowed", &self.allowed()).finish()
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::request::Request;

    async fn ok(_req: Request) -> StatusCode {
        StatusCode::OK
    }

    #[test]
    fn empty_resource_allows_nothing() {
        assert!(Resource::new().allowed().is_empty());
    }

    #[test]
    fn reports_only_bound_verbs() {
        let r = Resource::new().get(ok).patch(ok);
        assert_eq!(r.allowed(), [Method::Get, Method::Patch]);
        assert!(r.handler(Method::Options).is_none());
    }
}
