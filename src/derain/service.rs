use crate::error::ServiceError;
use std::future::Future;
use std::sync::Arc;

/// An image-to-image deraining backend.
///
/// Takes encoded image bytes and resolves to encoded bytes of the processed
/// image, or a structured failure.
///
/// Note: futures are not required to be `Send`; on the web everything runs on
/// the browser's event loop.
pub trait DerainService: Clone + 'static {
    fn derain(&self, input: Arc<[u8]>) -> impl Future<Output = Result<Vec<u8>, ServiceError>>;
}
