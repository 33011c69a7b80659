mod request;
pub use request::{AsyncRequest, Referer, REQUESTED_WITH_HEADER};
