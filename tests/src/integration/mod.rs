//! End-to-end scenarios driven through `Chain::push_request`.

pub mod conservation;
pub mod forwarding;
