pub mod constants;
pub mod frame;
pub mod model_resolver;
pub mod region;
pub mod stream_metadata;

#[cfg(test)]
pub(crate) mod test_http;
