pub mod api_types;
pub mod client;
pub mod fixture;
pub mod transport;
pub mod types;

#[cfg(test)]
pub mod stub;
