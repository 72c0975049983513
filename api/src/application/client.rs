pub mod command;
pub mod http_gateway;
