pub mod reqwest_gateway;

pub use reqwest_gateway::ReqwestGateway;
