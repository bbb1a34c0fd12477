pub mod mock_gateway_server;

pub use mock_gateway_server::MockGatewayServer;
