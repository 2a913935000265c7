//! Adapters connecting ports to concrete infrastructure.

pub mod rpc_node;

pub use rpc_node::RpcNode;
