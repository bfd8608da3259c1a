// Interface adapters: HTTP surface, wire protocol and storage adapters.

pub mod handlers;
pub mod memory;
pub mod postgres;
pub mod protocol;
pub mod routes;
pub mod state;
