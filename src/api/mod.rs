pub mod handlers;
pub mod parsers;
pub mod routes;
