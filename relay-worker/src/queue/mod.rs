//! Queue module for RabbitMQ operations.
//!
//! The relay publishes one JSON message per parsed alert to a single
//! configured destination queue. Broker persistence and clustering are the
//! broker's concern; the queue is the durability boundary for alerts.

pub mod publisher;

pub use publisher::Publisher;
