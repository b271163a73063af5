// Event query service: outbound search, response interpretation, tool text
pub mod client;
pub mod models;
pub mod summary;
pub mod time;

pub use client::TicketmasterClient;
pub use models::{Event, EventList, EventQuery, EventSearchResult};
pub use summary::summarize;
