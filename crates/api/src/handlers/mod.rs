pub mod calls;
pub mod observability;
pub mod webhook;
pub mod workers;
