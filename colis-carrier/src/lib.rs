pub mod barid;

pub use barid::{register, BaridClient, BaridTunables};
