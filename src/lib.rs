pub mod conf;
pub mod core;
pub mod io;
pub mod store;

#[cfg(feature = "testutil")]
pub mod testutil;
