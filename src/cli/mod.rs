pub mod convert;
pub mod rates;
pub mod setup;
pub mod sum;
pub mod swap;
pub mod ui;
pub mod watch;
