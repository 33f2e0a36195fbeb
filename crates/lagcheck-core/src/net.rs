mod platform;

pub mod socket;

pub use platform::SocketImpl;
