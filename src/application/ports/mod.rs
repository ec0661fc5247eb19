pub mod clock;
pub mod password;
