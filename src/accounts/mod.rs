pub mod commands;
pub mod password;
