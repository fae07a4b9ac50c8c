pub mod check;
pub mod init;
pub mod prompt;
pub mod quiz;
