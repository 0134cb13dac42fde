pub mod events;
pub mod init;
pub mod layout;
pub mod root;
