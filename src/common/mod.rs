pub mod claims;
pub mod decode;
pub mod error;
pub mod service;
pub mod signer;
pub mod token;
pub mod types;
pub mod verify;
