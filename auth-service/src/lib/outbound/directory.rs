pub mod client;

pub use client::HttpCredentialsDirectory;
