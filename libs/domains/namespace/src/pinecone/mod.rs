mod client;

pub use client::PineconeRepository;
