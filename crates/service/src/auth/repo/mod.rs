pub mod kv;

pub use kv::KvAccountRepository;
