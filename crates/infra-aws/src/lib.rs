// ssm-env Infrastructure - AWS Adapter
// Implements: ParameterStore, ParameterStoreFactory

mod client;
mod parameter_store;

pub use client::SsmStoreFactory;
pub use parameter_store::SsmParameterStore;

// Note: SDK errors are flattened into StoreError messages here
// due to Rust's orphan rules (cannot implement From<SdkError<_>> for StoreError)
