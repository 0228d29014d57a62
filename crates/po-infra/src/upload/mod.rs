pub mod unconfigured;

pub use unconfigured::UnconfiguredUpload;
