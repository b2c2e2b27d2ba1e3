// External I/O operations module
pub mod lock; // Run lock serializing overlapping invocations
