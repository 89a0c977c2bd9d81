pub mod cleanup;
pub mod registry;
pub mod scanner;
pub mod signup;
pub mod uniqueness;
