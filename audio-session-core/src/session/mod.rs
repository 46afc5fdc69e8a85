pub mod controller;
pub mod engine_binding;
