pub mod focus_delegate;
pub mod host_audio;
pub mod native_engine;
pub mod permission_authority;
