pub mod earning;
pub mod feature;
pub mod macros;
pub mod member;
pub mod notification;

// Re-export all models for easy importing
pub use earning::*;
pub use feature::*;
pub use member::*;
pub use notification::*;
