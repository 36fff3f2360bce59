pub mod access_control;
pub mod aggregation;
pub mod auth;
pub mod earnings;
pub mod period;
pub mod validation;
pub mod viewer_context;

pub use aggregation::EarningsAggregator;
pub use auth::{AuthService, Claims};
pub use earnings::EarningsService;
pub use period::DateRange;
pub use viewer_context::ViewerContext;
