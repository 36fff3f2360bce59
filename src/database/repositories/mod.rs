pub mod earning;
pub mod feature_access;
pub mod member;
pub mod notification;

// Re-export all repositories for easy importing
pub use earning::EarningRepository;
pub use feature_access::FeatureAccessRepository;
pub use member::MemberRepository;
pub use notification::NotificationRepository;
