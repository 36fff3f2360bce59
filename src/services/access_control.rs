use crate::database::models::{Feature, FeatureGrant, MemberRole};

/// Whether `feature` is visible to a member with `role` and `grants`.
/// Admins see everything; otherwise an explicit grant decides and a missing
/// grant leaves the feature visible.
pub fn allows(role: MemberRole, grants: &[FeatureGrant], feature: Feature) -> bool {
    if role == MemberRole::Admin {
        return true;
    }

    grants
        .iter()
        .find(|grant| grant.feature == feature)
        .map_or(true, |grant| grant.enabled)
}

/// Every feature visible under `allows`, in declaration order.
pub fn visible_features(role: MemberRole, grants: &[FeatureGrant]) -> Vec<Feature> {
    Feature::ALL
        .iter()
        .copied()
        .filter(|feature| allows(role, grants, *feature))
        .collect()
}
