//! Routing rules for report visibility.
//!
//! Who sees which reports is a pure function of (role, user id, assigned
//! category), kept free of database access so the rules are testable on
//! their own. The store applies a scope as a query filter; `allows` makes
//! the same decision for a single fetched report.

use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::models::Category;
use crate::features::users::models::Role;

/// The set of reports a requester may read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleScope {
    /// Admins see everything
    All,
    /// Citizens see their own submissions
    SubmittedBy(Uuid),
    /// Workers see the reports in their assigned category
    Category(Category),
    /// A worker with no assigned category has no work
    Nothing,
}

/// Compute the visible scope for a requester.
///
/// `assigned_category` is the worker's current assignment, looked up per
/// request; it is ignored for citizens and admins.
pub fn visible_scope(
    user: &AuthenticatedUser,
    assigned_category: Option<Category>,
) -> VisibleScope {
    match user.role {
        Role::Admin => VisibleScope::All,
        Role::Citizen => VisibleScope::SubmittedBy(user.user_id),
        Role::Worker => match assigned_category {
            Some(category) => VisibleScope::Category(category),
            None => VisibleScope::Nothing,
        },
    }
}

impl VisibleScope {
    /// Whether a report with the given category and submitter is visible
    pub fn allows(&self, category: Category, submitted_by: Uuid) -> bool {
        match self {
            VisibleScope::All => true,
            VisibleScope::SubmittedBy(user_id) => submitted_by == *user_id,
            VisibleScope::Category(assigned) => category == *assigned,
            VisibleScope::Nothing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{admin_user, citizen_user, worker_user};

    #[test]
    fn test_admin_sees_everything() {
        let scope = visible_scope(&admin_user(), None);
        assert_eq!(scope, VisibleScope::All);
        assert!(scope.allows(Category::Pothole, Uuid::new_v4()));
        assert!(scope.allows(Category::Other, Uuid::new_v4()));
    }

    #[test]
    fn test_citizen_sees_only_own_reports() {
        let citizen = citizen_user();
        let other = citizen_user();
        let scope = visible_scope(&citizen, None);

        assert!(scope.allows(Category::Trash, citizen.user_id));
        assert!(!scope.allows(Category::Trash, other.user_id));
    }

    #[test]
    fn test_worker_sees_exactly_assigned_category() {
        let worker = worker_user();
        let scope = visible_scope(&worker, Some(Category::Trash));

        assert!(scope.allows(Category::Trash, Uuid::new_v4()));
        assert!(!scope.allows(Category::Pothole, Uuid::new_v4()));
        assert!(!scope.allows(Category::WaterLeakage, Uuid::new_v4()));
    }

    #[test]
    fn test_worker_without_category_sees_nothing() {
        let worker = worker_user();
        let scope = visible_scope(&worker, Some(Category::Trash));
        // reassignment is picked up because the scope is recomputed per read
        let reassigned = visible_scope(&worker, None);

        assert_eq!(reassigned, VisibleScope::Nothing);
        for category in [
            Category::Pothole,
            Category::Streetlight,
            Category::Trash,
            Category::WaterLeakage,
            Category::Other,
        ] {
            assert!(!reassigned.allows(category, worker.user_id));
        }
        // sanity: the earlier scope was not Nothing
        assert_ne!(scope, VisibleScope::Nothing);
    }

    #[test]
    fn test_citizen_assigned_category_is_ignored() {
        let citizen = citizen_user();
        let scope = visible_scope(&citizen, Some(Category::Pothole));
        assert_eq!(scope, VisibleScope::SubmittedBy(citizen.user_id));
    }
}
