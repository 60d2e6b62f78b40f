//! Role and ownership based access control

use vconnect_db::Role;

use crate::error::AuthError;
use crate::principal::Principal;

/// Authorization requirement for one operation.
///
/// Ownership checks expect the caller to have already resolved the owning
/// account id from the persistence layer.
#[derive(Debug, Clone, Copy)]
pub enum AccessRule<'a> {
    /// Any authenticated principal passes.
    AnyAuthenticated,
    /// The principal's role must be one of the listed roles.
    RoleIn(&'a [Role]),
    /// The principal owns the resource or holds one of the listed roles.
    OwnerOrRoleIn { owner_id: i64, roles: &'a [Role] },
}

/// Evaluate a rule against an optional principal.
///
/// Pure function of principal and rule; no I/O. An anonymous request fails
/// every rule.
pub fn authorize(principal: Option<&Principal>, rule: AccessRule<'_>) -> bool {
    let Some(principal) = principal else {
        return false;
    };
    match rule {
        AccessRule::AnyAuthenticated => true,
        AccessRule::RoleIn(roles) => roles.contains(&principal.role),
        AccessRule::OwnerOrRoleIn { owner_id, roles } => {
            roles.contains(&principal.role) || principal.id == owner_id
        }
    }
}

/// Evaluate a rule, mapping a failure to the matching error kind:
/// no principal at all is `MissingCredentials` (401), an authenticated
/// principal failing the rule is `InsufficientPermissions` (403).
pub fn require(principal: Option<&Principal>, rule: AccessRule<'_>) -> Result<(), AuthError> {
    match principal {
        None => Err(AuthError::MissingCredentials),
        Some(p) if authorize(Some(p), rule) => Ok(()),
        Some(_) => Err(AuthError::InsufficientPermissions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal_with(role: Role, id: i64) -> Principal {
        Principal {
            id,
            username: "someone".to_string(),
            role,
            email: "someone@example.com".to_string(),
            first_name: "Some".to_string(),
            last_name: "One".to_string(),
        }
    }

    const ALL_ROLES: [Role; 3] = [Role::Volunteer, Role::Organizer, Role::Admin];

    #[test]
    fn test_any_authenticated() {
        assert!(!authorize(None, AccessRule::AnyAuthenticated));
        for role in ALL_ROLES {
            let p = principal_with(role, 1);
            assert!(authorize(Some(&p), AccessRule::AnyAuthenticated));
        }
    }

    #[test]
    fn test_role_in_single() {
        for role in ALL_ROLES {
            let p = principal_with(role, 1);
            assert_eq!(
                authorize(Some(&p), AccessRule::RoleIn(&[Role::Organizer])),
                role == Role::Organizer
            );
        }
        assert!(!authorize(None, AccessRule::RoleIn(&[Role::Organizer])));
    }

    #[test]
    fn test_role_in_set() {
        let rule = AccessRule::RoleIn(&[Role::Organizer, Role::Admin]);
        for role in ALL_ROLES {
            let p = principal_with(role, 1);
            assert_eq!(authorize(Some(&p), rule), role != Role::Volunteer);
        }
    }

    #[test]
    fn test_owner_or_role_in_exhaustive() {
        // Role x id-match grid against OwnerOrRoleIn(owner_id=5, {ADMIN}).
        let rule = AccessRule::OwnerOrRoleIn {
            owner_id: 5,
            roles: &[Role::Admin],
        };
        for role in ALL_ROLES {
            for id in [5, 7] {
                let p = principal_with(role, id);
                let expected = role == Role::Admin || id == 5;
                assert_eq!(authorize(Some(&p), rule), expected, "{:?}/{}", role, id);
            }
        }
        assert!(!authorize(None, rule));
    }

    #[test]
    fn test_require_distinguishes_missing_and_forbidden() {
        let rule = AccessRule::RoleIn(&[Role::Admin]);

        assert!(matches!(
            require(None, rule),
            Err(AuthError::MissingCredentials)
        ));

        let volunteer = principal_with(Role::Volunteer, 1);
        assert!(matches!(
            require(Some(&volunteer), rule),
            Err(AuthError::InsufficientPermissions)
        ));

        let admin = principal_with(Role::Admin, 1);
        assert!(require(Some(&admin), rule).is_ok());
    }
}
