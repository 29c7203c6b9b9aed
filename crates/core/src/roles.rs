//! User role names as supplied by the identity provider's claims.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Role assigned when the provider's claims carry no role.
pub const DEFAULT_ROLE: &str = ROLE_USER;

pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        assert!(is_valid_role(ROLE_ADMIN));
        assert!(is_valid_role(ROLE_USER));
    }

    #[test]
    fn unknown_role_is_invalid() {
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role(""));
    }
}
