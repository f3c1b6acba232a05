use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::password::verify_password;
use crate::auth::repo::{AccountStatus, User};
use crate::error::AuthFailure;

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Login decision over an already-fetched row. Checks run in a fixed order:
/// existence, status, verification, password. A missing hash (Google-only
/// account) counts as a bad password.
pub fn check_login(user: Option<User>, password: &str) -> Result<User, AuthFailure> {
    let user = user.ok_or(AuthFailure::NotFound)?;

    if user.estado == AccountStatus::Blocked {
        return Err(AuthFailure::Blocked);
    }
    if !user.verificado {
        return Err(AuthFailure::Unverified);
    }

    let hash = user.password_hash.as_deref().ok_or(AuthFailure::BadPassword)?;
    if !verify_password(password, hash) {
        return Err(AuthFailure::BadPassword);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::auth::repo::Role;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn make_user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            nombre: "Ana".into(),
            email: "ana@x.com".into(),
            password_hash: Some(hash_password(password).unwrap()),
            verificado: true,
            estado: AccountStatus::Active,
            tipo_usuario: Role::Customer,
            verify_token: None,
            reset_token: None,
            reset_token_expires: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn valid_credentials_log_in() {
        let user = make_user("pw123456");
        let resolved = check_login(Some(user.clone()), "pw123456").expect("login");
        assert_eq!(resolved.id, user.id);
    }

    #[test]
    fn missing_user_is_not_found() {
        assert_eq!(check_login(None, "pw").unwrap_err(), AuthFailure::NotFound);
    }

    #[test]
    fn blocked_wins_over_correct_password() {
        let mut user = make_user("pw123456");
        user.estado = AccountStatus::Blocked;
        assert_eq!(
            check_login(Some(user), "pw123456").unwrap_err(),
            AuthFailure::Blocked
        );
    }

    #[test]
    fn blocked_wins_over_unverified() {
        let mut user = make_user("pw123456");
        user.estado = AccountStatus::Blocked;
        user.verificado = false;
        assert_eq!(
            check_login(Some(user), "pw123456").unwrap_err(),
            AuthFailure::Blocked
        );
    }

    #[test]
    fn unverified_wins_over_correct_password() {
        let mut user = make_user("pw123456");
        user.verificado = false;
        assert_eq!(
            check_login(Some(user), "pw123456").unwrap_err(),
            AuthFailure::Unverified
        );
    }

    #[test]
    fn wrong_password_is_rejected() {
        let user = make_user("pw123456");
        assert_eq!(
            check_login(Some(user), "wrong").unwrap_err(),
            AuthFailure::BadPassword
        );
    }

    #[test]
    fn google_only_account_has_no_local_login() {
        let mut user = make_user("pw123456");
        user.password_hash = None;
        assert_eq!(
            check_login(Some(user), "pw123456").unwrap_err(),
            AuthFailure::BadPassword
        );
    }

    #[test]
    fn email_normalization_and_shape() {
        assert_eq!(normalize_email("  Ana@X.Com "), "ana@x.com");
        assert!(is_valid_email("ana@x.com"));
        assert!(!is_valid_email("ana@x"));
        assert!(!is_valid_email("not an email"));
    }
}
