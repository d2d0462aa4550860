//! The standard policy table.
//!
//! | Policy      | Requirements                                              |
//! |-------------|-----------------------------------------------------------|
//! | `Application` | `amr = Application`, `scope = api`                      |
//! | `Web`       | `Application` plus `client_id = web`                      |
//! | `Push`      | `scope = api.push`                                        |
//! | `Licensing` | `scope = api.licensing`                                   |
//!
//! All four require an authenticated user. `Application` and `Web` only
//! accept principals from the current and legacy bearer schemes.

use warden_security::constants::{
    AUTHENTICATION_METHOD, BEARER_SCHEME, CLIENT_ID, LEGACY_BEARER_SCHEME, SCOPE,
};

use crate::models::{ClaimPredicate, Policy};

pub const APPLICATION: &str = "Application";
pub const WEB: &str = "Web";
pub const PUSH: &str = "Push";
pub const LICENSING: &str = "Licensing";

/// Authentication method value carried by application tokens.
pub const APPLICATION_AUTHENTICATION_METHOD: &str = "Application";

pub const API_SCOPE: &str = "api";
pub const PUSH_SCOPE: &str = "api.push";
pub const LICENSING_SCOPE: &str = "api.licensing";

/// Client id of the web vault.
pub const WEB_CLIENT_ID: &str = "web";

fn application(name: &str) -> Policy {
    Policy::new(name)
        .schemes([BEARER_SCHEME, LEGACY_BEARER_SCHEME])
        .require(ClaimPredicate::equals(
            AUTHENTICATION_METHOD,
            APPLICATION_AUTHENTICATION_METHOD,
        ))
        .require(ClaimPredicate::equals(SCOPE, API_SCOPE))
}

/// The four policies every deployment declares.
#[must_use]
pub fn standard_policies() -> Vec<Policy> {
    vec![
        application(APPLICATION),
        application(WEB).require(ClaimPredicate::equals(CLIENT_ID, WEB_CLIENT_ID)),
        Policy::new(PUSH).require(ClaimPredicate::equals(SCOPE, PUSH_SCOPE)),
        Policy::new(LICENSING).require(ClaimPredicate::equals(SCOPE, LICENSING_SCOPE)),
    ]
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn web_refines_application() {
        let policies = standard_policies();
        let app = &policies[0];
        let web = &policies[1];

        assert_eq!(web.name, WEB);
        assert!(
            app.requirements
                .iter()
                .all(|p| web.requirements.contains(p))
        );
        assert_eq!(web.authentication_schemes, app.authentication_schemes);
    }

    #[test]
    fn standard_names_are_unique() {
        let policies = standard_policies();
        let mut names: Vec<_> = policies.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), policies.len());
    }
}
