#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the authentication and policy middleware
//!
//! These tests verify that:
//! 1. Public routes work without a token
//! 2. Current and legacy bearer schemes authenticate through header or query
//! 3. Policies answer 401 for anonymous callers and 403 for missing claims
//! 4. Validator outages fail closed

use std::sync::Arc;

use api_gateway::config::SchemeBindingConfig;
use api_gateway::{ApiGateway, ApiGatewayConfig, GatewayError, Transport};
use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNResolverClient, AuthNResolverError, AuthenticationResult, TokenValidationRequest,
};
use authz_resolver::{AuthZResolverLocalClient, Service};
use authz_resolver_sdk::policies::{APPLICATION, PUSH, WEB, standard_policies};
use authz_resolver_sdk::{AuthZResolverClient, AuthZResolverError};
use axum::{
    Extension, Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    routing::get,
};
use http_body_util::BodyExt;
use static_authn_plugin::StaticAuthNPlugin;
use static_authn_plugin::config::{AuthNMode, StaticAuthNPluginConfig, TokenMapping};
use tower::ServiceExt;
use warden_security::constants::{AUTHENTICATION_METHOD, CLIENT_ID, EMAIL, SCOPE};
use warden_security::{ClaimSet, SecurityContext};

fn token(token: &str, schemes: &[&str], claims: ClaimSet) -> TokenMapping {
    TokenMapping {
        token: token.to_owned(),
        schemes: schemes.iter().map(|s| (*s).to_owned()).collect(),
        claims,
    }
}

fn application_claims(client_id: &str) -> ClaimSet {
    ClaimSet::new()
        .with(AUTHENTICATION_METHOD, "Application")
        .with(SCOPE, "api")
        .with(CLIENT_ID, client_id)
}

fn authn_client() -> Arc<dyn AuthNResolverClient> {
    let cfg = StaticAuthNPluginConfig {
        mode: AuthNMode::StaticTokens,
        tokens: vec![
            token(
                "web-token",
                &[],
                application_claims("web").with(EMAIL, "alice@example.com"),
            ),
            token("mobile-token", &[], application_claims("mobile")),
            token("push-token", &[], ClaimSet::new().with(SCOPE, "api.push")),
            token("internal-token", &["Internal"], application_claims("web")),
        ],
        ..StaticAuthNPluginConfig::default()
    };
    Arc::new(StaticAuthNPlugin::from_config(&cfg))
}

fn authz_client() -> Arc<dyn AuthZResolverClient> {
    let svc = Service::new(standard_policies()).unwrap();
    Arc::new(AuthZResolverLocalClient::new(Arc::new(svc)))
}

fn config(authority: &str) -> ApiGatewayConfig {
    let mut cfg = ApiGatewayConfig {
        self_hosted: true,
        ..ApiGatewayConfig::default()
    };
    cfg.auth.authority = authority.to_owned();
    cfg.auth
        .schemes
        .push(SchemeBindingConfig::new("Internal", "internal_token"));
    cfg
}

/// Handler that reads the `SecurityContext` inserted by the middleware
async fn whoami(Extension(ctx): Extension<SecurityContext>) -> String {
    format!(
        "{}:{}",
        ctx.scheme(),
        ctx.display_name().unwrap_or("anonymous")
    )
}

fn build_app_with(
    cfg: ApiGatewayConfig,
    authn: Arc<dyn AuthNResolverClient>,
) -> Result<Router, GatewayError> {
    ApiGateway::new(cfg, authn, authz_client())?
        .require_policy(APPLICATION, Router::new().route("/identity", get(whoami)))?
        .require_policy(WEB, Router::new().route("/web/profile", get(whoami)))?
        .require_policy(PUSH, Router::new().route("/push/register", get(whoami)))?
        .finalize()
}

fn build_app() -> Router {
    build_app_with(config("http://identity.local/"), authn_client()).unwrap()
}

fn get_request(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = build_app()
        .oneshot(get_request("/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn current_scheme_header_is_authenticated() {
    let response = build_app()
        .oneshot(get_request("/identity", Some("Bearer web-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Bearer:alice@example.com");
}

#[tokio::test]
async fn legacy_scheme_header_is_authenticated() {
    let response = build_app()
        .oneshot(get_request("/web/profile", Some("Bearer3 web-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Bearer3:alice@example.com");
}

#[tokio::test]
async fn query_parameters_authenticate_per_scheme() {
    let app = build_app();

    let response = app
        .clone()
        .oneshot(get_request("/identity?access_token=web-token", None))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "Bearer:alice@example.com");

    let response = app
        .oneshot(get_request("/identity?access_token3=web-token", None))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "Bearer3:alice@example.com");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let response = build_app()
        .oneshot(get_request("/identity", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let response = build_app()
        .oneshot(get_request("/identity", Some("Bearer forged-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_claim_is_forbidden_without_naming_it() {
    let app = build_app();

    let wrong_client = app
        .clone()
        .oneshot(get_request("/web/profile", Some("Bearer mobile-token")))
        .await
        .unwrap();
    assert_eq!(wrong_client.status(), StatusCode::FORBIDDEN);

    let wrong_method = app
        .oneshot(get_request("/web/profile", Some("Bearer push-token")))
        .await
        .unwrap();
    assert_eq!(wrong_method.status(), StatusCode::FORBIDDEN);

    let first = body_string(wrong_client).await;
    let second = body_string(wrong_method).await;
    assert_eq!(first, second);
    assert!(!first.contains(CLIENT_ID));
    assert!(!first.contains(AUTHENTICATION_METHOD));
}

#[tokio::test]
async fn application_policy_admits_other_clients() {
    let response = build_app()
        .oneshot(get_request("/identity", Some("Bearer mobile-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Bearer:anonymous");
}

#[tokio::test]
async fn push_policy_checks_scope_only() {
    let app = build_app();

    let response = app
        .clone()
        .oneshot(get_request("/push/register", Some("Bearer push-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/push/register", Some("Bearer web-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn principal_from_unlisted_scheme_is_unauthenticated_for_policy() {
    let app = build_app();

    let response = app
        .clone()
        .oneshot(get_request("/identity?internal_token=internal-token", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get_request("/push/register?internal_token=internal-token", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn https_authority_ignores_plaintext_tokens() {
    let app = build_app_with(config("https://identity.example.com/"), authn_client()).unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/identity", Some("Bearer web-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut tls = get_request("/identity", Some("Bearer web-token"));
    tls.extensions_mut().insert(Transport::Tls);
    let response = app.oneshot(tls).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn undeclared_policy_fails_at_startup() {
    let result = ApiGateway::new(config("http://identity.local/"), authn_client(), authz_client())
        .unwrap()
        .require_policy("Admin", Router::new().route("/admin", get(whoami)));

    assert!(matches!(
        result,
        Err(GatewayError::Policy(AuthZResolverError::UnknownPolicy(name))) if name == "Admin"
    ));
}

/// Validator that is never ready
struct UnavailableAuthN;

#[async_trait]
impl AuthNResolverClient for UnavailableAuthN {
    async fn authenticate(
        &self,
        _request: &TokenValidationRequest<'_>,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        Err(AuthNResolverError::ServiceUnavailable(
            "signing keys not loaded".to_owned(),
        ))
    }
}

#[tokio::test]
async fn validator_outage_is_service_unavailable() {
    let app = build_app_with(config("http://identity.local/"), Arc::new(UnavailableAuthN)).unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/identity", Some("Bearer web-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
