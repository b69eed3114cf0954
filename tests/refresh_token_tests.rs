//! Integration tests for refreshing an access token

mod common;

use common::{CLIENT_ID, CLIENT_SECRET, ERROR_BODY, MockTransport, TOKEN_BODY, TOKEN_URL, header};
use oauth2_grants::{
    AccessToken, Authorization, Grant, OAuth2Error, ProtocolError, RefreshTokenFlow,
    RefreshTokenGrant, TokenFlow,
};
use reqwest::StatusCode;

fn authorization(transport: &MockTransport) -> Authorization<&MockTransport> {
    Authorization::from_endpoint(transport, TOKEN_URL)
        .unwrap()
        .with_client_password(CLIENT_ID, CLIENT_SECRET)
}

fn refreshable() -> AccessToken {
    AccessToken::new("2YotnFZFEjr1zCsicMWpAA", "example")
        .with_refresh_token("SplxlOBeZQQYbYS6WxSbIA")
        .with_scope("foo bar")
}

#[tokio::test]
async fn test_refresh_token() {
    let transport = MockTransport::with_response(StatusCode::OK, TOKEN_BODY);

    let token = authorization(&transport)
        .refresh_token(&refreshable())
        .await
        .unwrap();

    assert_eq!(token.access_token(), "2YotnFZFEjr1zCsicMWpAA");
    assert_eq!(token.expires_in(), Some(3600));

    let request = transport.single_request();
    assert_eq!(
        header(&request, "authorization"),
        Some("Basic czZCaGRSa3F0MzpnWDFmQmF0M2JW")
    );
    assert_eq!(
        request.body_text(),
        "grant_type=refresh_token&refresh_token=SplxlOBeZQQYbYS6WxSbIA&scope=foo+bar"
    );
}

#[tokio::test]
async fn test_refresh_token_without_scope() {
    let transport = MockTransport::with_response(StatusCode::OK, TOKEN_BODY);
    let current = AccessToken::new("old", "bearer").with_refresh_token("SplxlOBeZQQYbYS6WxSbIA");

    authorization(&transport).refresh_token(&current).await.unwrap();

    assert_eq!(
        transport.single_request().body_text(),
        "grant_type=refresh_token&refresh_token=SplxlOBeZQQYbYS6WxSbIA"
    );
}

#[tokio::test]
async fn test_no_refresh_token_makes_no_request() {
    let transport = MockTransport::with_response(StatusCode::OK, TOKEN_BODY);

    for current in [
        AccessToken::new("2YotnFZFEjr1zCsicMWpAA", "example"),
        AccessToken::new("2YotnFZFEjr1zCsicMWpAA", "example").with_refresh_token(""),
    ] {
        let err = authorization(&transport)
            .refresh_token(&current)
            .await
            .unwrap_err();
        assert!(matches!(err, OAuth2Error::NoRefreshToken));
    }

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_refresh_error_is_typed() {
    let transport = MockTransport::with_response(StatusCode::BAD_REQUEST, ERROR_BODY);

    let err = authorization(&transport)
        .refresh_token(&refreshable())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OAuth2Error::Protocol(ProtocolError::InvalidRequest(ref m)) if m == "Error message"
    ));
}

#[tokio::test]
async fn test_refresh_invalid_grant() {
    let transport = MockTransport::with_response(
        StatusCode::BAD_REQUEST,
        r#"{"error":"invalid_grant","error_description":"Refresh token expired"}"#,
    );

    let err = authorization(&transport)
        .refresh_token(&refreshable())
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), Some("invalid_grant"));
    assert_eq!(err.to_string(), "Invalid grant: Refresh token expired");
}

#[tokio::test]
async fn test_refresh_in_place() {
    let transport = MockTransport::with_response(
        StatusCode::OK,
        r#"{"access_token":"new","token_type":"bearer","refresh_token":"next"}"#,
    );
    let mut token = refreshable();

    authorization(&transport)
        .refresh_in_place(&mut token)
        .await
        .unwrap();

    assert_eq!(token.access_token(), "new");
    assert_eq!(token.refresh_token(), Some("next"));
    assert_eq!(token.scope(), None);
}

#[tokio::test]
async fn test_refresh_in_place_keeps_token_on_failure() {
    let transport = MockTransport::with_response(StatusCode::BAD_REQUEST, ERROR_BODY);
    let mut token = refreshable();

    let err = authorization(&transport)
        .refresh_in_place(&mut token)
        .await
        .unwrap_err();

    assert!(err.is_protocol_error());
    assert_eq!(token, refreshable());
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let transport = MockTransport::new();
    transport.push_response(StatusCode::OK, TOKEN_BODY);
    transport.push_response(StatusCode::OK, TOKEN_BODY);
    let flow: RefreshTokenFlow<_> = authorization(&transport).into();

    let grant = Grant::from(RefreshTokenGrant::new("tGzv3JOkF0XG5Qx2TlKWIA").unwrap());
    flow.request_token(&grant).await.unwrap();
    TokenFlow::refresh_token(&flow, &refreshable()).await.unwrap();

    let bodies: Vec<String> = transport.requests().iter().map(|r| r.body_text()).collect();
    assert_eq!(
        bodies,
        [
            "grant_type=refresh_token&refresh_token=tGzv3JOkF0XG5Qx2TlKWIA",
            "grant_type=refresh_token&refresh_token=SplxlOBeZQQYbYS6WxSbIA&scope=foo+bar",
        ]
    );
}
