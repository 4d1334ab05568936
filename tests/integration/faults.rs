use crate::utils::{client, FakeTokenFetcher, TOKEN};
use async_trait::async_trait;
use organization_client::{Client, EmptyResponse, Error, Request, TokenError, TokenFetcher};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct MalformedRequest;

impl Request for MalformedRequest {
    type Data = ();
    type Response = EmptyResponse;

    fn endpoint(&self) -> Cow<str> {
        panic!("malformed identifier")
    }
}

#[derive(Debug)]
struct Exploding;

impl<'de> Deserialize<'de> for Exploding {
    fn deserialize<D>(_deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        panic!("decoder blew up")
    }
}

struct ExplodingResponse;

impl Request for ExplodingResponse {
    type Data = ();
    type Response = Exploding;

    fn endpoint(&self) -> Cow<str> {
        "organizations".into()
    }
}

struct PanickingFetcher;

#[async_trait]
impl TokenFetcher for PanickingFetcher {
    async fn token(&self, _audience: &str) -> Result<String, TokenError> {
        panic!("fetcher crashed")
    }
}

#[tokio::test]
async fn panic_while_building_request() {
    let server = MockServer::start().await;
    let client = client(&server, FakeTokenFetcher::returning(TOKEN));

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(matches!(
        client.send(&MalformedRequest).await.unwrap_err(),
        Error::Internal(msg) if msg == "malformed identifier"
    ));
}

#[tokio::test]
async fn panic_while_decoding_response() {
    let server = MockServer::start().await;
    let client = client(&server, FakeTokenFetcher::returning(TOKEN));

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    assert!(matches!(
        client.send(&ExplodingResponse).await.unwrap_err(),
        Error::Internal(msg) if msg == "decoder blew up"
    ));
}

#[tokio::test]
async fn panic_in_token_fetcher() {
    let server = MockServer::start().await;
    let client = Client::new(PanickingFetcher, &server.uri(), "audience").unwrap();

    assert!(matches!(
        client.organizations().await.unwrap_err(),
        Error::Internal(msg) if msg == "fetcher crashed"
    ));
}

#[tokio::test]
async fn client_stays_usable_after_a_fault() {
    let server = MockServer::start().await;
    let client = client(&server, FakeTokenFetcher::returning(TOKEN));

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    assert!(client.send(&MalformedRequest).await.is_err());
    client.send(&ExplodingResponse).await.unwrap_err();
    let _: EmptyResponse = client.send(&EmptyRequest).await.unwrap();
}

struct EmptyRequest;

impl Request for EmptyRequest {
    type Data = ();
    type Response = EmptyResponse;

    fn endpoint(&self) -> Cow<str> {
        "ping".into()
    }
}
