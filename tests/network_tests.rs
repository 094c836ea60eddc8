use apimock_client::api::Client;
use apimock_client::config::ClientOptions;
use apimock_client::network::{build_http_client, tls_connector, HttpTransport};
use apimock_client::{new_client, new_client_with_options};

const HTTPS_URL: &str = "https://mocks.example.com:8443";

#[test]
fn https_accepting_invalid_certs_uses_a_preconfigured_connector() {
    let options = ClientOptions::from_base_url(HTTPS_URL).expect("valid url");

    assert!(options.accept_invalid_certs);
    assert!(tls_connector(&options).expect("connector builds").is_some());
    assert!(build_http_client(&options).is_ok());
}

#[test]
fn https_verifying_certs_keeps_the_default_tls_setup() {
    let options = ClientOptions::from_base_url(HTTPS_URL)
        .expect("valid url")
        .with_accept_invalid_certs(false);

    assert!(tls_connector(&options).expect("no connector needed").is_none());
    assert!(build_http_client(&options).is_ok());
}

#[test]
fn plain_http_never_touches_tls() {
    let options = ClientOptions::from_base_url("http://localhost:9000").expect("valid url");

    assert!(tls_connector(&options).expect("no connector needed").is_none());
    assert!(HttpTransport::with_options(&options).is_ok());
}

#[test]
fn https_clients_build_through_the_factories() {
    let client = new_client(HTTPS_URL).expect("https client builds");
    assert_eq!(client.base_url(), format!("{}/ngapimock", HTTPS_URL));

    let options = ClientOptions::from_base_url(HTTPS_URL)
        .expect("valid url")
        .with_accept_invalid_certs(false);
    assert!(new_client_with_options(options).is_ok());
}
