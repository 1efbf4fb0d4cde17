//! Installing the bundled ureq transport as the global fallback.

#![cfg(feature = "ureq")]

use fetch_wrapper::{install_default_transport, Client, ClientConfig, GetOptions};
use mock_server::Echo;

#[tokio::test(flavor = "multi_thread")]
async fn installed_default_transport_serves_plain_clients() {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();
    tokio::spawn(async move {
        let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
        mock_server::run(listener).await
    });

    assert!(install_default_transport());
    assert!(!install_default_transport());

    let client = Client::new(ClientConfig::new().base_url(format!("http://{addr}")));
    let response = client
        .get("/echo", GetOptions::new().header("X-Check", "1"))
        .await
        .unwrap();
    let echo: Echo = response.json().unwrap();
    assert_eq!(echo.headers.get("x-check").map(String::as_str), Some("1"));
}
