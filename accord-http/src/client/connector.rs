//! TLS connector construction, driven by the crate's feature flags.

use hyper::client::HttpConnector;

#[cfg(feature = "native")]
pub(crate) type Connector = hyper_tls::HttpsConnector<HttpConnector>;
#[cfg(all(
    not(feature = "native"),
    any(feature = "rustls-native-roots", feature = "rustls-webpki-roots")
))]
pub(crate) type Connector = hyper_rustls::HttpsConnector<HttpConnector>;
#[cfg(not(any(
    feature = "native",
    feature = "rustls-native-roots",
    feature = "rustls-webpki-roots"
)))]
pub(crate) type Connector = HttpConnector;

/// Create the connector the client uses for every exchange.
pub(crate) fn create() -> Connector {
    #[cfg(feature = "native")]
    {
        hyper_tls::HttpsConnector::new()
    }

    #[cfg(all(not(feature = "native"), feature = "rustls-native-roots"))]
    {
        hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build()
    }

    #[cfg(all(
        not(feature = "native"),
        not(feature = "rustls-native-roots"),
        feature = "rustls-webpki-roots"
    ))]
    {
        hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build()
    }

    #[cfg(not(any(
        feature = "native",
        feature = "rustls-native-roots",
        feature = "rustls-webpki-roots"
    )))]
    {
        let mut connector = HttpConnector::new();
        connector.enforce_http(false);

        connector
    }
}
