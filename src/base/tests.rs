use crate::base::error::Error;
use crate::base::neterror::NetError;
use crate::emulation::Platform;

#[test]
fn test_net_error_roundtrip() {
    let original = NetError::ConnectionRefused;
    let code = original.as_i32();
    assert_eq!(code, -102);
    assert!(matches!(NetError::from(code), NetError::ConnectionRefused));

    let h2 = NetError::Http2ProtocolError;
    assert_eq!(h2.as_i32(), -337);
    assert_eq!(NetError::from(-337), h2);
}

#[test]
fn test_unknown_error() {
    let err = NetError::from(-9999);
    assert!(matches!(err, NetError::Unknown(-9999)));
    assert_eq!(err.as_i32(), -9999);
}

#[test]
fn test_connect_error_range() {
    assert!(NetError::ConnectionTimedOut.is_connect_error());
    assert!(NetError::TunnelConnectionFailed.is_connect_error());
    assert!(!NetError::InvalidResponse.is_connect_error());
    assert!(!NetError::Http2StreamClosed.is_connect_error());
}

#[test]
fn test_io_error_mapping() {
    let refused = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
    assert_eq!(NetError::from(refused), NetError::ConnectionRefused);

    let timed_out = std::io::Error::from(std::io::ErrorKind::TimedOut);
    assert_eq!(NetError::from(timed_out), NetError::ConnectionTimedOut);

    let other = std::io::Error::new(std::io::ErrorKind::Other, "boom");
    assert_eq!(NetError::from(other), NetError::ConnectionFailed);
}

#[test]
fn test_error_messages_name_the_stage() {
    let err = Error::UnsupportedVersion {
        family: "chromium",
        version: "99.0.0.0".to_string(),
    };
    assert_eq!(err.to_string(), "chromium 99.0.0.0: unsupported version");

    let err = Error::UnsupportedPlatform {
        family: "safari",
        platform: Platform::Windows,
    };
    assert_eq!(err.to_string(), "safari: unsupported platform win");

    let err = Error::Http2Enable(NetError::Http2ProtocolError);
    assert_eq!(err.to_string(), "enabling http2 support: HTTP/2 protocol error");
}
