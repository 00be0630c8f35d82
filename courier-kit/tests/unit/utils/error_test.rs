use super::*;

#[test]
fn can_create_from_strings() {
    assert_eq!(GenericError::from("first"), GenericError::from("first".to_string()));
    assert_ne!(GenericError::from("first"), GenericError::from("second"));
}

#[test]
fn can_convert_io_error() {
    let error: GenericError = std::io::Error::new(std::io::ErrorKind::NotFound, "no file").into();

    assert_eq!(error.message(), "no file");
    assert_eq!(error.to_string(), "no file");
}
