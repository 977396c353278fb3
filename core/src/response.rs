//! Response interpretation shared by every repository operation.
//!
//! Status mapping: 2xx is success, 404 is `ApiError::NotFound`, anything
//! else is `ApiError::Http` carrying the raw status and body.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Map non-success status codes to the appropriate `ApiError` variant.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Parse a success body into `R`.
///
/// An empty body or a literal `null` on a success status yields `None`.
pub fn deserialize_response<R>(response: HttpResponse) -> Result<Option<R>, ApiError>
where
    R: DeserializeOwned,
{
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<R>>(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Turn a not-found failure into the caller's absent value.
pub(crate) fn absent_if_not_found<R>(result: Result<R, ApiError>, absent: R) -> Result<R, ApiError> {
    match result {
        Err(ApiError::NotFound) => Ok(absent),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        id: i64,
        name: String,
    }

    #[test]
    fn success_body_is_parsed() {
        let parsed: Option<Widget> =
            deserialize_response(HttpResponse::new(200, r#"{"id":1,"name":"A"}"#)).unwrap();
        assert_eq!(
            parsed,
            Some(Widget {
                id: 1,
                name: "A".to_string()
            })
        );
    }

    #[test]
    fn empty_and_null_success_bodies_are_absent() {
        let empty: Option<Widget> = deserialize_response(HttpResponse::new(200, "")).unwrap();
        let blank: Option<Widget> = deserialize_response(HttpResponse::new(204, "  \n")).unwrap();
        let null: Option<Widget> = deserialize_response(HttpResponse::new(200, "null")).unwrap();
        assert!(empty.is_none());
        assert!(blank.is_none());
        assert!(null.is_none());
    }

    #[test]
    fn not_found_is_a_dedicated_error() {
        let err = deserialize_response::<Widget>(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn other_failures_keep_status_and_body() {
        let err = deserialize_response::<Widget>(HttpResponse::new(
            500,
            "A problem happened while handling your request.",
        ))
        .unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 500);
                assert!(body.starts_with("A problem"));
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_body_is_a_deserialization_error() {
        let err = deserialize_response::<Widget>(HttpResponse::new(200, r#"{"id":"x"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn absent_if_not_found_only_swallows_404() {
        assert!(!absent_if_not_found(Err(ApiError::NotFound), false).unwrap());
        assert!(absent_if_not_found(Ok(true), false).unwrap());

        let bad_request = Err(ApiError::Http {
            status: 400,
            body: String::new(),
        });
        assert!(absent_if_not_found::<bool>(bad_request, false).is_err());
    }
}
