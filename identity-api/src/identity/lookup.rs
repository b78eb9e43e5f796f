use shared_types::IdentifyRequest;

use super::IdentifyError;

/// A validated identify request: at least one of the two fields is present.
///
/// Values are trimmed; empty or whitespace-only values count as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey {
    email: Option<String>,
    phone_number: Option<String>,
}

impl LookupKey {
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<IdentifyRequest> for LookupKey {
    type Error = IdentifyError;

    fn try_from(request: IdentifyRequest) -> Result<Self, Self::Error> {
        let email = normalize(request.email);
        let phone_number = normalize(request.phone_number);

        if email.is_none() && phone_number.is_none() {
            return Err(IdentifyError::Validation(
                "either email or phoneNumber must be provided".to_string(),
            ));
        }

        Ok(Self {
            email,
            phone_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_request() {
        let err = LookupKey::try_from(IdentifyRequest::default()).unwrap_err();
        assert!(matches!(err, IdentifyError::Validation(_)));
    }

    #[test]
    fn test_blank_fields_count_as_absent() {
        let err = LookupKey::try_from(IdentifyRequest::new(Some(""), Some("   "))).unwrap_err();
        assert!(matches!(err, IdentifyError::Validation(_)));

        let key = LookupKey::try_from(IdentifyRequest::new(Some(""), Some(" 123 "))).unwrap();
        assert_eq!(key.email(), None);
        assert_eq!(key.phone_number(), Some("123"));
    }
}
