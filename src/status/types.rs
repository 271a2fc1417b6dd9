// Serde types for the status service wire protocol.

use serde::Deserialize;

/// A status message from the user stream.
///
/// The stream interleaves statuses with friend lists, events and delete
/// notices; only lines that carry these three fields are statuses, so
/// deserialization failure is the dispatch filter.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub id: u64,
    pub text: String,
    pub user: StatusAuthor,
}

/// The author fields the relay uses.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusAuthor {
    pub screen_name: String,
}

/// Response from the status update endpoint — only the assigned id matters.
#[derive(Debug, Deserialize)]
pub struct UpdateResponse {
    pub id: u64,
}

/// Canonical permalink for a status, built from author handle and id.
pub fn permalink(handle: &str, id: u64) -> String {
    format!("https://twitter.com/{handle}/status/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_deserializes() {
        let json = r#"{
            "id": 123456789,
            "text": "aGVsbG8=",
            "user": {"id": 42, "screen_name": "someone", "name": "Someone"},
            "created_at": "Mon Jan 01 00:00:00 +0000 2024"
        }"#;
        let status: StatusUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(status.id, 123456789);
        assert_eq!(status.text, "aGVsbG8=");
        assert_eq!(status.user.screen_name, "someone");
    }

    #[test]
    fn non_status_lines_fail_to_deserialize() {
        // Friend list preamble — no text/user fields.
        let friends = r#"{"friends": [1, 2, 3]}"#;
        assert!(serde_json::from_str::<StatusUpdate>(friends).is_err());

        // Delete notice.
        let delete = r#"{"delete": {"status": {"id": 1, "user_id": 2}}}"#;
        assert!(serde_json::from_str::<StatusUpdate>(delete).is_err());
    }

    #[test]
    fn permalink_format() {
        assert_eq!(
            permalink("someone", 99),
            "https://twitter.com/someone/status/99"
        );
    }
}
