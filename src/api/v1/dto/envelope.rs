use serde::Serialize;

/// Success body shared by every v1 endpoint: `{ "message": ..., "data": ... }`.
///
/// `data` is omitted when the endpoint has nothing to return.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            message,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: &'static str) -> Self {
        Self {
            message,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_is_omitted_for_message_only_bodies() {
        let body = serde_json::to_value(Envelope::message("Nurse deleted successfully")).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Nurse deleted successfully" }));
    }

    #[test]
    fn data_is_nested_under_data() {
        let body = serde_json::to_value(Envelope::new("ok", vec![1, 2])).unwrap();
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }
}
