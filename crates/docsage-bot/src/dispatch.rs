//! Inbound message classification.

use docsage_telegram::{Document, Message};

/// What a message asks the bot to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The `/start` command.
    Start,
    /// A PDF document upload.
    PdfUpload(Document),
    /// An attachment the bot cannot work with.
    UnsupportedAttachment,
    /// A free-text question about the active document.
    Question(String),
    /// Nothing actionable (empty text, service messages).
    Ignored,
}

/// Classify a message into the event its handler expects.
///
/// Attachments are judged before text so a PDF with a caption is still an
/// upload. Slash commands are never questions; anything other than `/start`
/// or `/help` is ignored.
pub fn classify(message: &Message) -> Event {
    if let Some(document) = &message.document {
        if document.is_pdf() {
            return Event::PdfUpload(document.clone());
        }
        return Event::UnsupportedAttachment;
    }

    if message.has_attachment() {
        return Event::UnsupportedAttachment;
    }

    match message.text.as_deref().map(str::trim) {
        Some("/start") | Some("/help") => Event::Start,
        Some(text) if text.starts_with('/') => Event::Ignored,
        Some(text) if !text.is_empty() => Event::Question(text.to_string()),
        _ => Event::Ignored,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn message_json(body: &str) -> Message {
        let json = format!(
            r#"{{
                "message_id": 1,
                "from": {{"id": 42, "first_name": "Ada"}},
                "chat": {{"id": 42}},
                {body}
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_start_command() {
        let message = message_json(r#""text": "/start""#);
        assert_eq!(classify(&message), Event::Start);
    }

    #[test]
    fn test_pdf_upload() {
        let message = message_json(
            r#""document": {"file_id": "F1", "file_name": "report.pdf", "mime_type": "application/pdf"}"#,
        );
        let expected = Event::PdfUpload(Document {
            file_id: "F1".to_string(),
            file_name: Some("report.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            file_size: None,
        });
        assert_eq!(classify(&message), expected);
    }

    #[test]
    fn test_non_pdf_document_unsupported() {
        let message = message_json(
            r#""document": {"file_id": "F2", "file_name": "notes.docx", "mime_type": "application/msword"}"#,
        );
        assert_eq!(classify(&message), Event::UnsupportedAttachment);
    }

    #[test]
    fn test_photo_unsupported() {
        let message = message_json(r#""photo": [{"file_id": "P1"}]"#);
        assert_eq!(classify(&message), Event::UnsupportedAttachment);
    }

    #[test]
    fn test_plain_text_is_question() {
        let message = message_json(r#""text": "what is chapter 3 about?""#);
        assert_eq!(
            classify(&message),
            Event::Question("what is chapter 3 about?".to_string())
        );
    }

    #[test]
    fn test_help_command_greets() {
        let message = message_json(r#""text": "/help""#);
        assert_eq!(classify(&message), Event::Start);
    }

    #[test]
    fn test_unknown_command_ignored() {
        let message = message_json(r#""text": "/settings""#);
        assert_eq!(classify(&message), Event::Ignored);
    }

    #[test]
    fn test_blank_text_ignored() {
        let message = message_json(r#""text": "   ""#);
        assert_eq!(classify(&message), Event::Ignored);
    }

    #[test]
    fn test_captioned_pdf_is_still_upload() {
        let message = message_json(
            r#""text": "here you go",
               "document": {"file_id": "F3", "file_name": "a.pdf", "mime_type": "application/pdf"}"#,
        );
        assert!(matches!(classify(&message), Event::PdfUpload(_)));
    }
}
