//! Thread messages and message deltas

use serde::{Deserialize, Serialize};

/// Thread message object (lifecycle events only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Message id
    pub id: String,
    /// `user` or `assistant`
    #[serde(default)]
    pub role: Option<String>,
    /// Run that produced the message
    #[serde(default)]
    pub run_id: Option<String>,
}

/// Payload of `thread.message.delta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDeltaEvent {
    /// Message id
    pub id: String,
    /// Changed fields
    pub delta: MessageDelta,
}

/// Changed fields of a message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Vec<MessageContentDelta>,
}

/// One content part delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContentDelta {
    /// Text fragment
    Text {
        index: usize,
        #[serde(default)]
        text: Option<TextDelta>,
    },
    /// Image produced by a tool
    ImageFile {
        index: usize,
        #[serde(default)]
        image_file: Option<ImageFileDelta>,
    },
    /// Image by URL
    ImageUrl {
        index: usize,
        #[serde(default)]
        image_url: Option<serde_json::Value>,
    },
    /// Model refusal text
    Refusal {
        index: usize,
        #[serde(default)]
        refusal: Option<String>,
    },
    /// Part types this crate does not know
    #[serde(other)]
    Other,
}

impl MessageContentDelta {
    /// Position of the part within the message; `None` for unknown parts
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Text { index, .. }
            | Self::ImageFile { index, .. }
            | Self::ImageUrl { index, .. }
            | Self::Refusal { index, .. } => Some(*index),
            Self::Other => None,
        }
    }
}

/// Text delta with optional annotations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextDelta {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// Image file reference
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageFileDelta {
    #[serde(default)]
    pub file_id: Option<String>,
}

/// Annotation of a text span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// Link to a file generated by a tool (e.g. `sandbox:/mnt/data/out.csv`)
    FilePath {
        /// Literal marker in the text
        #[serde(default)]
        text: String,
        file_path: FileRef,
        #[serde(default)]
        start_index: Option<usize>,
        #[serde(default)]
        end_index: Option<usize>,
    },
    /// Citation of a searched file (e.g. `【4:0†source】`)
    FileCitation {
        /// Literal marker in the text
        #[serde(default)]
        text: String,
        file_citation: FileRef,
        #[serde(default)]
        start_index: Option<usize>,
        #[serde(default)]
        end_index: Option<usize>,
    },
    #[serde(other)]
    Other,
}

/// Reference to an uploaded or generated file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub file_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_text_delta_with_annotations() {
        let event: MessageDeltaEvent = serde_json::from_value(json!({
            "id": "msg_1",
            "object": "thread.message.delta",
            "delta": {
                "content": [{
                    "index": 0,
                    "type": "text",
                    "text": {
                        "value": "see sandbox:/mnt/data/a.csv",
                        "annotations": [{
                            "index": 0,
                            "type": "file_path",
                            "text": "sandbox:/mnt/data/a.csv",
                            "start_index": 4,
                            "end_index": 27,
                            "file_path": {"file_id": "file-abc"}
                        }, {
                            "type": "url_citation",
                            "text": "x"
                        }]
                    }
                }]
            }
        }))
        .unwrap();

        let MessageContentDelta::Text { text: Some(text), .. } = &event.delta.content[0] else {
            panic!("expected text content");
        };
        let annotations = text.annotations.as_ref().unwrap();
        assert!(matches!(&annotations[0], Annotation::FilePath { file_path, .. } if file_path.file_id == "file-abc"));
        assert_eq!(annotations[1], Annotation::Other);
    }
}
