//! Transaction comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::receipt::FileUpload;
use super::resource::Attachable;
use super::user::User;
use crate::client::HcbClient;

/// A comment on a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id
    pub id: String,
    /// When it was posted
    pub created_at: Option<DateTime<Utc>>,
    /// Comment text
    pub content: Option<String>,
    /// Attachment URL
    pub file: Option<String>,
    /// Visible to HCB staff only
    pub admin_only: Option<bool>,
    /// Author
    pub user: Option<User>,
}

impl Comment {
    pub(crate) fn attach_author(mut self, client: &HcbClient) -> Self {
        self.user = self.user.take().map(|user| user.attach(client));
        self
    }
}

/// A comment to post on a transaction.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    /// Comment text
    pub content: String,
    /// Visible to HCB staff only
    pub admin_only: bool,
    /// Optional attachment; the comment is sent as multipart when set
    pub file: Option<FileUpload>,
}

impl NewComment {
    /// A plain text comment.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Restrict visibility to HCB staff.
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Attach a file.
    pub fn with_file(mut self, file: FileUpload) -> Self {
        self.file = Some(file);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_comment() {
        let json = r#"{
            "id": "cmt_1",
            "content": "Receipt is in the drive",
            "admin_only": false,
            "user": {"id": "usr_1", "name": "Ada"}
        }"#;

        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.content.as_deref(), Some("Receipt is in the drive"));
        assert_eq!(comment.admin_only, Some(false));
        assert!(comment.file.is_none());
    }
}
