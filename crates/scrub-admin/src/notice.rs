//! Bulk action result codes carried through the redirect

use serde::{Deserialize, Serialize};

pub const SETTINGS_PATH: &str = "/settings";
pub const BULK_PATH: &str = "/settings/bulk";

pub const ARG_RUN_BULK: &str = "ip-scrub-run-bulk";
pub const ARG_NONCE: &str = "ip-scrub-nonce";
pub const ARG_SUCCESS: &str = "ip-scrub-bulk-success";
pub const ARG_COUNT: &str = "ip-scrub-bulk-count";
pub const ARG_ERROR: &str = "ip-scrub-bulk-error";

/// Outcome of the interactive bulk cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkResult {
    Success { count: usize },
    NoComments,
    QueryError,
    UpdateError,
}

impl BulkResult {
    /// Settings view URL carrying this result
    pub fn redirect_url(self) -> String {
        match self {
            BulkResult::Success { count } => {
                let count = count.to_string();
                settings_url(&[(ARG_COUNT, count.as_str()), (ARG_SUCCESS, "yes")])
            }
            BulkResult::NoComments => error_url("no-comments"),
            BulkResult::QueryError => error_url("query-error"),
            BulkResult::UpdateError => error_url("update-error"),
        }
    }
}

fn error_url(code: &str) -> String {
    settings_url(&[(ARG_ERROR, code), (ARG_SUCCESS, "no")])
}

/// Settings view URL with the given query arguments
pub fn settings_url(args: &[(&str, &str)]) -> String {
    with_query(SETTINGS_PATH, args)
}

pub fn bulk_url(nonce: &str) -> String {
    with_query(BULK_PATH, &[(ARG_RUN_BULK, "yes"), (ARG_NONCE, nonce)])
}

fn with_query(path: &str, args: &[(&str, &str)]) -> String {
    let query = serde_urlencoded::to_string(args).unwrap_or_default();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Result arguments as they arrive back on the settings view
#[derive(Debug, Default, Deserialize)]
pub struct NoticeParams {
    #[serde(rename = "ip-scrub-bulk-success")]
    pub success: Option<String>,
    #[serde(rename = "ip-scrub-bulk-count")]
    pub count: Option<String>,
    #[serde(rename = "ip-scrub-bulk-error")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl NoticeParams {
    /// Decode the admin notice, if the request carries a bulk result
    pub fn notice(&self) -> Option<Notice> {
        let success = self.success.as_deref().filter(|s| !s.is_empty())?;

        if success == "yes" {
            let count = self
                .count
                .as_deref()
                .and_then(|c| c.trim().parse::<u64>().ok())
                .unwrap_or(0);
            let message = if count == 1 {
                "Success! 1 comment was updated.".to_string()
            } else {
                format!("Success! {} comments were updated.", count)
            };
            return Some(Notice {
                level: NoticeLevel::Success,
                message,
            });
        }

        let notice = match self.error.as_deref() {
            Some("no-comments") => Notice {
                level: NoticeLevel::Warning,
                message: "There are no comments requiring update at this time.".to_string(),
            },
            Some("query-error") => Notice {
                level: NoticeLevel::Error,
                message: "There was an error attempting to retrieve the comments. Please check your error logs.".to_string(),
            },
            Some("update-error") => Notice {
                level: NoticeLevel::Error,
                message: "There was an error attempting to update the comments. Please check your error logs.".to_string(),
            },
            _ => Notice {
                level: NoticeLevel::Error,
                message: "There was an unknown error. Please check your error logs.".to_string(),
            },
        };
        Some(notice)
    }
}
