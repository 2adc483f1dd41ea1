use serde::Serialize;

/// Like state after a like/unlike call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: i64,
}

/// Request context stored alongside a recorded view.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub referrer_url: Option<String>,
    pub device_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewRecorded {
    /// False when this fingerprint had already viewed the post.
    pub counted: bool,
    pub view_count: i64,
}
