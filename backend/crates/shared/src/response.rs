//! API Response Envelope
//!
//! Every successful response shares one JSON shape:
//! `{statusCode, data, message, success}` with `statusCode` mirrored in
//! the HTTP status line. The failing counterpart lives in
//! [`crate::error::conversions`].

use serde::Serialize;

/// 成功レスポンスの統一エンベロープ
///
/// ## Examples
/// ```rust
/// use kernel::response::ApiResponse;
///
/// let res = ApiResponse::ok("data", "Fetched successfully");
/// assert_eq!(res.status_code(), 200);
/// assert!(res.is_success());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    status_code: u16,
    data: T,
    message: String,
    success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// 任意のステータスコードでエンベロープを作成
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }

    /// 200 OK レスポンス
    #[inline]
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(200, data, message)
    }

    /// 201 Created レスポンス
    #[inline]
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(201, data, message)
    }

    /// ステータスコードを取得
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// 成功レスポンスかどうか
    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}
