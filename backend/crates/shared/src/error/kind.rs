//! Error Kind - Classification of errors
//!
//! [`ErrorKind`] は HTTP ステータスコードへの対応表を兼ねる。

use serde::Serialize;

/// エラー種別
///
/// 認証まわりでは `Unauthorized`（誰かわからない）と `Forbidden`
/// （誰かはわかるが権限がない）を必ず区別すること。
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Forbidden.status_code(), 403);
/// assert_eq!(ErrorKind::Unauthorized.as_str(), "Unauthorized");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - 入力が不正
    BadRequest,
    /// 401 - 認証されていない
    Unauthorized,
    /// 403 - 認証済みだが権限がない
    Forbidden,
    /// 404 - 対象が存在しない
    NotFound,
    /// 408 - 処理がタイムアウトした
    RequestTimeout,
    /// 409 - 一意制約などの競合
    Conflict,
    /// 422 - 形式は正しいが処理できない
    UnprocessableEntity,
    /// 500 - サーバー内部エラー
    InternalServerError,
    /// 503 - 依存サービスが利用不可
    ServiceUnavailable,
}

impl ErrorKind {
    /// HTTP ステータスコード
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::RequestTimeout => 408,
            ErrorKind::Conflict => 409,
            ErrorKind::UnprocessableEntity => 422,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// 標準の理由フレーズ
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::RequestTimeout => "Request Timeout",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 5xx 系か。サーバー側でログに残すべきエラー
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// 4xx 系か
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_kinds_are_distinct() {
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_ne!(ErrorKind::Unauthorized, ErrorKind::Forbidden);
    }

    #[test]
    fn test_server_and_client_classes() {
        assert!(ErrorKind::InternalServerError.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
        assert!(!ErrorKind::Conflict.is_server_error());

        assert!(ErrorKind::BadRequest.is_client_error());
        assert!(ErrorKind::RequestTimeout.is_client_error());
        assert!(!ErrorKind::InternalServerError.is_client_error());
    }

    #[test]
    fn test_serialized_name() {
        let json = serde_json::to_string(&ErrorKind::UnprocessableEntity).unwrap();
        assert_eq!(json, r#""UNPROCESSABLE_ENTITY""#);
    }
}
