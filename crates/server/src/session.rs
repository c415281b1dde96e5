use axum::http::HeaderMap;
use uuid::Uuid;

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
}

/// Resolve the current session from request headers, if any. The frontend
/// forwards the signed-in user's id in `X-User-Id`; absence means the caller
/// is anonymous. Malformed ids are treated as no session.
pub fn current_session(headers: &HeaderMap) -> Option<Session> {
    let raw = headers.get("x-user-id")?.to_str().ok()?;
    let user_id = Uuid::parse_str(raw).ok()?;
    Some(Session { user_id })
}
