//! Stateless URL builders, request builders and response parsers for the
//! users API.
//!
//! # Design
//! `UserClient` holds only the configured base URL. The four endpoint URLs
//! are pure string functions; each CRUD call is then split into a `build_*`
//! method producing an `HttpRequest` and a `parse_*` method consuming the
//! host's `HttpResponse`.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewUser, User};

const USERS_PATH: &str = "users";

/// Synchronous, stateless client for the users API.
#[derive(Debug, Clone)]
pub struct UserClient {
    base_url: String,
}

impl UserClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // URLs
    // -----------------------------------------------------------------------

    pub fn list_url(&self) -> String {
        format!("{}/{USERS_PATH}", self.base_url)
    }

    /// Same resource as the list; only the method differs.
    pub fn create_url(&self) -> String {
        self.list_url()
    }

    pub fn update_url(&self, id: &str) -> String {
        self.user_url(id)
    }

    pub fn delete_url(&self, id: &str) -> String {
        self.user_url(id)
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/{USERS_PATH}/{}", self.base_url, urlencoding::encode(id))
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    pub fn build_list_users(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.list_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_user(&self, input: &NewUser) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.create_url(),
            headers: json_headers(),
            body: Some(to_json(input)?),
        })
    }

    /// PUT the full record to its id-scoped URL.
    pub fn build_update_user(&self, user: &User) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.update_url(&user.id),
            headers: json_headers(),
            body: Some(to_json(user)?),
        })
    }

    pub fn build_delete_user(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.delete_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    // -----------------------------------------------------------------------
    // Responses
    // -----------------------------------------------------------------------

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    /// The updated record the server echoes back is not used by the screen,
    /// so only the status is checked.
    pub fn parse_update_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

pub(crate) fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;

    fn client() -> UserClient {
        UserClient::new(&ClientConfig::new("http://localhost:3000").unwrap())
    }

    fn alice() -> User {
        User {
            id: "1".to_string(),
            name: "A".to_string(),
            address: "X".to_string(),
            phone: "0123456789".to_string(),
            birthday: "2000-01-01".to_string(),
            gender: Gender::Male,
        }
    }

    #[test]
    fn urls_share_the_users_resource() {
        let c = client();
        assert_eq!(c.list_url(), "http://localhost:3000/users");
        assert_eq!(c.create_url(), c.list_url());
        assert_eq!(c.update_url("42"), "http://localhost:3000/users/42");
        assert_eq!(c.delete_url("42"), c.update_url("42"));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let c = UserClient::new(&ClientConfig::new("https://host/api/").unwrap());
        assert_eq!(c.list_url(), "https://host/api/users");
    }

    #[test]
    fn ids_are_escaped_as_a_single_segment() {
        assert_eq!(
            client().delete_url("a/b c"),
            "http://localhost:3000/users/a%2Fb%20c"
        );
    }

    #[test]
    fn build_list_users_produces_correct_request() {
        let req = client().build_list_users();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/users");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_user_sends_form_fields_only() {
        let input = NewUser {
            name: "B".to_string(),
            phone: "1112223334".to_string(),
            birthday: "1990-05-05".to_string(),
            address: "Y".to_string(),
        };
        let req = client().build_create_user(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/users");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "B");
        assert_eq!(body["phone"], "1112223334");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_update_user_puts_full_record() {
        let req = client().build_update_user(&alice()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/users/1");
        let body: User = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, alice());
    }

    #[test]
    fn build_delete_user_has_no_body() {
        let req = client().build_delete_user("1");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/users/1");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_users_success() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":"1","name":"A","phone":"0123456789","address":"X","birthday":"2000-01-01","gender":"male"}]"#,
        );
        let users = client().parse_list_users(response).unwrap();
        assert_eq!(users, vec![alice()]);
    }

    #[test]
    fn parse_list_users_bad_json() {
        let err = client()
            .parse_list_users(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_create_user_accepts_any_2xx() {
        let body = r#"{"id":"2","name":"B","phone":"1112223334","address":"Y","birthday":"1990-05-05","gender":"male"}"#;
        assert_eq!(client().parse_create_user(HttpResponse::new(201, body)).unwrap().id, "2");
        assert_eq!(client().parse_create_user(HttpResponse::new(200, body)).unwrap().id, "2");
    }

    #[test]
    fn parse_create_user_wrong_status() {
        let err = client()
            .parse_create_user(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_update_user_ignores_body() {
        assert!(client().parse_update_user(HttpResponse::new(200, "whatever")).is_ok());
    }

    #[test]
    fn parse_delete_user_not_found() {
        let err = client().parse_delete_user(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
