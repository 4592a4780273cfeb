//! Resource + operation table.
//!
//! Every supported pair maps onto exactly one request shape against the
//! WorkOS API. Input is checked while planning, so a rejected item never
//! reaches the network.

use super::pagination::{request_all_items, request_page, PAGE_SIZE};
use super::workos::{Query, WorkOsError, WorkOsTransport};
use crate::utils::{
    build_filter_query, clean_empty_properties, is_valid_email, parse_json_parameter, validate_id,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Records returned by a single-page list when no limit is given.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    User,
    Organization,
    OrganizationMembership,
    SsoConnection,
    Directory,
    DirectoryUser,
    DirectoryGroup,
    PortalLink,
    AuditLog,
    Webhook,
    Role,
    Invitation,
}

impl Resource {
    pub fn collection_path(self) -> &'static str {
        match self {
            Resource::User => "/user_management/users",
            Resource::Organization => "/organizations",
            Resource::OrganizationMembership => "/user_management/organization_memberships",
            Resource::SsoConnection => "/connections",
            Resource::Directory => "/directories",
            Resource::DirectoryUser => "/directory_users",
            Resource::DirectoryGroup => "/directory_groups",
            Resource::PortalLink => "/portal/generate_link",
            Resource::AuditLog => "/audit_logs/events",
            Resource::Webhook => "/webhooks",
            Resource::Role => "/user_management/roles",
            Resource::Invitation => "/user_management/invitations",
        }
    }

    /// Id prefix WorkOS puts on this resource's identifiers, where it is stable.
    pub fn id_prefix(self) -> Option<&'static str> {
        match self {
            Resource::User => Some("user"),
            Resource::Organization => Some("org"),
            Resource::OrganizationMembership => Some("om"),
            Resource::SsoConnection => Some("conn"),
            Resource::Directory => Some("directory"),
            Resource::DirectoryUser => Some("directory_user"),
            Resource::DirectoryGroup => Some("directory_group"),
            Resource::Invitation => Some("invitation"),
            Resource::PortalLink | Resource::AuditLog | Resource::Webhook | Resource::Role => None,
        }
    }

    pub fn id_field(self) -> &'static str {
        match self {
            Resource::User => "userId",
            Resource::Organization => "organizationId",
            Resource::OrganizationMembership => "membershipId",
            Resource::SsoConnection => "connectionId",
            Resource::Directory => "directoryId",
            Resource::DirectoryUser => "directoryUserId",
            Resource::DirectoryGroup => "directoryGroupId",
            Resource::PortalLink => "organizationId",
            Resource::AuditLog => "eventId",
            Resource::Webhook => "webhookId",
            Resource::Role => "roleId",
            Resource::Invitation => "invitationId",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::User => "User",
            Resource::Organization => "Organization",
            Resource::OrganizationMembership => "Organization membership",
            Resource::SsoConnection => "SSO connection",
            Resource::Directory => "Directory",
            Resource::DirectoryUser => "Directory user",
            Resource::DirectoryGroup => "Directory group",
            Resource::PortalLink => "Portal link",
            Resource::AuditLog => "Audit log",
            Resource::Webhook => "Webhook",
            Resource::Role => "Role",
            Resource::Invitation => "Invitation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Create,
    Get,
    GetAll,
    Update,
    Delete,
    GetByEmail,
    GetOrganizationMemberships,
    SendMagicAuth,
    SendPasswordReset,
    VerifyEmail,
    Authenticate,
    Deactivate,
    Enable,
    Disable,
    Revoke,
    Generate,
    CreateExport,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::GetAll => "getAll",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::GetByEmail => "getByEmail",
            Operation::GetOrganizationMemberships => "getOrganizationMemberships",
            Operation::SendMagicAuth => "sendMagicAuth",
            Operation::SendPasswordReset => "sendPasswordReset",
            Operation::VerifyEmail => "verifyEmail",
            Operation::Authenticate => "authenticate",
            Operation::Deactivate => "deactivate",
            Operation::Enable => "enable",
            Operation::Disable => "disable",
            Operation::Revoke => "revoke",
            Operation::Generate => "generate",
            Operation::CreateExport => "createExport",
        }
    }
}

/// Grant used by the `user.authenticate` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthGrant {
    Password,
    AuthorizationCode,
    MagicAuth,
    Totp,
}

impl AuthGrant {
    pub fn grant_type(self) -> &'static str {
        match self {
            AuthGrant::Password => "password",
            AuthGrant::AuthorizationCode => "authorization_code",
            AuthGrant::MagicAuth => "urn:workos:oauth:grant-type:magic-auth:code",
            AuthGrant::Totp => "urn:workos:oauth:grant-type:mfa-totp",
        }
    }

    fn required_fields(self) -> &'static [&'static str] {
        match self {
            AuthGrant::Password => &["email", "password"],
            AuthGrant::AuthorizationCode => &["code"],
            AuthGrant::MagicAuth => &["code", "email"],
            AuthGrant::Totp => &[
                "code",
                "authentication_challenge_id",
                "pending_authentication_token",
            ],
        }
    }
}

/// One unit of work: a resource, an operation and its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationItem {
    pub resource: Resource,
    pub operation: Operation,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Request body; an object or a JSON-encoded object string.
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub filters: Map<String, Value>,
    #[serde(default)]
    pub return_all: bool,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub grant: Option<AuthGrant>,
}

/// Request shape derived from an [`OperationItem`].
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// One call; the response is the single output record.
    Call {
        method: Method,
        path: String,
        body: Option<Value>,
        query: Query,
    },
    /// A deletion; the output is a confirmation record.
    Delete { path: String, id_field: &'static str, id: String },
    /// A list; every record is an output record.
    List {
        path: String,
        query: Query,
        return_all: bool,
        limit: u32,
    },
    /// A filtered single-page list where only the first match matters.
    FirstMatch {
        path: String,
        query: Query,
        not_found: Value,
    },
}

impl OperationItem {
    fn required_id(&self) -> Result<String, WorkOsError> {
        let field = self.resource.id_field();
        let id = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| WorkOsError::invalid_input(format!("{} is required", field)))?;

        match self.resource.id_prefix() {
            Some(prefix) => validate_id(id, prefix, field)?,
            None if id.contains('/') || id.contains('?') || id.contains('#') => {
                return Err(WorkOsError::invalid_input(format!(
                    "{} contains invalid characters",
                    field
                )))
            }
            None => {}
        }

        Ok(id.to_string())
    }

    fn required_email(&self) -> Result<String, WorkOsError> {
        let email = self
            .email
            .as_deref()
            .or_else(|| self.body.get("email").and_then(Value::as_str))
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| WorkOsError::invalid_input("email is required"))?;

        if !is_valid_email(email) {
            return Err(WorkOsError::invalid_input(format!(
                "Invalid email address: {}",
                email
            )));
        }
        Ok(email.to_string())
    }

    fn body_map(&self) -> Result<Map<String, Value>, WorkOsError> {
        parse_json_parameter(&self.body, "body").map(clean_empty_properties)
    }

    fn list_limit(&self) -> Result<u32, WorkOsError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if limit == 0 || limit > PAGE_SIZE {
            return Err(WorkOsError::invalid_input(format!(
                "limit must be between 1 and {}",
                PAGE_SIZE
            )));
        }
        Ok(limit)
    }

    fn unsupported(&self) -> WorkOsError {
        WorkOsError::invalid_input(format!(
            "Operation '{}' is not supported for resource '{}'",
            self.operation.as_str(),
            self.resource.label()
        ))
    }

    /// Validate the item and derive its request shape.
    ///
    /// `client_id` is only consulted by `user.authenticate`.
    pub fn plan(&self, client_id: Option<&str>) -> Result<Plan, WorkOsError> {
        use Operation as Op;
        use Resource as R;

        let collection = self.resource.collection_path();

        let call = |method: Method, path: String, body: Option<Map<String, Value>>| Plan::Call {
            method,
            path,
            body: body.map(Value::Object),
            query: Query::new(),
        };

        let plan = match (self.resource, self.operation) {
            (R::PortalLink, Op::Generate) => {
                let body = self.body_map()?;
                for field in ["organization", "intent"] {
                    if !body.contains_key(field) {
                        return Err(WorkOsError::invalid_input(format!("{} is required", field)));
                    }
                }
                call(Method::POST, collection.to_string(), Some(body))
            }
            (R::PortalLink, _) => return Err(self.unsupported()),

            (R::AuditLog, Op::CreateExport) => {
                let body = self.body_map()?;
                for field in ["organization_id", "range_start", "range_end"] {
                    if !body.contains_key(field) {
                        return Err(WorkOsError::invalid_input(format!("{} is required", field)));
                    }
                }
                call(Method::POST, "/audit_logs/exports".to_string(), Some(body))
            }

            (R::User | R::Invitation, Op::Create) => {
                let mut body = self.body_map()?;
                body.insert("email".to_string(), Value::String(self.required_email()?));
                call(Method::POST, collection.to_string(), Some(body))
            }
            (R::Organization | R::OrganizationMembership | R::Webhook | R::Role, Op::Create) => {
                let body = self.body_map()?;
                if body.is_empty() {
                    return Err(WorkOsError::invalid_input("body is required"));
                }
                call(Method::POST, collection.to_string(), Some(body))
            }

            (_, Op::Get) => call(
                Method::GET,
                format!("{}/{}", collection, self.required_id()?),
                None,
            ),

            (R::AuditLog, Op::GetAll) => {
                let query = build_filter_query(&self.filters);
                if !query.contains_key("organization_id") {
                    return Err(WorkOsError::invalid_input("organization_id is required"));
                }
                self.list(collection, query)?
            }
            (_, Op::GetAll) => self.list(collection, build_filter_query(&self.filters))?,

            (
                R::User | R::Organization | R::OrganizationMembership | R::Webhook | R::Role,
                Op::Update,
            ) => {
                let id = self.required_id()?;
                let body = self.body_map()?;
                if body.is_empty() {
                    return Err(WorkOsError::invalid_input("At least one field must be updated"));
                }
                call(Method::PUT, format!("{}/{}", collection, id), Some(body))
            }

            (
                R::User
                | R::Organization
                | R::OrganizationMembership
                | R::SsoConnection
                | R::Directory
                | R::Webhook
                | R::Role,
                Op::Delete,
            ) => {
                let id = self.required_id()?;
                Plan::Delete {
                    path: format!("{}/{}", collection, id),
                    id_field: self.resource.id_field(),
                    id,
                }
            }

            (R::User, Op::GetByEmail) => {
                let email = self.required_email()?;
                let mut query = Query::new();
                query.insert("email".to_string(), email.clone());
                Plan::FirstMatch {
                    path: collection.to_string(),
                    query,
                    not_found: json!({ "message": "User not found", "email": email }),
                }
            }
            (R::User, Op::GetOrganizationMemberships) => {
                let mut query = build_filter_query(&self.filters);
                query.insert("user_id".to_string(), self.required_id()?);
                self.list(R::OrganizationMembership.collection_path(), query)?
            }
            (R::User, Op::SendMagicAuth) => {
                let mut body = Map::new();
                body.insert("email".to_string(), Value::String(self.required_email()?));
                call(
                    Method::POST,
                    "/user_management/magic_auth/send".to_string(),
                    Some(body),
                )
            }
            (R::User, Op::SendPasswordReset) => {
                let mut body = self.body_map()?;
                body.insert("email".to_string(), Value::String(self.required_email()?));
                call(
                    Method::POST,
                    "/user_management/password_reset/send".to_string(),
                    Some(body),
                )
            }
            (R::User, Op::VerifyEmail) => call(
                Method::POST,
                format!("{}/{}/email_verification/send", collection, self.required_id()?),
                None,
            ),
            (R::User, Op::Authenticate) => {
                let grant = self
                    .grant
                    .ok_or_else(|| WorkOsError::invalid_input("grant is required"))?;
                let client_id = client_id.ok_or_else(|| {
                    WorkOsError::invalid_input(
                        "A WorkOS client id is required for authenticate operations",
                    )
                })?;

                let mut body = self.body_map()?;
                if let Some(email) = self.email.as_deref() {
                    body.insert("email".to_string(), Value::String(email.to_string()));
                }
                for field in grant.required_fields() {
                    if !body.contains_key(*field) {
                        return Err(WorkOsError::invalid_input(format!("{} is required", field)));
                    }
                }
                body.insert("client_id".to_string(), Value::String(client_id.to_string()));
                body.insert(
                    "grant_type".to_string(),
                    Value::String(grant.grant_type().to_string()),
                );
                call(
                    Method::POST,
                    "/user_management/authenticate".to_string(),
                    Some(body),
                )
            }

            (R::OrganizationMembership, Op::Deactivate) => call(
                Method::PUT,
                format!("{}/{}/deactivate", collection, self.required_id()?),
                None,
            ),
            (R::Webhook, Op::Enable) => call(
                Method::PUT,
                format!("{}/{}/enable", collection, self.required_id()?),
                None,
            ),
            (R::Webhook, Op::Disable) => call(
                Method::PUT,
                format!("{}/{}/disable", collection, self.required_id()?),
                None,
            ),
            (R::Invitation, Op::Revoke) => call(
                Method::POST,
                format!("{}/{}/revoke", collection, self.required_id()?),
                None,
            ),

            _ => return Err(self.unsupported()),
        };

        Ok(plan)
    }

    fn list(&self, path: &str, query: Query) -> Result<Plan, WorkOsError> {
        Ok(Plan::List {
            path: path.to_string(),
            query,
            return_all: self.return_all,
            limit: if self.return_all {
                PAGE_SIZE
            } else {
                self.list_limit()?
            },
        })
    }
}

/// Run one planned item and return its output records.
pub async fn execute<T>(
    transport: &T,
    item: &OperationItem,
    client_id: Option<&str>,
) -> Result<Vec<Value>, WorkOsError>
where
    T: WorkOsTransport + ?Sized,
{
    match item.plan(client_id)? {
        Plan::Call {
            method,
            path,
            body,
            query,
        } => {
            let response = transport.request(method, &path, body.as_ref(), &query).await?;
            Ok(vec![response])
        }
        Plan::Delete { path, id_field, id } => {
            transport
                .request(Method::DELETE, &path, None, &Query::new())
                .await?;
            Ok(vec![json!({ "success": true, id_field: id })])
        }
        Plan::List {
            path,
            query,
            return_all: true,
            ..
        } => request_all_items(transport, Method::GET, &path, None, &query).await,
        Plan::List {
            path, query, limit, ..
        } => {
            let page = request_page(transport, Method::GET, &path, None, &query, limit).await?;
            Ok(page.data)
        }
        Plan::FirstMatch {
            path,
            query,
            not_found,
        } => {
            let page = request_page(transport, Method::GET, &path, None, &query, 1).await?;
            Ok(vec![page.data.into_iter().next().unwrap_or(not_found)])
        }
    }
}

/// Error record substituted for a failed item when the batch continues on failure.
pub fn error_record(index: usize, item: &OperationItem, err: &WorkOsError) -> Value {
    let mut record = json!({
        "error": format!(
            "{} {} failed: {}",
            item.resource.label(),
            item.operation.as_str(),
            err.message()
        ),
        "item": index,
    });

    if let WorkOsError::Api {
        code, entity_id, ..
    } = err
    {
        record["code"] = json!(code);
        if let Some(entity_id) = entity_id {
            record["entity_id"] = json!(entity_id);
        }
    }
    if let Some(status) = err.status() {
        record["status"] = json!(status);
    }

    record
}

/// A batch aborted at `index`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Item {index} ({resource} {operation}) failed: {source}")]
pub struct BatchError {
    pub index: usize,
    pub resource: &'static str,
    pub operation: &'static str,
    pub source: WorkOsError,
}

/// Execute items one at a time, in order.
///
/// With `continue_on_fail`, a failed item contributes an [`error_record`]
/// and the rest still run; otherwise the first failure aborts the batch.
pub async fn execute_batch<T>(
    transport: &T,
    items: &[OperationItem],
    client_id: Option<&str>,
    continue_on_fail: bool,
) -> Result<Vec<Value>, BatchError>
where
    T: WorkOsTransport + ?Sized,
{
    let mut results = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match execute(transport, item, client_id).await {
            Ok(records) => results.extend(records),
            Err(err) if continue_on_fail => {
                tracing::warn!(
                    index = index,
                    resource = item.resource.label(),
                    operation = item.operation.as_str(),
                    error = %err,
                    "Operation failed, continuing with next item"
                );
                results.push(error_record(index, item, &err));
            }
            Err(err) => {
                return Err(BatchError {
                    index,
                    resource: item.resource.label(),
                    operation: item.operation.as_str(),
                    source: err,
                })
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(value: Value) -> OperationItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_get_plans_single_call_with_validated_id() {
        let plan = item(json!({ "resource": "user", "operation": "get", "id": "user_01" }))
            .plan(None)
            .unwrap();

        assert_eq!(
            plan,
            Plan::Call {
                method: Method::GET,
                path: "/user_management/users/user_01".to_string(),
                body: None,
                query: Query::new(),
            }
        );
    }

    #[test]
    fn test_wrong_id_prefix_fails_fast() {
        let err = item(json!({ "resource": "organization", "operation": "get", "id": "user_01" }))
            .plan(None)
            .unwrap_err();
        assert_eq!(
            err,
            WorkOsError::InvalidInput("organizationId must start with 'org_'".to_string())
        );
    }

    #[test]
    fn test_create_user_requires_valid_email_and_cleans_body() {
        let plan = item(json!({
            "resource": "user",
            "operation": "create",
            "email": "jane@example.com",
            "body": "{\"first_name\":\"Jane\",\"last_name\":\"\"}"
        }))
        .plan(None)
        .unwrap();

        match plan {
            Plan::Call { method, path, body, .. } => {
                assert_eq!(method, Method::POST);
                assert_eq!(path, "/user_management/users");
                assert_eq!(
                    body,
                    Some(json!({ "email": "jane@example.com", "first_name": "Jane" }))
                );
            }
            other => panic!("unexpected plan: {:?}", other),
        }

        let err = item(json!({ "resource": "user", "operation": "create", "email": "nope" }))
            .plan(None)
            .unwrap_err();
        assert!(matches!(err, WorkOsError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_json_body_fails_fast() {
        let err = item(json!({
            "resource": "organization",
            "operation": "create",
            "body": "{broken"
        }))
        .plan(None)
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON in body"));
    }

    #[test]
    fn test_list_modes() {
        let plan = item(json!({
            "resource": "directoryUser",
            "operation": "getAll",
            "returnAll": true,
            "filters": { "directory": "directory_1" }
        }))
        .plan(None)
        .unwrap();
        match plan {
            Plan::List { path, query, return_all, .. } => {
                assert_eq!(path, "/directory_users");
                assert!(return_all);
                assert_eq!(query.get("directory").map(String::as_str), Some("directory_1"));
            }
            other => panic!("unexpected plan: {:?}", other),
        }

        let plan = item(json!({ "resource": "role", "operation": "getAll", "limit": 10 }))
            .plan(None)
            .unwrap();
        assert!(matches!(plan, Plan::List { limit: 10, return_all: false, .. }));

        let err = item(json!({ "resource": "role", "operation": "getAll", "limit": 101 }))
            .plan(None)
            .unwrap_err();
        assert!(matches!(err, WorkOsError::InvalidInput(_)));
    }

    #[test]
    fn test_audit_log_list_requires_organization() {
        let err = item(json!({ "resource": "auditLog", "operation": "getAll" }))
            .plan(None)
            .unwrap_err();
        assert_eq!(
            err,
            WorkOsError::InvalidInput("organization_id is required".to_string())
        );
    }

    #[test]
    fn test_unsupported_pairs_rejected() {
        for (resource, operation) in [
            ("portalLink", "get"),
            ("directory", "update"),
            ("auditLog", "delete"),
            ("organization", "enable"),
            ("invitation", "update"),
        ] {
            let result = item(json!({
                "resource": resource,
                "operation": operation,
                "id": "x_1",
                "body": { "name": "x" }
            }))
            .plan(None);
            assert!(
                matches!(result, Err(WorkOsError::InvalidInput(_))),
                "{} {} should be rejected",
                resource,
                operation
            );
        }
    }

    #[test]
    fn test_special_operation_paths() {
        let cases = [
            (
                json!({ "resource": "organizationMembership", "operation": "deactivate", "id": "om_1" }),
                Method::PUT,
                "/user_management/organization_memberships/om_1/deactivate",
            ),
            (
                json!({ "resource": "webhook", "operation": "enable", "id": "we_1" }),
                Method::PUT,
                "/webhooks/we_1/enable",
            ),
            (
                json!({ "resource": "invitation", "operation": "revoke", "id": "invitation_1" }),
                Method::POST,
                "/user_management/invitations/invitation_1/revoke",
            ),
            (
                json!({ "resource": "user", "operation": "verifyEmail", "id": "user_1" }),
                Method::POST,
                "/user_management/users/user_1/email_verification/send",
            ),
        ];

        for (input, expected_method, expected_path) in cases {
            match item(input).plan(None).unwrap() {
                Plan::Call { method, path, .. } => {
                    assert_eq!(method, expected_method);
                    assert_eq!(path, expected_path);
                }
                other => panic!("unexpected plan: {:?}", other),
            }
        }
    }

    #[test]
    fn test_authenticate_requires_client_id_and_grant_fields() {
        let input = json!({
            "resource": "user",
            "operation": "authenticate",
            "grant": "password",
            "email": "jane@example.com",
            "body": { "password": "hunter2" }
        });

        let err = item(input.clone()).plan(None).unwrap_err();
        assert!(matches!(err, WorkOsError::InvalidInput(_)));

        match item(input).plan(Some("client_123")).unwrap() {
            Plan::Call { path, body, .. } => {
                assert_eq!(path, "/user_management/authenticate");
                let body = body.unwrap();
                assert_eq!(body["client_id"], "client_123");
                assert_eq!(body["grant_type"], "password");
                assert_eq!(body["email"], "jane@example.com");
            }
            other => panic!("unexpected plan: {:?}", other),
        }

        let err = item(json!({
            "resource": "user",
            "operation": "authenticate",
            "grant": "totp",
            "body": { "code": "123456" }
        }))
        .plan(Some("client_123"))
        .unwrap_err();
        assert_eq!(
            err,
            WorkOsError::InvalidInput("authentication_challenge_id is required".to_string())
        );
    }

    #[test]
    fn test_error_record_carries_structured_details() {
        let input = item(json!({ "resource": "user", "operation": "get", "id": "user_1" }));
        let err = WorkOsError::Api {
            status: 404,
            code: "entity_not_found".to_string(),
            message: "User not found".to_string(),
            entity_id: Some("user_1".to_string()),
        };

        let record = error_record(2, &input, &err);
        assert_eq!(record["error"], "User get failed: User not found");
        assert_eq!(record["item"], 2);
        assert_eq!(record["code"], "entity_not_found");
        assert_eq!(record["entity_id"], "user_1");
        assert_eq!(record["status"], 404);
    }
}
