//! Cursor pagination over WorkOS list endpoints.
//!
//! Pages are requested strictly one after another: the `after` cursor of a
//! page is only known once its response arrives. Records are concatenated in
//! server order with no de-duplication or cap.

use super::workos::{Query, WorkOsError, WorkOsTransport};
use crate::models::{ListMetadata, ListPage};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Records requested per page when fetching everything.
pub const PAGE_SIZE: u32 = 100;

/// Cursor state of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub has_more: bool,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Read `list_metadata` from a raw list response.
pub fn parse_pagination_metadata(response: &Value) -> PaginationInfo {
    let metadata: ListMetadata = response
        .get("list_metadata")
        .cloned()
        .and_then(|m| serde_json::from_value(m).ok())
        .unwrap_or_default();

    PaginationInfo {
        has_more: metadata.next_cursor().is_some(),
        before: metadata.previous_cursor().map(str::to_string),
        after: metadata.next_cursor().map(str::to_string),
    }
}

fn decode_page(response: Value) -> Result<ListPage, WorkOsError> {
    if !response.is_object() {
        return Err(WorkOsError::Decode(
            "list response is not a JSON object".to_string(),
        ));
    }
    serde_json::from_value(response).map_err(|e| WorkOsError::Decode(e.to_string()))
}

/// Fetch a single page with an explicit `limit`.
pub async fn request_page<T>(
    transport: &T,
    method: Method,
    endpoint: &str,
    body: Option<&Value>,
    query: &Query,
    limit: u32,
) -> Result<ListPage, WorkOsError>
where
    T: WorkOsTransport + ?Sized,
{
    let mut page_query = query.clone();
    page_query.insert("limit".to_string(), limit.to_string());

    let response = transport.request(method, endpoint, body, &page_query).await?;
    decode_page(response)
}

/// Fetch every record of a list endpoint by following `after` cursors.
///
/// At least one request is always made. Any failed page aborts the whole
/// aggregation and nothing collected so far is returned.
pub async fn request_all_items<T>(
    transport: &T,
    method: Method,
    endpoint: &str,
    body: Option<&Value>,
    query: &Query,
) -> Result<Vec<Value>, WorkOsError>
where
    T: WorkOsTransport + ?Sized,
{
    let mut results = Vec::new();
    let mut after: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let mut page_query = query.clone();
        page_query.insert("limit".to_string(), PAGE_SIZE.to_string());
        if let Some(cursor) = &after {
            page_query.insert("after".to_string(), cursor.clone());
        }

        let response = transport
            .request(method.clone(), endpoint, body, &page_query)
            .await?;
        let page = decode_page(response)?;
        pages += 1;

        results.extend(page.data);
        after = page.list_metadata.next_cursor().map(str::to_string);

        if after.is_none() {
            break;
        }
    }

    tracing::debug!(
        endpoint = %endpoint,
        pages = pages,
        records = results.len(),
        "Fetched all pages"
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Serves queued responses and records every query it receives.
    struct FakeTransport {
        responses: Mutex<VecDeque<Result<Value, WorkOsError>>>,
        queries: Mutex<Vec<Query>>,
    }

    impl FakeTransport {
        fn new(responses: Vec<Result<Value, WorkOsError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<Query> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WorkOsTransport for FakeTransport {
        async fn request(
            &self,
            _method: Method,
            _endpoint: &str,
            _body: Option<&Value>,
            query: &Query,
        ) -> Result<Value, WorkOsError> {
            self.queries.lock().unwrap().push(query.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra request")
        }
    }

    fn page(start: usize, count: usize, after: Option<&str>) -> Value {
        let data: Vec<Value> = (start..start + count)
            .map(|i| json!({ "id": format!("user_{}", i) }))
            .collect();
        json!({
            "data": data,
            "list_metadata": { "before": null, "after": after }
        })
    }

    #[tokio::test]
    async fn test_two_pages_follow_cursor() {
        let transport = FakeTransport::new(vec![
            Ok(page(0, 100, Some("cur1"))),
            Ok(page(100, 37, None)),
        ]);

        let records = request_all_items(
            &transport,
            Method::GET,
            "/user_management/users",
            None,
            &Query::new(),
        )
        .await
        .unwrap();

        assert_eq!(records.len(), 137);
        assert_eq!(records[0]["id"], "user_0");
        assert_eq!(records[136]["id"], "user_136");

        let queries = transport.queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].get("limit").map(String::as_str), Some("100"));
        assert_eq!(queries[0].get("after"), None);
        assert_eq!(queries[1].get("after").map(String::as_str), Some("cur1"));
        assert_eq!(queries[1].get("limit").map(String::as_str), Some("100"));
    }

    #[tokio::test]
    async fn test_page_sizes_concatenate_in_order() {
        let sizes = [3usize, 0, 5, 1];
        let mut responses = Vec::new();
        let mut start = 0;
        for (i, size) in sizes.iter().enumerate() {
            let cursor = format!("cursor_{}", i);
            let after = if i + 1 < sizes.len() {
                Some(cursor.as_str())
            } else {
                Some("")
            };
            responses.push(Ok(page(start, *size, after)));
            start += size;
        }
        let transport = FakeTransport::new(responses);

        let records = request_all_items(
            &transport,
            Method::GET,
            "/organizations",
            None,
            &Query::new(),
        )
        .await
        .unwrap();

        assert_eq!(records.len(), 9);
        let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
        let expected: Vec<String> = (0..9).map(|i| format!("user_{}", i)).collect();
        assert_eq!(ids, expected);
        assert_eq!(transport.queries().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_result_still_issues_one_request() {
        let transport = FakeTransport::new(vec![Ok(json!({
            "data": [],
            "list_metadata": { "before": null, "after": null }
        }))]);

        let records = request_all_items(
            &transport,
            Method::GET,
            "/directories",
            None,
            &Query::new(),
        )
        .await
        .unwrap();

        assert!(records.is_empty());
        assert_eq!(transport.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_caller_filters_preserved_and_limit_overridden() {
        let transport = FakeTransport::new(vec![Ok(page(0, 2, None))]);
        let mut query = Query::new();
        query.insert("organization_id".to_string(), "org_123".to_string());
        query.insert("limit".to_string(), "5".to_string());

        request_all_items(&transport, Method::GET, "/user_management/users", None, &query)
            .await
            .unwrap();

        let queries = transport.queries();
        assert_eq!(
            queries[0].get("organization_id").map(String::as_str),
            Some("org_123")
        );
        assert_eq!(queries[0].get("limit").map(String::as_str), Some("100"));
    }

    #[tokio::test]
    async fn test_failed_page_aborts_without_partial_result() {
        let transport = FakeTransport::new(vec![
            Ok(page(0, 100, Some("cur1"))),
            Err(WorkOsError::Status {
                status: 500,
                message: "boom".to_string(),
            }),
        ]);

        let result = request_all_items(
            &transport,
            Method::GET,
            "/user_management/users",
            None,
            &Query::new(),
        )
        .await;

        assert_eq!(
            result,
            Err(WorkOsError::Status {
                status: 500,
                message: "boom".to_string()
            })
        );
        assert_eq!(transport.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_non_object_response_is_decode_error() {
        let transport = FakeTransport::new(vec![Ok(Value::Null)]);
        let result = request_all_items(
            &transport,
            Method::GET,
            "/connections",
            None,
            &Query::new(),
        )
        .await;
        assert!(matches!(result, Err(WorkOsError::Decode(_))));
    }

    #[tokio::test]
    async fn test_request_page_uses_caller_limit() {
        let transport = FakeTransport::new(vec![Ok(page(0, 10, Some("next")))]);

        let page = request_page(
            &transport,
            Method::GET,
            "/user_management/roles",
            None,
            &Query::new(),
            10,
        )
        .await
        .unwrap();

        assert_eq!(page.data.len(), 10);
        assert_eq!(page.list_metadata.next_cursor(), Some("next"));
        assert_eq!(
            transport.queries()[0].get("limit").map(String::as_str),
            Some("10")
        );
    }

    #[test]
    fn test_parse_pagination_metadata() {
        let info = parse_pagination_metadata(&json!({
            "data": [],
            "list_metadata": { "before": "b1", "after": "a1" }
        }));
        assert_eq!(
            info,
            PaginationInfo {
                has_more: true,
                before: Some("b1".to_string()),
                after: Some("a1".to_string()),
            }
        );

        let info = parse_pagination_metadata(&json!({ "data": [] }));
        assert!(!info.has_more);
        assert_eq!(info.after, None);
    }
}
