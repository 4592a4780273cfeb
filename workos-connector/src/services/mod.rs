pub mod metrics;
pub mod operations;
pub mod pagination;
pub mod triggers;
pub mod workos;

pub use metrics::{get_metrics, init_metrics, record_webhook_delivery};
pub use operations::{execute, execute_batch, BatchError, OperationItem, Operation, Resource};
pub use pagination::{parse_pagination_metadata, request_all_items, request_page, PaginationInfo};
pub use triggers::{spawn_trigger_logger, TriggerDispatcher, TriggerError};
pub use workos::{Query, RetryingTransport, WorkOsClient, WorkOsError, WorkOsTransport};
