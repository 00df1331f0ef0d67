//! Full-collection scans over the paginated adapter contract
//!
//! Used by metrics and reconciliation jobs that need every campaign or list
//! rather than one page. The scan follows cursors until the adapter reports
//! the final page and guards against remote paginators that loop.

use std::collections::HashSet;
use std::future::Future;

use mailbridge_domain::constants::MAX_ENUMERATION_PAGES;
use mailbridge_domain::{
    PaginatedResult, PaginationOptions, PlatformCampaign, PlatformError, PlatformList, Result,
};
use tracing::debug;

use crate::platform_ports::PlatformAdapter;

/// Every campaign visible to the adapter, in adapter order.
pub async fn collect_all_campaigns(
    adapter: &dyn PlatformAdapter,
    page_size: u32,
) -> Result<Vec<PlatformCampaign>> {
    let platform = adapter.platform();
    let campaigns =
        collect_pages(page_size, |options| async move { adapter.list_campaigns(&options).await })
            .await?;
    debug!(%platform, count = campaigns.len(), "collected all campaigns");
    Ok(campaigns)
}

/// Every audience list visible to the adapter, in adapter order.
pub async fn collect_all_lists(
    adapter: &dyn PlatformAdapter,
    page_size: u32,
) -> Result<Vec<PlatformList>> {
    let platform = adapter.platform();
    let lists =
        collect_pages(page_size, |options| async move { adapter.list_lists(&options).await })
            .await?;
    debug!(%platform, count = lists.len(), "collected all lists");
    Ok(lists)
}

async fn collect_pages<T, F, Fut>(page_size: u32, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(PaginationOptions) -> Fut,
    Fut: Future<Output = Result<PaginatedResult<T>>>,
{
    PaginationOptions::first_page(page_size).validate()?;

    let mut items = Vec::new();
    let mut seen_cursors = HashSet::new();
    let mut cursor: Option<String> = None;

    for _ in 0..MAX_ENUMERATION_PAGES {
        let page = fetch(PaginationOptions { cursor: cursor.take(), page_size }).await?;
        items.extend(page.items);

        match (page.has_more, page.next_cursor) {
            (false, _) => return Ok(items),
            (true, None) => {
                return Err(PlatformError::Transport(
                    "adapter reported more pages without a cursor".into(),
                ))
            }
            (true, Some(next)) => {
                if !seen_cursors.insert(next.clone()) {
                    return Err(PlatformError::Transport(
                        "pagination cursor repeated; remote paginator is looping".into(),
                    ));
                }
                cursor = Some(next);
            }
        }
    }

    Err(PlatformError::Transport(format!(
        "pagination exceeded {MAX_ENUMERATION_PAGES} pages"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stops_on_final_page() {
        let pages = vec![
            PaginatedResult::new(vec![1, 2], Some("a".to_string())),
            PaginatedResult::new(vec![3], Some("b".to_string())),
            PaginatedResult::last(vec![4]),
        ];
        let mut iter = pages.into_iter();

        let items = collect_pages(2, |_| {
            let page = iter.next().expect("fetched past the final page");
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn repeated_cursor_is_rejected() {
        let result: Result<Vec<u8>> = collect_pages(10, |_| async {
            Ok(PaginatedResult::new(vec![1], Some("same".to_string())))
        })
        .await;

        assert!(matches!(result, Err(PlatformError::Transport(msg)) if msg.contains("repeated")));
    }

    #[tokio::test]
    async fn invalid_page_size_fails_before_fetching() {
        let mut calls = 0;
        let result: Result<Vec<u8>> = collect_pages(0, |_| {
            calls += 1;
            async { Ok(PaginatedResult::last(vec![])) }
        })
        .await;

        assert!(matches!(result, Err(PlatformError::InvalidInput(_))));
        assert_eq!(calls, 0);
    }
}
